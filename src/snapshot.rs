//! Reading and writing subgraph snapshots as JSON files.
//!
//! The on-disk format is exactly the wire format produced by the graph
//! service: a single object with `roots`, `vertices`, `edges` and `depths`.

use std::fs;
use std::path::Path;

use crate::error::SnapshotError;
use crate::subgraph::Subgraph;

/// Load a snapshot from a JSON file.
pub fn load(path: &Path) -> Result<Subgraph, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let subgraph: Subgraph =
        serde_json::from_str(&raw).map_err(|source| SnapshotError::Json {
            path: path.display().to_string(),
            source,
        })?;

    tracing::debug!(
        path = %path.display(),
        roots = subgraph.roots.len(),
        ontology_vertices = subgraph.vertices.ontology_len(),
        entity_vertices = subgraph.vertices.knowledge_graph_len(),
        edges = subgraph.edges.len(),
        "loaded subgraph snapshot"
    );

    Ok(subgraph)
}

/// Write a snapshot to a JSON file, pretty-printed.
pub fn save(subgraph: &Subgraph, path: &Path) -> Result<(), SnapshotError> {
    let raw = serde_json::to_string_pretty(subgraph).map_err(|source| SnapshotError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, raw).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subgraph::GraphResolveDepths;

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }

    #[test]
    fn load_garbage_is_json_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("garbage.json");
        fs::write(&path, "{not json").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::Json { .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");

        let subgraph = Subgraph::new(GraphResolveDepths::default());
        save(&subgraph, &path).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back, subgraph);
    }
}
