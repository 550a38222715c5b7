//! Rich diagnostic error types for ontograph.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains. The crate distinguishes
//! two tiers: a plain "not found" is an `Option`/empty result, never an error;
//! these types are reserved for malformed identifiers and structural-integrity
//! violations, which callers should treat as upstream-service or programmer bugs
//! rather than retryable conditions.

use miette::Diagnostic;
use thiserror::Error;

use crate::store::StoreError;

/// Top-level error type for ontograph.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum OntoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Subgraph(#[from] SubgraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Snapshot(#[from] SnapshotError),
}

// ---------------------------------------------------------------------------
// Identifier errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IdentifierError {
    #[error("malformed entity id: {input}")]
    #[diagnostic(
        code(onto::identifier::malformed_entity_id),
        help(
            "An entity id is the owning account uuid and the entity uuid joined \
             by a single `%`, e.g. `a1b2…%c3d4…`. Check that both components are \
             valid uuids and that exactly one separator is present."
        )
    )]
    MalformedEntityId { input: String },

    #[error("malformed versioned uri: {input}")]
    #[diagnostic(
        code(onto::identifier::malformed_versioned_uri),
        help(
            "A versioned uri is a base uri followed by `v/` and a numeric \
             version, e.g. `https://example.com/types/person/v/3`. The version \
             component must be an unsigned integer."
        )
    )]
    MalformedVersionedUri { input: String },

    #[error("malformed timestamp: {input}")]
    #[diagnostic(
        code(onto::identifier::malformed_timestamp),
        help("Timestamps are RFC 3339 datetime strings, e.g. `2022-11-04T12:00:00Z`.")
    )]
    MalformedTimestamp { input: String },
}

// ---------------------------------------------------------------------------
// Subgraph errors
// ---------------------------------------------------------------------------

/// Structural-integrity violations in a subgraph snapshot.
///
/// The remote graph service guarantees that every root and every edge endpoint
/// has a corresponding vertex; these errors mean that contract was broken and
/// the snapshot cannot be trusted.
#[derive(Debug, Error, Diagnostic)]
pub enum SubgraphError {
    #[error("root {vertex_id} has no corresponding vertex")]
    #[diagnostic(
        code(onto::subgraph::root_vertex_missing),
        help(
            "Every identifier in `roots` must have an entry in `vertices`. \
             This snapshot violates the integrity contract of the graph \
             service that produced it — the snapshot is unusable as-is."
        )
    )]
    RootVertexMissing { vertex_id: String },

    #[error("expected a {expected} vertex at {vertex_id} but found {found}")]
    #[diagnostic(
        code(onto::subgraph::wrong_vertex_kind),
        help(
            "A typed accessor was called on a vertex of a different element \
             kind. Use the untyped accessor, or one of the `is_*_rooted` \
             guards to narrow the root kind first."
        )
    )]
    WrongVertexKind {
        vertex_id: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("edge from {source_id} points at {right_endpoint}, which has no vertex")]
    #[diagnostic(
        code(onto::subgraph::endpoint_vertex_missing),
        help(
            "Every edge right-endpoint must have an entry in `vertices`. \
             The graph service flattens edges only for elements it also \
             includes, so a dangling endpoint means the snapshot is corrupt."
        )
    )]
    EndpointVertexMissing {
        source_id: String,
        right_endpoint: String,
    },
}

// ---------------------------------------------------------------------------
// Snapshot I/O errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SnapshotError {
    #[error("I/O error reading snapshot {path}: {source}")]
    #[diagnostic(
        code(onto::snapshot::io),
        help("Check that the snapshot file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is not valid subgraph JSON: {source}")]
    #[diagnostic(
        code(onto::snapshot::json),
        help(
            "The file must contain a subgraph object with `roots`, `vertices`, \
             `edges` and `depths` fields as produced by the graph service. \
             Identifier shapes (`owner%uuid` entity ids, `…v/N` versioned uris) \
             must be exact."
        )
    )]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for functions returning ontograph results.
pub type OntoResult<T> = std::result::Result<T, OntoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_error_converts_to_onto_error() {
        let err = IdentifierError::MalformedEntityId {
            input: "no-separator".into(),
        };
        let onto: OntoError = err.into();
        assert!(matches!(
            onto,
            OntoError::Identifier(IdentifierError::MalformedEntityId { .. })
        ));
    }

    #[test]
    fn subgraph_error_converts_to_onto_error() {
        let err = SubgraphError::RootVertexMissing {
            vertex_id: "x".into(),
        };
        let onto: OntoError = err.into();
        assert!(matches!(
            onto,
            OntoError::Subgraph(SubgraphError::RootVertexMissing { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = SubgraphError::WrongVertexKind {
            vertex_id: "https://example.com/types/name/v/1".into(),
            expected: "propertyType",
            found: "entityType",
        };
        let msg = format!("{err}");
        assert!(msg.contains("propertyType"));
        assert!(msg.contains("entityType"));
        assert!(msg.contains("v/1"));
    }
}
