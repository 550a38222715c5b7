//! Data type accessors.

use crate::error::SubgraphError;
use crate::identifier::{BaseUri, OntologyTypeEditionId, VersionedUri};
use crate::ontology::DataTypeWithMetadata;
use crate::subgraph::{OntologyVertex, Subgraph};

/// All data types in the snapshot.
pub fn data_types(subgraph: &Subgraph) -> Vec<&DataTypeWithMetadata> {
    subgraph
        .vertices
        .ontology
        .values()
        .flat_map(|revisions| revisions.values())
        .filter_map(|vertex| match vertex {
            OntologyVertex::DataType(dt) => Some(&**dt),
            _ => None,
        })
        .collect()
}

/// A data type by its exact edition id. `None` if absent.
///
/// # Errors
///
/// Returns an error if the vertex at that key is not a data type.
pub fn data_type_by_edition_id<'s>(
    subgraph: &'s Subgraph,
    edition_id: &OntologyTypeEditionId,
) -> Result<Option<&'s DataTypeWithMetadata>, SubgraphError> {
    match subgraph.vertices.ontology_vertex(edition_id) {
        None => Ok(None),
        Some(OntologyVertex::DataType(dt)) => Ok(Some(dt)),
        Some(other) => Err(SubgraphError::WrongVertexKind {
            vertex_id: edition_id.to_string(),
            expected: "dataType",
            found: other.kind(),
        }),
    }
}

/// A data type by its versioned uri. `None` if absent.
///
/// # Errors
///
/// Returns an error if the vertex at that key is not a data type.
pub fn data_type_by_uri<'s>(
    subgraph: &'s Subgraph,
    uri: &VersionedUri,
) -> Result<Option<&'s DataTypeWithMetadata>, SubgraphError> {
    data_type_by_edition_id(subgraph, &OntologyTypeEditionId::from(uri))
}

/// All revisions of a data type, oldest first. Empty if the base uri is
/// unknown.
///
/// # Errors
///
/// Returns an error if any vertex under the base uri is not a data type.
pub fn data_types_by_base_uri<'s>(
    subgraph: &'s Subgraph,
    base_uri: &BaseUri,
) -> Result<Vec<&'s DataTypeWithMetadata>, SubgraphError> {
    let Some(revisions) = subgraph.vertices.ontology.get(base_uri) else {
        return Ok(Vec::new());
    };
    revisions
        .iter()
        .map(|(version, vertex)| match vertex {
            OntologyVertex::DataType(dt) => Ok(&**dt),
            other => Err(SubgraphError::WrongVertexKind {
                vertex_id: OntologyTypeEditionId::new(base_uri.clone(), *version).to_string(),
                expected: "dataType",
                found: other.kind(),
            }),
        })
        .collect()
}
