//! Entity type accessors.

use crate::error::SubgraphError;
use crate::identifier::{BaseUri, OntologyTypeEditionId, VersionedUri};
use crate::ontology::EntityTypeWithMetadata;
use crate::subgraph::{OntologyVertex, Subgraph};

/// All entity types in the snapshot.
pub fn entity_types(subgraph: &Subgraph) -> Vec<&EntityTypeWithMetadata> {
    subgraph
        .vertices
        .ontology
        .values()
        .flat_map(|revisions| revisions.values())
        .filter_map(|vertex| match vertex {
            OntologyVertex::EntityType(et) => Some(&**et),
            _ => None,
        })
        .collect()
}

/// An entity type by its exact edition id. `None` if absent.
///
/// # Errors
///
/// Returns an error if the vertex at that key is not an entity type.
pub fn entity_type_by_edition_id<'s>(
    subgraph: &'s Subgraph,
    edition_id: &OntologyTypeEditionId,
) -> Result<Option<&'s EntityTypeWithMetadata>, SubgraphError> {
    match subgraph.vertices.ontology_vertex(edition_id) {
        None => Ok(None),
        Some(OntologyVertex::EntityType(et)) => Ok(Some(et)),
        Some(other) => Err(SubgraphError::WrongVertexKind {
            vertex_id: edition_id.to_string(),
            expected: "entityType",
            found: other.kind(),
        }),
    }
}

/// An entity type by its versioned uri. `None` if absent.
///
/// # Errors
///
/// Returns an error if the vertex at that key is not an entity type.
pub fn entity_type_by_uri<'s>(
    subgraph: &'s Subgraph,
    uri: &VersionedUri,
) -> Result<Option<&'s EntityTypeWithMetadata>, SubgraphError> {
    entity_type_by_edition_id(subgraph, &OntologyTypeEditionId::from(uri))
}

/// All revisions of an entity type, oldest first. Empty if the base uri is
/// unknown.
///
/// # Errors
///
/// Returns an error if any vertex under the base uri is not an entity type.
pub fn entity_types_by_base_uri<'s>(
    subgraph: &'s Subgraph,
    base_uri: &BaseUri,
) -> Result<Vec<&'s EntityTypeWithMetadata>, SubgraphError> {
    let Some(revisions) = subgraph.vertices.ontology.get(base_uri) else {
        return Ok(Vec::new());
    };
    revisions
        .iter()
        .map(|(version, vertex)| match vertex {
            OntologyVertex::EntityType(et) => Ok(&**et),
            other => Err(SubgraphError::WrongVertexKind {
                vertex_id: OntologyTypeEditionId::new(base_uri.clone(), *version).to_string(),
                expected: "entityType",
                found: other.kind(),
            }),
        })
        .collect()
}
