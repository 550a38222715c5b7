//! Property type accessors.

use crate::error::SubgraphError;
use crate::identifier::{BaseUri, OntologyTypeEditionId, VersionedUri};
use crate::ontology::PropertyTypeWithMetadata;
use crate::subgraph::{OntologyVertex, Subgraph};

/// All property types in the snapshot.
pub fn property_types(subgraph: &Subgraph) -> Vec<&PropertyTypeWithMetadata> {
    subgraph
        .vertices
        .ontology
        .values()
        .flat_map(|revisions| revisions.values())
        .filter_map(|vertex| match vertex {
            OntologyVertex::PropertyType(pt) => Some(&**pt),
            _ => None,
        })
        .collect()
}

/// A property type by its exact edition id. `None` if absent.
///
/// # Errors
///
/// Returns an error if the vertex at that key is not a property type.
pub fn property_type_by_edition_id<'s>(
    subgraph: &'s Subgraph,
    edition_id: &OntologyTypeEditionId,
) -> Result<Option<&'s PropertyTypeWithMetadata>, SubgraphError> {
    match subgraph.vertices.ontology_vertex(edition_id) {
        None => Ok(None),
        Some(OntologyVertex::PropertyType(pt)) => Ok(Some(pt)),
        Some(other) => Err(SubgraphError::WrongVertexKind {
            vertex_id: edition_id.to_string(),
            expected: "propertyType",
            found: other.kind(),
        }),
    }
}

/// A property type by its versioned uri. `None` if absent.
///
/// # Errors
///
/// Returns an error if the vertex at that key is not a property type.
pub fn property_type_by_uri<'s>(
    subgraph: &'s Subgraph,
    uri: &VersionedUri,
) -> Result<Option<&'s PropertyTypeWithMetadata>, SubgraphError> {
    property_type_by_edition_id(subgraph, &OntologyTypeEditionId::from(uri))
}

/// All revisions of a property type, oldest first. Empty if the base uri is
/// unknown.
///
/// # Errors
///
/// Returns an error if any vertex under the base uri is not a property type.
pub fn property_types_by_base_uri<'s>(
    subgraph: &'s Subgraph,
    base_uri: &BaseUri,
) -> Result<Vec<&'s PropertyTypeWithMetadata>, SubgraphError> {
    let Some(revisions) = subgraph.vertices.ontology.get(base_uri) else {
        return Ok(Vec::new());
    };
    revisions
        .iter()
        .map(|(version, vertex)| match vertex {
            OntologyVertex::PropertyType(pt) => Ok(&**pt),
            other => Err(SubgraphError::WrongVertexKind {
                vertex_id: OntologyTypeEditionId::new(base_uri.clone(), *version).to_string(),
                expected: "propertyType",
                found: other.kind(),
            }),
        })
        .collect()
}
