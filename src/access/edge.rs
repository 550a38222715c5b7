//! Edge-kind-filtered lookups: type references and link traversal.
//!
//! The graph service has already flattened the relevant depth of the graph
//! into per-vertex outward edges, so these are list filters, not traversals.

use crate::error::SubgraphError;
use crate::identifier::{EntityIdAndTimestamp, EntityVertexId, OntologyTypeEditionId};
use crate::knowledge::Entity;
use crate::subgraph::{
    KnowledgeGraphEdgeKind, KnowledgeGraphOutwardEdge, OntologyEdgeKind, OntologyOutwardEdge,
    Subgraph,
};

use super::entity::entity_at_timestamp;

fn ontology_references<'s>(
    subgraph: &'s Subgraph,
    edition_id: &OntologyTypeEditionId,
    kind: OntologyEdgeKind,
) -> Vec<&'s OntologyTypeEditionId> {
    subgraph
        .edges
        .ontology_edges(edition_id)
        .unwrap_or_default()
        .iter()
        .filter_map(|edge| match edge {
            OntologyOutwardEdge::ToOntology(edge) if edge.kind == kind && !edge.reversed => {
                Some(&edge.right_endpoint)
            }
            _ => None,
        })
        .collect()
}

/// The property types an entity type constrains properties on.
///
/// Exactly the right endpoints of outward `CONSTRAINS_PROPERTIES_ON` edges;
/// every other edge kind on the same vertex is excluded.
pub fn property_type_ids_referenced_by_entity_type<'s>(
    subgraph: &'s Subgraph,
    entity_type_id: &OntologyTypeEditionId,
) -> Vec<&'s OntologyTypeEditionId> {
    ontology_references(subgraph, entity_type_id, OntologyEdgeKind::ConstrainsPropertiesOn)
}

/// The link entity types an entity type constrains links on.
pub fn entity_type_ids_referenced_by_entity_type<'s>(
    subgraph: &'s Subgraph,
    entity_type_id: &OntologyTypeEditionId,
) -> Vec<&'s OntologyTypeEditionId> {
    ontology_references(subgraph, entity_type_id, OntologyEdgeKind::ConstrainsLinksOn)
}

/// The property types a property type references from its schema.
pub fn property_type_ids_referenced_by_property_type<'s>(
    subgraph: &'s Subgraph,
    property_type_id: &OntologyTypeEditionId,
) -> Vec<&'s OntologyTypeEditionId> {
    ontology_references(
        subgraph,
        property_type_id,
        OntologyEdgeKind::ConstrainsPropertiesOn,
    )
}

/// The data types a property type constrains its values on.
pub fn data_type_ids_referenced_by_property_type<'s>(
    subgraph: &'s Subgraph,
    property_type_id: &OntologyTypeEditionId,
) -> Vec<&'s OntologyTypeEditionId> {
    ontology_references(subgraph, property_type_id, OntologyEdgeKind::ConstrainsValuesOn)
}

fn resolve_link_endpoint<'s>(
    subgraph: &'s Subgraph,
    source: &EntityVertexId,
    endpoint: &EntityIdAndTimestamp,
) -> Result<&'s Entity, SubgraphError> {
    entity_at_timestamp(subgraph, &endpoint.base_id, endpoint.timestamp).ok_or_else(|| {
        SubgraphError::EndpointVertexMissing {
            source_id: source.to_string(),
            right_endpoint: endpoint.base_id.to_string(),
        }
    })
}

fn link_edges<'s>(
    subgraph: &'s Subgraph,
    vertex_id: &EntityVertexId,
    kind: KnowledgeGraphEdgeKind,
    reversed: bool,
) -> impl Iterator<Item = &'s EntityIdAndTimestamp> {
    subgraph
        .edges
        .knowledge_graph_edges(vertex_id)
        .unwrap_or_default()
        .iter()
        .filter_map(move |edge| match edge {
            KnowledgeGraphOutwardEdge::ToKnowledgeGraph(edge)
                if edge.kind == kind && edge.reversed == reversed =>
            {
                Some(&edge.right_endpoint)
            }
            _ => None,
        })
}

/// The link entities leaving an entity (reversed `HAS_LEFT_ENTITY` edges).
///
/// # Errors
///
/// Returns an error if an edge endpoint has no effective vertex — a violation
/// of the snapshot's integrity contract.
pub fn outgoing_link_entities<'s>(
    subgraph: &'s Subgraph,
    vertex_id: &EntityVertexId,
) -> Result<Vec<&'s Entity>, SubgraphError> {
    link_edges(subgraph, vertex_id, KnowledgeGraphEdgeKind::HasLeftEntity, true)
        .map(|endpoint| resolve_link_endpoint(subgraph, vertex_id, endpoint))
        .collect()
}

/// The link entities arriving at an entity (reversed `HAS_RIGHT_ENTITY` edges).
///
/// # Errors
///
/// Returns an error if an edge endpoint has no effective vertex.
pub fn incoming_link_entities<'s>(
    subgraph: &'s Subgraph,
    vertex_id: &EntityVertexId,
) -> Result<Vec<&'s Entity>, SubgraphError> {
    link_edges(subgraph, vertex_id, KnowledgeGraphEdgeKind::HasRightEntity, true)
        .map(|endpoint| resolve_link_endpoint(subgraph, vertex_id, endpoint))
        .collect()
}

/// The entity on the left endpoint of a link entity, if the edge was resolved.
///
/// # Errors
///
/// Returns an error if the edge endpoint has no effective vertex.
pub fn left_entity_of_link<'s>(
    subgraph: &'s Subgraph,
    link_vertex_id: &EntityVertexId,
) -> Result<Option<&'s Entity>, SubgraphError> {
    link_edges(
        subgraph,
        link_vertex_id,
        KnowledgeGraphEdgeKind::HasLeftEntity,
        false,
    )
    .next()
    .map(|endpoint| resolve_link_endpoint(subgraph, link_vertex_id, endpoint))
    .transpose()
}

/// The entity on the right endpoint of a link entity, if the edge was resolved.
///
/// # Errors
///
/// Returns an error if the edge endpoint has no effective vertex.
pub fn right_entity_of_link<'s>(
    subgraph: &'s Subgraph,
    link_vertex_id: &EntityVertexId,
) -> Result<Option<&'s Entity>, SubgraphError> {
    link_edges(
        subgraph,
        link_vertex_id,
        KnowledgeGraphEdgeKind::HasRightEntity,
        false,
    )
    .next()
    .map(|endpoint| resolve_link_endpoint(subgraph, link_vertex_id, endpoint))
    .transpose()
}
