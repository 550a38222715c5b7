//! Entity accessors, including effective-version resolution by timestamp.

use crate::identifier::{EntityId, EntityVertexId, Timestamp};
use crate::knowledge::Entity;
use crate::subgraph::{KnowledgeGraphVertex, Subgraph};

/// All entity revisions in the snapshot.
pub fn entities(subgraph: &Subgraph) -> Vec<&Entity> {
    subgraph
        .vertices
        .knowledge_graph
        .values()
        .flat_map(|revisions| revisions.values())
        .map(KnowledgeGraphVertex::entity)
        .collect()
}

/// An entity revision by its exact vertex id. `None` if absent.
pub fn entity_by_vertex_id<'s>(
    subgraph: &'s Subgraph,
    vertex_id: &EntityVertexId,
) -> Option<&'s Entity> {
    subgraph
        .vertices
        .entity_vertex(vertex_id)
        .map(KnowledgeGraphVertex::entity)
}

/// All revisions of one entity, oldest first. Empty if the id is unknown.
pub fn entity_editions<'s>(subgraph: &'s Subgraph, entity_id: &EntityId) -> Vec<&'s Entity> {
    subgraph
        .vertices
        .knowledge_graph
        .get(entity_id)
        .map(|revisions| revisions.values().map(KnowledgeGraphVertex::entity).collect())
        .unwrap_or_default()
}

/// The entity revision effective at `timestamp`: the latest revision whose
/// start-of-validity is at or before the queried instant.
///
/// Revisions are keyed by their start timestamp and pre-filtered by the graph
/// service, so this is a bounded ordered-map walk — no interval structure
/// needed. `None` if the id is unknown or every revision starts later.
pub fn entity_at_timestamp<'s>(
    subgraph: &'s Subgraph,
    entity_id: &EntityId,
    timestamp: Timestamp,
) -> Option<&'s Entity> {
    subgraph
        .vertices
        .knowledge_graph
        .get(entity_id)?
        .range(..=timestamp)
        .next_back()
        .map(|(_, vertex)| vertex.entity())
}
