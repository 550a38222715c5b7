//! Subgraph snapshots: immutable, pre-resolved views of the knowledge graph.
//!
//! A snapshot is built wholesale by the remote graph service in response to a
//! single query: `roots` names the elements the query was about, `vertices`
//! holds every element revision pulled in up to the requested resolve depths,
//! and `edges` records the relationships the service flattened while
//! resolving. Consumers only read; the construction API below exists for the
//! service boundary and for test fixtures.
//!
//! Integrity contract: every root and every edge endpoint has a vertex.
//! [`Subgraph::validate`] checks it; the strict accessors in [`crate::access`]
//! rely on it.

pub mod edges;
pub mod vertex;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SubgraphError;
use crate::identifier::{EntityVertexId, GraphElementVertexId, OntologyTypeEditionId};

pub use self::edges::{
    EdgeResolveDepths, Edges, GraphResolveDepths, KnowledgeGraphEdgeKind,
    KnowledgeGraphOutwardEdge, OntologyEdgeKind, OntologyOutwardEdge, OutgoingEdgeResolveDepth,
    OutwardEdge, SharedEdgeKind,
};
pub use self::vertex::{ElementRef, KnowledgeGraphVertex, OntologyVertex, Vertex, Vertices};

/// An immutable snapshot of requested elements and their neighborhood.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    pub roots: Vec<GraphElementVertexId>,
    pub vertices: Vertices,
    pub edges: Edges,
    pub depths: GraphResolveDepths,
}

impl Subgraph {
    /// Create an empty subgraph recording the depths it will be resolved to.
    pub fn new(depths: GraphResolveDepths) -> Self {
        Self {
            roots: Vec::new(),
            vertices: Vertices::default(),
            edges: Edges::default(),
            depths,
        }
    }

    /// Insert an element, returning the vertex it replaced at its key, if any.
    pub fn insert(&mut self, vertex: impl Into<Vertex>) -> Option<Vertex> {
        self.vertices.insert(vertex.into())
    }

    /// Insert an element and record it as a root.
    pub fn insert_as_root(&mut self, vertex: impl Into<Vertex>) -> Option<Vertex> {
        let vertex = vertex.into();
        let vertex_id = match &vertex {
            Vertex::Ontology(vertex) => GraphElementVertexId::Ontology(vertex.edition_id()),
            Vertex::KnowledgeGraph(vertex) => {
                GraphElementVertexId::KnowledgeGraph(vertex.vertex_id())
            }
        };
        let replaced = self.vertices.insert(vertex);
        if !self.roots.contains(&vertex_id) {
            self.roots.push(vertex_id);
        }
        replaced
    }

    /// Record an outward edge on an ontology vertex. Returns whether it was new.
    pub fn insert_ontology_edge(
        &mut self,
        edition_id: &OntologyTypeEditionId,
        edge: OntologyOutwardEdge,
    ) -> bool {
        self.edges.insert_ontology(edition_id, edge)
    }

    /// Record an outward edge on an entity vertex. Returns whether it was new.
    pub fn insert_knowledge_graph_edge(
        &mut self,
        vertex_id: &EntityVertexId,
        edge: KnowledgeGraphOutwardEdge,
    ) -> bool {
        self.edges.insert_knowledge_graph(vertex_id, edge)
    }

    /// Merge another subgraph into this one.
    ///
    /// Vertices from `other` win on key collisions, edges deduplicate, roots
    /// union, and depths widen to the deeper of the two.
    pub fn extend(&mut self, other: Self) {
        for root in other.roots {
            if !self.roots.contains(&root) {
                self.roots.push(root);
            }
        }
        for vertex in other.vertices.ontology.into_values().flat_map(BTreeMap::into_values) {
            self.vertices.insert(Vertex::Ontology(vertex));
        }
        for vertex in other
            .vertices
            .knowledge_graph
            .into_values()
            .flat_map(BTreeMap::into_values)
        {
            self.vertices.insert(Vertex::KnowledgeGraph(vertex));
        }
        self.edges.extend(other.edges);
        self.depths.update(other.depths);
    }

    /// Check the integrity contract over the whole snapshot.
    ///
    /// Reports the first violation found: a root without a vertex, or an edge
    /// whose source or right endpoint has no vertex. A valid snapshot is safe
    /// for every strict accessor.
    pub fn validate(&self) -> Result<(), SubgraphError> {
        for root in &self.roots {
            let present = match root {
                GraphElementVertexId::Ontology(id) => {
                    self.vertices.ontology_vertex(id).is_some()
                }
                GraphElementVertexId::KnowledgeGraph(id) => {
                    self.vertices.entity_vertex(id).is_some()
                }
            };
            if !present {
                return Err(SubgraphError::RootVertexMissing {
                    vertex_id: root.to_string(),
                });
            }
        }

        for (base_id, revisions) in &self.edges.ontology {
            for (version, outward) in revisions {
                let source = OntologyTypeEditionId::new(base_id.clone(), *version);
                if self.vertices.ontology_vertex(&source).is_none() {
                    return Err(SubgraphError::EndpointVertexMissing {
                        source_id: source.to_string(),
                        right_endpoint: source.to_string(),
                    });
                }
                for edge in outward {
                    self.check_ontology_edge(&source, edge)?;
                }
            }
        }

        for (base_id, revisions) in &self.edges.knowledge_graph {
            for (version, outward) in revisions {
                let source = EntityVertexId::new(*base_id, *version);
                if self.vertices.entity_vertex(&source).is_none() {
                    return Err(SubgraphError::EndpointVertexMissing {
                        source_id: source.to_string(),
                        right_endpoint: source.to_string(),
                    });
                }
                for edge in outward {
                    self.check_knowledge_graph_edge(&source, edge)?;
                }
            }
        }

        Ok(())
    }

    fn check_ontology_edge(
        &self,
        source: &OntologyTypeEditionId,
        edge: &OntologyOutwardEdge,
    ) -> Result<(), SubgraphError> {
        let present = match edge {
            OntologyOutwardEdge::ToOntology(edge) => self
                .vertices
                .ontology_vertex(&edge.right_endpoint)
                .is_some(),
            OntologyOutwardEdge::ToKnowledgeGraph(edge) => self
                .entity_present_at(&edge.right_endpoint),
        };
        if present {
            Ok(())
        } else {
            Err(SubgraphError::EndpointVertexMissing {
                source_id: source.to_string(),
                right_endpoint: match edge {
                    OntologyOutwardEdge::ToOntology(edge) => edge.right_endpoint.to_string(),
                    OntologyOutwardEdge::ToKnowledgeGraph(edge) => {
                        edge.right_endpoint.base_id.to_string()
                    }
                },
            })
        }
    }

    fn check_knowledge_graph_edge(
        &self,
        source: &EntityVertexId,
        edge: &KnowledgeGraphOutwardEdge,
    ) -> Result<(), SubgraphError> {
        let present = match edge {
            KnowledgeGraphOutwardEdge::ToKnowledgeGraph(edge) => {
                self.entity_present_at(&edge.right_endpoint)
            }
            KnowledgeGraphOutwardEdge::ToOntology(edge) => self
                .vertices
                .ontology_vertex(&edge.right_endpoint)
                .is_some(),
        };
        if present {
            Ok(())
        } else {
            Err(SubgraphError::EndpointVertexMissing {
                source_id: source.to_string(),
                right_endpoint: match edge {
                    KnowledgeGraphOutwardEdge::ToKnowledgeGraph(edge) => {
                        edge.right_endpoint.base_id.to_string()
                    }
                    KnowledgeGraphOutwardEdge::ToOntology(edge) => {
                        edge.right_endpoint.to_string()
                    }
                },
            })
        }
    }

    /// Whether some revision of the endpoint entity is effective at the
    /// edge's qualifying timestamp.
    fn entity_present_at(&self, endpoint: &crate::identifier::EntityIdAndTimestamp) -> bool {
        self.vertices
            .knowledge_graph
            .get(&endpoint.base_id)
            .is_some_and(|revisions| {
                revisions.range(..=endpoint.timestamp).next_back().is_some()
            })
    }
}
