//! Edges: typed, directed relationships between snapshot elements.
//!
//! The graph service flattens every relationship it resolved into a per-vertex
//! list of outward edges, so consumers can walk type references and links
//! without a traversal engine. An edge's `reversed` flag records that the
//! relationship was traversed against its natural direction (e.g. an entity's
//! *incoming* links are `HAS_RIGHT_ENTITY` edges with `reversed: true`).

use std::collections::{BTreeMap, HashMap};

use serde::de::Error as _;
use serde::ser::SerializeMap as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::identifier::{
    BaseUri, EntityId, EntityIdAndTimestamp, EntityVertexId, OntologyTypeEditionId,
    OntologyTypeVersion, Timestamp,
};

// ---------------------------------------------------------------------------
// Edge kinds
// ---------------------------------------------------------------------------

/// Relationships between ontology types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OntologyEdgeKind {
    /// An ontology type inherits from another ontology type.
    InheritsFrom,
    /// A property type or data type constrains its values on a data type.
    ConstrainsValuesOn,
    /// An entity type or property type constrains properties on a property type.
    ConstrainsPropertiesOn,
    /// An entity type constrains which link types may leave its instances.
    ConstrainsLinksOn,
    /// An entity type constrains the destination types of certain links.
    ConstrainsLinkDestinationsOn,
}

/// Relationships between entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KnowledgeGraphEdgeKind {
    /// This link entity has another entity on its left endpoint.
    HasLeftEntity,
    /// This link entity has another entity on its right endpoint.
    HasRightEntity,
}

/// Relationships crossing from entities into the ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SharedEdgeKind {
    /// An entity is an instance of an entity type.
    IsOfType,
}

/// One outward edge: a kind, a traversal direction, and the target element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutwardEdge<K, E> {
    pub kind: K,
    pub reversed: bool,
    pub right_endpoint: E,
}

/// An outward edge recorded on an ontology vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OntologyOutwardEdge {
    ToOntology(OutwardEdge<OntologyEdgeKind, OntologyTypeEditionId>),
    ToKnowledgeGraph(OutwardEdge<SharedEdgeKind, EntityIdAndTimestamp>),
}

/// An outward edge recorded on an entity vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KnowledgeGraphOutwardEdge {
    ToKnowledgeGraph(OutwardEdge<KnowledgeGraphEdgeKind, EntityIdAndTimestamp>),
    ToOntology(OutwardEdge<SharedEdgeKind, OntologyTypeEditionId>),
}

// ---------------------------------------------------------------------------
// Edge sets
// ---------------------------------------------------------------------------

/// All edges of a snapshot, keyed like the vertex maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edges {
    pub ontology: HashMap<BaseUri, BTreeMap<OntologyTypeVersion, Vec<OntologyOutwardEdge>>>,
    pub knowledge_graph: HashMap<EntityId, BTreeMap<Timestamp, Vec<KnowledgeGraphOutwardEdge>>>,
}

impl Edges {
    /// Outward edges of an ontology vertex, if any were resolved.
    pub fn ontology_edges(
        &self,
        edition_id: &OntologyTypeEditionId,
    ) -> Option<&[OntologyOutwardEdge]> {
        self.ontology
            .get(&edition_id.base_id)?
            .get(&edition_id.version)
            .map(Vec::as_slice)
    }

    /// Outward edges of an entity vertex, if any were resolved.
    pub fn knowledge_graph_edges(
        &self,
        vertex_id: &EntityVertexId,
    ) -> Option<&[KnowledgeGraphOutwardEdge]> {
        self.knowledge_graph
            .get(&vertex_id.base_id)?
            .get(&vertex_id.version)
            .map(Vec::as_slice)
    }

    /// Record an outward edge on an ontology vertex.
    ///
    /// Returns whether the edge was newly inserted; an identical edge is not
    /// recorded twice.
    pub fn insert_ontology(
        &mut self,
        edition_id: &OntologyTypeEditionId,
        edge: OntologyOutwardEdge,
    ) -> bool {
        let edges = self
            .ontology
            .entry(edition_id.base_id.clone())
            .or_default()
            .entry(edition_id.version)
            .or_default();
        if edges.contains(&edge) {
            false
        } else {
            edges.push(edge);
            true
        }
    }

    /// Record an outward edge on an entity vertex.
    pub fn insert_knowledge_graph(
        &mut self,
        vertex_id: &EntityVertexId,
        edge: KnowledgeGraphOutwardEdge,
    ) -> bool {
        let edges = self
            .knowledge_graph
            .entry(vertex_id.base_id)
            .or_default()
            .entry(vertex_id.version)
            .or_default();
        if edges.contains(&edge) {
            false
        } else {
            edges.push(edge);
            true
        }
    }

    /// Merge another edge set into this one, deduplicating.
    pub fn extend(&mut self, other: Self) {
        for (base_id, revisions) in other.ontology {
            for (version, edges) in revisions {
                let edition_id = OntologyTypeEditionId::new(base_id.clone(), version);
                for edge in edges {
                    self.insert_ontology(&edition_id, edge);
                }
            }
        }
        for (base_id, revisions) in other.knowledge_graph {
            for (version, edges) in revisions {
                let vertex_id = EntityVertexId::new(base_id, version);
                for edge in edges {
                    self.insert_knowledge_graph(&vertex_id, edge);
                }
            }
        }
    }

    /// Total number of recorded edges.
    pub fn len(&self) -> usize {
        let ontology: usize = self
            .ontology
            .values()
            .flat_map(|revisions| revisions.values())
            .map(Vec::len)
            .sum();
        let knowledge: usize = self
            .knowledge_graph
            .values()
            .flat_map(|revisions| revisions.values())
            .map(Vec::len)
            .sum();
        ontology + knowledge
    }

    pub fn is_empty(&self) -> bool {
        self.ontology.is_empty() && self.knowledge_graph.is_empty()
    }
}

impl Serialize for Edges {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map =
            serializer.serialize_map(Some(self.ontology.len() + self.knowledge_graph.len()))?;
        for (base_uri, revisions) in &self.ontology {
            let revisions: BTreeMap<String, &Vec<OntologyOutwardEdge>> = revisions
                .iter()
                .map(|(version, edges)| (version.to_string(), edges))
                .collect();
            map.serialize_entry(base_uri.as_str(), &revisions)?;
        }
        for (entity_id, revisions) in &self.knowledge_graph {
            let revisions: BTreeMap<String, &Vec<KnowledgeGraphOutwardEdge>> = revisions
                .iter()
                .map(|(timestamp, edges)| (timestamp.to_string(), edges))
                .collect();
            map.serialize_entry(&entity_id.to_string(), &revisions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Edges {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The wire mapping mixes both families; the key shape (entity ids
        // contain `%`) decides which typed map an entry belongs to.
        let raw: HashMap<String, BTreeMap<String, serde_json::Value>> =
            HashMap::deserialize(deserializer)?;
        let mut edges = Self::default();

        for (base, revisions) in raw {
            if let Ok(entity_id) = base.parse::<EntityId>() {
                for (revision, value) in revisions {
                    let timestamp: Timestamp = revision.parse().map_err(D::Error::custom)?;
                    let outward: Vec<KnowledgeGraphOutwardEdge> =
                        serde_json::from_value(value).map_err(D::Error::custom)?;
                    edges
                        .knowledge_graph
                        .entry(entity_id)
                        .or_default()
                        .insert(timestamp, outward);
                }
            } else {
                for (revision, value) in revisions {
                    let version: u32 = revision.parse().map_err(|_| {
                        D::Error::custom(format!(
                            "ontology edges at {base} keyed by non-numeric revision `{revision}`"
                        ))
                    })?;
                    let outward: Vec<OntologyOutwardEdge> =
                        serde_json::from_value(value).map_err(D::Error::custom)?;
                    edges
                        .ontology
                        .entry(BaseUri::new(base.clone()))
                        .or_default()
                        .insert(OntologyTypeVersion::new(version), outward);
                }
            }
        }

        Ok(edges)
    }
}

// ---------------------------------------------------------------------------
// Resolve depths
// ---------------------------------------------------------------------------

/// How many hops were resolved along one edge kind, per direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeResolveDepths {
    pub incoming: u8,
    pub outgoing: u8,
}

impl EdgeResolveDepths {
    /// Widen to the deeper of the two depths. Returns whether anything changed.
    pub fn update(&mut self, other: Self) -> bool {
        let mut changed = false;
        if other.incoming > self.incoming {
            self.incoming = other.incoming;
            changed = true;
        }
        if other.outgoing > self.outgoing {
            self.outgoing = other.outgoing;
            changed = true;
        }
        changed
    }
}

/// How many outgoing hops were resolved along one edge kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutgoingEdgeResolveDepth {
    pub outgoing: u8,
}

impl OutgoingEdgeResolveDepth {
    pub fn update(&mut self, other: Self) -> bool {
        if other.outgoing > self.outgoing {
            self.outgoing = other.outgoing;
            true
        } else {
            false
        }
    }
}

/// The resolve depths a snapshot was built with, one field per edge kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GraphResolveDepths {
    pub inherits_from: OutgoingEdgeResolveDepth,
    pub constrains_values_on: OutgoingEdgeResolveDepth,
    pub constrains_properties_on: OutgoingEdgeResolveDepth,
    pub constrains_links_on: OutgoingEdgeResolveDepth,
    pub constrains_link_destinations_on: OutgoingEdgeResolveDepth,
    pub is_of_type: OutgoingEdgeResolveDepth,
    pub has_left_entity: EdgeResolveDepths,
    pub has_right_entity: EdgeResolveDepths,
}

impl GraphResolveDepths {
    /// Widen every depth to the deeper of the two. Returns whether anything changed.
    pub fn update(&mut self, other: Self) -> bool {
        [
            self.inherits_from.update(other.inherits_from),
            self.constrains_values_on.update(other.constrains_values_on),
            self.constrains_properties_on
                .update(other.constrains_properties_on),
            self.constrains_links_on.update(other.constrains_links_on),
            self.constrains_link_destinations_on
                .update(other.constrains_link_destinations_on),
            self.is_of_type.update(other.is_of_type),
            self.has_left_entity.update(other.has_left_entity),
            self.has_right_entity.update(other.has_right_entity),
        ]
        .into_iter()
        .any(|changed| changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_kinds_serialize_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&OntologyEdgeKind::ConstrainsPropertiesOn).unwrap(),
            "\"CONSTRAINS_PROPERTIES_ON\""
        );
        assert_eq!(
            serde_json::to_string(&KnowledgeGraphEdgeKind::HasLeftEntity).unwrap(),
            "\"HAS_LEFT_ENTITY\""
        );
        assert_eq!(
            serde_json::to_string(&SharedEdgeKind::IsOfType).unwrap(),
            "\"IS_OF_TYPE\""
        );
    }

    #[test]
    fn resolve_depths_update_widens() {
        let mut depths = GraphResolveDepths::default();
        let wider = GraphResolveDepths {
            constrains_properties_on: OutgoingEdgeResolveDepth { outgoing: 2 },
            has_left_entity: EdgeResolveDepths {
                incoming: 1,
                outgoing: 1,
            },
            ..Default::default()
        };
        assert!(depths.update(wider));
        assert_eq!(depths.constrains_properties_on.outgoing, 2);
        assert_eq!(depths.has_left_entity.incoming, 1);
        // Updating with something shallower changes nothing.
        assert!(!depths.update(GraphResolveDepths::default()));
    }

    #[test]
    fn insert_deduplicates() {
        let mut edges = Edges::default();
        let edition_id = OntologyTypeEditionId::new(
            crate::identifier::BaseUri::new("https://example.com/types/person/"),
            OntologyTypeVersion::new(1),
        );
        let edge = OntologyOutwardEdge::ToOntology(OutwardEdge {
            kind: OntologyEdgeKind::ConstrainsPropertiesOn,
            reversed: false,
            right_endpoint: OntologyTypeEditionId::new(
                crate::identifier::BaseUri::new("https://example.com/types/name/"),
                OntologyTypeVersion::new(1),
            ),
        });
        assert!(edges.insert_ontology(&edition_id, edge.clone()));
        assert!(!edges.insert_ontology(&edition_id, edge));
        assert_eq!(edges.len(), 1);
    }
}
