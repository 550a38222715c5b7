//! Vertices: the versioned element revisions of a subgraph snapshot.
//!
//! On the wire, `vertices` is a single mapping `base id → revision → vertex`,
//! where ontology revisions are numeric versions and entity revisions are
//! transaction-time start timestamps. Internally the two families live in
//! typed maps so an entity vertex can never appear under an ontology key;
//! serialization flattens them back into the one wire mapping.

use std::collections::{BTreeMap, HashMap};

use serde::de::Error as _;
use serde::ser::SerializeMap as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::identifier::{
    BaseUri, EntityId, EntityVertexId, OntologyTypeEditionId, OntologyTypeVersion, Timestamp,
};
use crate::knowledge::Entity;
use crate::ontology::{DataTypeWithMetadata, EntityTypeWithMetadata, PropertyTypeWithMetadata};

/// A vertex wrapping an ontology element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "inner", rename_all = "camelCase")]
pub enum OntologyVertex {
    DataType(Box<DataTypeWithMetadata>),
    PropertyType(Box<PropertyTypeWithMetadata>),
    EntityType(Box<EntityTypeWithMetadata>),
}

impl OntologyVertex {
    /// The wire name of this vertex's element kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataType(_) => "dataType",
            Self::PropertyType(_) => "propertyType",
            Self::EntityType(_) => "entityType",
        }
    }

    /// The edition id this vertex is keyed by.
    pub fn edition_id(&self) -> OntologyTypeEditionId {
        match self {
            Self::DataType(dt) => dt.metadata.edition_id.clone(),
            Self::PropertyType(pt) => pt.metadata.edition_id.clone(),
            Self::EntityType(et) => et.metadata.edition_id.clone(),
        }
    }
}

/// A vertex wrapping a knowledge-graph element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "inner", rename_all = "camelCase")]
pub enum KnowledgeGraphVertex {
    Entity(Box<Entity>),
}

impl KnowledgeGraphVertex {
    pub fn entity(&self) -> &Entity {
        match self {
            Self::Entity(entity) => entity,
        }
    }

    /// The vertex id this vertex is keyed by.
    pub fn vertex_id(&self) -> EntityVertexId {
        let entity = self.entity();
        EntityVertexId::new(entity.entity_id(), entity.revision())
    }
}

/// Any vertex of a subgraph. Serde is untagged; the `kind` tag of the inner
/// representations discriminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vertex {
    Ontology(OntologyVertex),
    KnowledgeGraph(KnowledgeGraphVertex),
}

impl Vertex {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ontology(vertex) => vertex.kind(),
            Self::KnowledgeGraph(KnowledgeGraphVertex::Entity(_)) => "entity",
        }
    }
}

impl From<DataTypeWithMetadata> for Vertex {
    fn from(data_type: DataTypeWithMetadata) -> Self {
        Self::Ontology(OntologyVertex::DataType(Box::new(data_type)))
    }
}

impl From<PropertyTypeWithMetadata> for Vertex {
    fn from(property_type: PropertyTypeWithMetadata) -> Self {
        Self::Ontology(OntologyVertex::PropertyType(Box::new(property_type)))
    }
}

impl From<EntityTypeWithMetadata> for Vertex {
    fn from(entity_type: EntityTypeWithMetadata) -> Self {
        Self::Ontology(OntologyVertex::EntityType(Box::new(entity_type)))
    }
}

impl From<Entity> for Vertex {
    fn from(entity: Entity) -> Self {
        Self::KnowledgeGraph(KnowledgeGraphVertex::Entity(Box::new(entity)))
    }
}

/// A borrowed view of the element inside a vertex.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    DataType(&'a DataTypeWithMetadata),
    PropertyType(&'a PropertyTypeWithMetadata),
    EntityType(&'a EntityTypeWithMetadata),
    Entity(&'a Entity),
}

impl<'a> ElementRef<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataType(_) => "dataType",
            Self::PropertyType(_) => "propertyType",
            Self::EntityType(_) => "entityType",
            Self::Entity(_) => "entity",
        }
    }
}

impl<'a> From<&'a OntologyVertex> for ElementRef<'a> {
    fn from(vertex: &'a OntologyVertex) -> Self {
        match vertex {
            OntologyVertex::DataType(dt) => Self::DataType(dt),
            OntologyVertex::PropertyType(pt) => Self::PropertyType(pt),
            OntologyVertex::EntityType(et) => Self::EntityType(et),
        }
    }
}

impl<'a> From<&'a KnowledgeGraphVertex> for ElementRef<'a> {
    fn from(vertex: &'a KnowledgeGraphVertex) -> Self {
        Self::Entity(vertex.entity())
    }
}

/// All vertices of a snapshot, split by identifier family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertices {
    pub ontology: HashMap<BaseUri, BTreeMap<OntologyTypeVersion, OntologyVertex>>,
    pub knowledge_graph: HashMap<EntityId, BTreeMap<Timestamp, KnowledgeGraphVertex>>,
}

impl Vertices {
    /// Look up an ontology vertex by its exact edition id.
    pub fn ontology_vertex(&self, edition_id: &OntologyTypeEditionId) -> Option<&OntologyVertex> {
        self.ontology
            .get(&edition_id.base_id)?
            .get(&edition_id.version)
    }

    /// Look up an entity vertex by its exact vertex id.
    pub fn entity_vertex(&self, vertex_id: &EntityVertexId) -> Option<&KnowledgeGraphVertex> {
        self.knowledge_graph
            .get(&vertex_id.base_id)?
            .get(&vertex_id.version)
    }

    /// Insert a vertex, returning the one it replaced, if any.
    pub fn insert(&mut self, vertex: Vertex) -> Option<Vertex> {
        match vertex {
            Vertex::Ontology(vertex) => {
                let edition_id = vertex.edition_id();
                self.ontology
                    .entry(edition_id.base_id)
                    .or_default()
                    .insert(edition_id.version, vertex)
                    .map(Vertex::Ontology)
            }
            Vertex::KnowledgeGraph(vertex) => {
                let vertex_id = vertex.vertex_id();
                self.knowledge_graph
                    .entry(vertex_id.base_id)
                    .or_default()
                    .insert(vertex_id.version, vertex)
                    .map(Vertex::KnowledgeGraph)
            }
        }
    }

    /// Number of ontology element revisions.
    pub fn ontology_len(&self) -> usize {
        self.ontology.values().map(BTreeMap::len).sum()
    }

    /// Number of entity revisions.
    pub fn knowledge_graph_len(&self) -> usize {
        self.knowledge_graph.values().map(BTreeMap::len).sum()
    }
}

impl Serialize for Vertices {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map =
            serializer.serialize_map(Some(self.ontology.len() + self.knowledge_graph.len()))?;
        for (base_uri, revisions) in &self.ontology {
            let revisions: BTreeMap<String, &OntologyVertex> = revisions
                .iter()
                .map(|(version, vertex)| (version.to_string(), vertex))
                .collect();
            map.serialize_entry(base_uri.as_str(), &revisions)?;
        }
        for (entity_id, revisions) in &self.knowledge_graph {
            let revisions: BTreeMap<String, &KnowledgeGraphVertex> = revisions
                .iter()
                .map(|(timestamp, vertex)| (timestamp.to_string(), vertex))
                .collect();
            map.serialize_entry(&entity_id.to_string(), &revisions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Vertices {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: HashMap<String, BTreeMap<String, Vertex>> = HashMap::deserialize(deserializer)?;
        let mut vertices = Self::default();

        for (base, revisions) in raw {
            for (revision, vertex) in revisions {
                match vertex {
                    Vertex::Ontology(vertex) => {
                        let version: u32 = revision.parse().map_err(|_| {
                            D::Error::custom(format!(
                                "ontology vertex at {base} keyed by non-numeric revision `{revision}`"
                            ))
                        })?;
                        vertices
                            .ontology
                            .entry(BaseUri::new(base.clone()))
                            .or_default()
                            .insert(OntologyTypeVersion::new(version), vertex);
                    }
                    Vertex::KnowledgeGraph(vertex) => {
                        let entity_id: EntityId = base.parse().map_err(D::Error::custom)?;
                        let timestamp: Timestamp =
                            revision.parse().map_err(D::Error::custom)?;
                        vertices
                            .knowledge_graph
                            .entry(entity_id)
                            .or_default()
                            .insert(timestamp, vertex);
                    }
                }
            }
        }

        Ok(vertices)
    }
}
