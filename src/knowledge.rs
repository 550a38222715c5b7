//! Knowledge-graph element records: entities and their link data.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::identifier::{EntityEditionId, EntityId, Timestamp, VersionedUri};
use crate::ontology::ProvenanceMetadata;

/// Properties of an entity, keyed by the base uri of the property type.
pub type PropertyObject = serde_json::Map<String, JsonValue>;

/// Link payload, present iff the entity represents a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    pub left_entity_id: EntityId,
    pub right_entity_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_to_right_order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_to_left_order: Option<u32>,
}

impl LinkData {
    pub fn new(left_entity_id: EntityId, right_entity_id: EntityId) -> Self {
        Self {
            left_entity_id,
            right_entity_id,
            left_to_right_order: None,
            right_to_left_order: None,
        }
    }
}

/// Metadata of one entity edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub edition_id: EntityEditionId,
    pub entity_type_id: VersionedUri,
    pub provenance: ProvenanceMetadata,
    pub archived: bool,
}

/// An entity edition: typed properties plus optional link data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub properties: PropertyObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_data: Option<LinkData>,
    pub metadata: EntityMetadata,
}

impl Entity {
    /// The composite id this entity shares across all its editions.
    pub fn entity_id(&self) -> EntityId {
        self.metadata.edition_id.base_id
    }

    /// The revision key of this edition: the transaction-time start.
    pub fn revision(&self) -> Timestamp {
        self.metadata.edition_id.version.transaction_time.start
    }

    /// The decision-time start of this edition, used for last-writer-wins
    /// comparisons in the draft store.
    pub fn decision_time_start(&self) -> Timestamp {
        self.metadata.edition_id.version.decision_time.start
    }

    /// Whether this entity represents a link between two other entities.
    pub fn is_link(&self) -> bool {
        self.link_data.is_some()
    }
}
