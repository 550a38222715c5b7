//! Ontology element records: data types, property types and entity types.
//!
//! Schemas arrive fully resolved from the remote graph service and are carried
//! verbatim — the snapshot layer indexes and serves them, it does not validate
//! them. Only the fields the accessors need (`$id`, `title`) are lifted out;
//! the rest of the schema body stays as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::identifier::{AccountId, OntologyTypeEditionId, OwnedById, VersionedUri};

/// Who last touched an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceMetadata {
    pub updated_by_id: AccountId,
}

impl ProvenanceMetadata {
    pub fn new(updated_by_id: AccountId) -> Self {
        Self { updated_by_id }
    }
}

/// Metadata common to every ontology element edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyElementMetadata {
    pub edition_id: OntologyTypeEditionId,
    pub owned_by_id: OwnedById,
    pub provenance: ProvenanceMetadata,
}

/// A versioned type schema as produced by the graph service.
///
/// The same shape serves data types, property types and entity types; the
/// vertex kind distinguishes them, not the schema body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// The versioned uri identifying this schema edition.
    #[serde(rename = "$id")]
    pub id: VersionedUri,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining schema body, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl TypeSchema {
    pub fn new(id: VersionedUri, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// A data type together with its edition metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTypeWithMetadata {
    pub schema: TypeSchema,
    pub metadata: OntologyElementMetadata,
}

/// A property type together with its edition metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTypeWithMetadata {
    pub schema: TypeSchema,
    pub metadata: OntologyElementMetadata,
}

/// An entity type together with its edition metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeWithMetadata {
    pub schema: TypeSchema,
    pub metadata: OntologyElementMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{BaseUri, OntologyTypeVersion};
    use uuid::Uuid;

    #[test]
    fn schema_keeps_unknown_fields() {
        let json = serde_json::json!({
            "$id": "https://example.com/types/person/v/2",
            "title": "Person",
            "kind": "entityType",
            "properties": { "name": {} },
        });
        let schema: TypeSchema = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(schema.title, "Person");
        assert_eq!(schema.id.version().inner(), 2);
        assert!(schema.extra.contains_key("properties"));

        // Round-trip must preserve the extra body.
        let back = serde_json::to_value(&schema).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn metadata_serializes_camel_case() {
        let metadata = OntologyElementMetadata {
            edition_id: OntologyTypeEditionId::new(
                BaseUri::new("https://example.com/types/person/"),
                OntologyTypeVersion::new(1),
            ),
            owned_by_id: OwnedById::new(AccountId::new(Uuid::nil())),
            provenance: ProvenanceMetadata::new(AccountId::new(Uuid::nil())),
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert!(json.get("editionId").is_some());
        assert!(json.get("ownedById").is_some());
        assert!(json["provenance"].get("updatedById").is_some());
    }
}
