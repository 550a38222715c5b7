//! Pure accessors over a subgraph snapshot.
//!
//! Every function here is a synchronous read over `&Subgraph`. Two outcome
//! tiers apply throughout: a simple miss is `None` or an empty `Vec`, while a
//! structural-integrity violation (a root without a vertex, a vertex of the
//! wrong kind behind a typed accessor) is a [`SubgraphError`] — callers should
//! treat those as bugs in the producing service, not as retryable conditions.
//!
//! [`SubgraphError`]: crate::error::SubgraphError

pub mod data_type;
pub mod edge;
pub mod entity;
pub mod entity_type;
pub mod property_type;
pub mod roots;

pub use self::data_type::{
    data_type_by_edition_id, data_type_by_uri, data_types, data_types_by_base_uri,
};
pub use self::edge::{
    data_type_ids_referenced_by_property_type, entity_type_ids_referenced_by_entity_type,
    incoming_link_entities, left_entity_of_link, outgoing_link_entities,
    property_type_ids_referenced_by_entity_type, property_type_ids_referenced_by_property_type,
    right_entity_of_link,
};
pub use self::entity::{entities, entity_at_timestamp, entity_by_vertex_id, entity_editions};
pub use self::entity_type::{
    entity_type_by_edition_id, entity_type_by_uri, entity_types, entity_types_by_base_uri,
};
pub use self::property_type::{
    property_type_by_edition_id, property_type_by_uri, property_types,
    property_types_by_base_uri,
};
pub use self::roots::{
    is_data_type_rooted, is_entity_rooted, is_entity_type_rooted, is_property_type_rooted,
    roots, roots_as_data_types, roots_as_entities, roots_as_entity_types,
    roots_as_property_types,
};
