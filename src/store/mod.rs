//! Draft entity store: the block editor's dual-layer cache.
//!
//! The store keeps two layers — `saved` holds server-confirmed entities keyed
//! by entity id, `draft` holds locally edited (possibly unpersisted) entities
//! keyed by draft id. [`EntityStore::build`] reconciles a freshly fetched page
//! (a tree of block entities) with the editor's in-flight drafts on every
//! editor update: last-writer-wins by decision time, block→child links
//! unified onto canonical draft ids.
//!
//! Relationships are expressed as draft-id references into the arena, never as
//! embedded entity objects, so a draft can be updated without touching the
//! drafts it points at.

use std::collections::HashMap;
use std::fmt;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::identifier::{EntityId, Timestamp, VersionedUri};
use crate::knowledge::{Entity, LinkData, PropertyObject};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors specific to entity-store reconciliation.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("preset draft id {draft_id} refers to no draft entity")]
    #[diagnostic(
        code(onto::store::unknown_draft),
        help(
            "A preset draft-id mapping may only bind draft ids that exist in \
             the store being built — either from the page contents or from the \
             in-flight draft data."
        )
    )]
    UnknownDraft { draft_id: String },

    #[error("draft {draft_id} is bound to entity {bound_to}, cannot rebind to {requested}")]
    #[diagnostic(
        code(onto::store::draft_rebind),
        help(
            "Draft ids are stable proxies for entity identity. Once a draft is \
             bound to a persisted entity it must not be retargeted; create a \
             new draft for the other entity instead."
        )
    )]
    DraftRebind {
        draft_id: String,
        bound_to: String,
        requested: String,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Draft identities
// ---------------------------------------------------------------------------

/// Stable, client-local identifier of a draft entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DraftId(String);

impl DraftId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The canonical draft id for a persisted entity.
    ///
    /// Deterministic, so reconciliation is idempotent: rebuilding a store from
    /// the same inputs assigns the same ids.
    pub fn for_entity(entity_id: EntityId) -> Self {
        Self(format!("draft-{entity_id}"))
    }

    /// A fresh draft id for an entity that has never been persisted.
    pub fn fresh() -> Self {
        Self(format!("draft-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Store contents
// ---------------------------------------------------------------------------

/// A block as fetched from the server: the block entity itself, the component
/// it renders with, and at most one child "block data" entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockEntity {
    pub entity: Entity,
    pub component_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_child_entity: Option<Entity>,
}

/// A locally edited layer over an entity.
///
/// `entity_id` is `None` while the entity has never been persisted; once set
/// it must never change (see [`StoreError::DraftRebind`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntity {
    pub draft_id: DraftId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type_id: Option<VersionedUri>,
    pub properties: PropertyObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_data: Option<LinkData>,
    /// Decision-time start of the edition this draft was based on or edited
    /// at. Drives the last-writer-wins merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_time_start: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// For block drafts: the draft id of the child "block data" entity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_child: Option<DraftId>,
}

impl DraftEntity {
    fn from_saved(draft_id: DraftId, entity: &Entity) -> Self {
        Self {
            draft_id,
            entity_id: Some(entity.entity_id()),
            entity_type_id: Some(entity.metadata.entity_type_id.clone()),
            properties: entity.properties.clone(),
            link_data: entity.link_data,
            decision_time_start: Some(entity.decision_time_start()),
            component_id: None,
            block_child: None,
        }
    }

    /// Whether `other` was decided strictly later than this draft.
    ///
    /// A draft with no recorded decision time never wins against one that has
    /// one.
    fn is_superseded_by(&self, other: &Self) -> bool {
        match (other.decision_time_start, self.decision_time_start) {
            (Some(incoming), Some(current)) => incoming > current,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn merge_from(&mut self, other: &Self) {
        if other.entity_id.is_some() {
            self.entity_id = other.entity_id;
        }
        self.entity_type_id = other.entity_type_id.clone();
        self.properties = other.properties.clone();
        self.link_data = other.link_data;
        self.decision_time_start = other.decision_time_start;
        if other.component_id.is_some() {
            self.component_id = other.component_id.clone();
        }
        if other.block_child.is_some() {
            self.block_child = other.block_child.clone();
        }
    }
}

/// The dual-layer cache consumed by the block editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub saved: HashMap<EntityId, Entity>,
    pub draft: HashMap<DraftId, DraftEntity>,
}

impl EntityStore {
    /// Reconcile freshly fetched page contents with in-flight draft data.
    ///
    /// `contents` is the tree of block entities the server returned;
    /// `draft_data` the editor's current drafts, keyed by draft id;
    /// `preset_draft_ids` a caller-supplied mapping of draft ids to the
    /// entity ids they must end up bound to (used when the editor learns the
    /// persisted identity of a previously unsaved draft).
    ///
    /// Construction is synchronous and single-pass over each input, and
    /// idempotent: the same inputs produce a structurally equal store.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnknownDraft`] if a preset refers to a draft id absent
    ///   from the resulting store.
    /// - [`StoreError::DraftRebind`] if a preset would change the persisted
    ///   entity id a draft is already bound to.
    pub fn build(
        contents: &[BlockEntity],
        draft_data: &HashMap<DraftId, DraftEntity>,
        preset_draft_ids: &HashMap<DraftId, EntityId>,
    ) -> StoreResult<Self> {
        // Entity → draft index: presets first, then whatever the in-flight
        // drafts already claim.
        let mut entity_to_draft: HashMap<EntityId, DraftId> = preset_draft_ids
            .iter()
            .map(|(draft_id, entity_id)| (*entity_id, draft_id.clone()))
            .collect();
        for row in draft_data.values() {
            if let Some(entity_id) = row.entity_id {
                entity_to_draft.insert(entity_id, row.draft_id.clone());
            }
        }

        // Flatten the block tree and give every distinct entity a draft id.
        let flattened: Vec<(&Entity, Option<&BlockEntity>)> = contents
            .iter()
            .flat_map(|block| {
                [(&block.entity, Some(block))]
                    .into_iter()
                    .chain(block.block_child_entity.as_ref().map(|child| (child, None)))
            })
            .collect();
        for &(entity, _) in &flattened {
            entity_to_draft
                .entry(entity.entity_id())
                .or_insert_with(|| DraftId::for_entity(entity.entity_id()));
        }

        let mut saved = HashMap::new();
        let mut draft: HashMap<DraftId, DraftEntity> = HashMap::new();

        for &(entity, block) in &flattened {
            let entity_id = entity.entity_id();
            let draft_id = entity_to_draft[&entity_id].clone();

            saved.insert(entity_id, entity.clone());

            let mut draft_entity = DraftEntity::from_saved(draft_id.clone(), entity);
            if let Some(block) = block {
                draft_entity.component_id = Some(block.component_id.clone());
            }
            if let Some(row) = draft_data.get(&draft_id) {
                if draft_entity.is_superseded_by(row) {
                    draft_entity.merge_from(row);
                }
            }
            draft.insert(draft_id, draft_entity);
        }

        // Unify block → child links onto the canonical draft id: the block and
        // its child may have been assigned draft ids independently in
        // different calling contexts.
        for block in contents {
            let Some(child) = &block.block_child_entity else {
                continue;
            };
            let block_draft_id = &entity_to_draft[&block.entity.entity_id()];
            let child_draft_id = entity_to_draft[&child.entity_id()].clone();
            if let Some(block_draft) = draft.get_mut(block_draft_id) {
                block_draft.block_child = Some(child_draft_id);
            }
        }

        // Drafts with no saved counterpart keep their supplied representation.
        // A still-unbound draft picks up its persisted id from the preset
        // mapping; an already-bound one keeps its binding, so a conflicting
        // preset is caught below.
        for (draft_id, row) in draft_data {
            if !draft.contains_key(draft_id) {
                let mut row = row.clone();
                if row.entity_id.is_none() {
                    row.entity_id = preset_draft_ids.get(draft_id).copied();
                }
                draft.insert(draft_id.clone(), row);
            }
        }

        // Bind preset identities, refusing to retarget an existing binding.
        for (draft_id, entity_id) in preset_draft_ids {
            let Some(draft_entity) = draft.get_mut(draft_id) else {
                return Err(StoreError::UnknownDraft {
                    draft_id: draft_id.to_string(),
                });
            };
            match draft_entity.entity_id {
                Some(bound) if bound != *entity_id => {
                    return Err(StoreError::DraftRebind {
                        draft_id: draft_id.to_string(),
                        bound_to: bound.to_string(),
                        requested: entity_id.to_string(),
                    });
                }
                _ => draft_entity.entity_id = Some(*entity_id),
            }
        }

        tracing::debug!(
            saved = saved.len(),
            drafts = draft.len(),
            blocks = contents.len(),
            "reconciled entity store"
        );

        Ok(Self { saved, draft })
    }

    /// The draft entity bound to a persisted entity id, if any.
    pub fn draft_entity_by_entity_id(&self, entity_id: EntityId) -> Option<&DraftEntity> {
        self.draft
            .values()
            .find(|draft| draft.entity_id == Some(entity_id))
    }
}
