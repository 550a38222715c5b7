//! Identifier and time types for graph elements.
//!
//! Two identifier families exist: ontology types (data, property and entity
//! types) are addressed by a base uri plus a numeric version, while entities
//! are addressed by an `owner%uuid` composite id plus a bitemporal version.
//! Both wire forms come from the remote graph service and must round-trip
//! exactly — `EntityId` serializes as the `%`-joined string, [`VersionedUri`]
//! as `<base>v/<version>`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::IdentifierError;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// An instant on one of the bitemporal axes, RFC 3339 on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn as_date_time(self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl FromStr for Timestamp {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|_| IdentifierError::MalformedTimestamp { input: s.into() })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
    }
}

/// A half-open interval `[start, end)` on one time axis.
///
/// `end: None` means the interval is unbounded — the edition is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    pub start: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,
}

impl TimeInterval {
    pub fn new(start: Timestamp, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// An interval open at the end: the edition is current as of `start`.
    pub fn from_start(start: Timestamp) -> Self {
        Self { start, end: None }
    }

    /// Whether `instant` falls within `[start, end)`.
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start <= instant && self.end.is_none_or(|end| instant < end)
    }
}

/// The bitemporal version of one entity edition.
///
/// Decision time is when the fact was decided to be true; transaction time is
/// when the graph service recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityVersion {
    pub decision_time: TimeInterval,
    pub transaction_time: TimeInterval,
}

impl EntityVersion {
    pub fn new(decision_time: TimeInterval, transaction_time: TimeInterval) -> Self {
        Self {
            decision_time,
            transaction_time,
        }
    }
}

// ---------------------------------------------------------------------------
// Accounts and entity ids
// ---------------------------------------------------------------------------

/// Identifier of an account (an actor in provenance metadata).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The account that owns an element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct OwnedById(AccountId);

impl OwnedById {
    pub fn new(account_id: AccountId) -> Self {
        Self(account_id)
    }

    pub fn as_account_id(self) -> AccountId {
        self.0
    }
}

impl fmt::Display for OwnedById {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The uuid component of an entity id, unique within an owning account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct EntityUuid(Uuid);

impl EntityUuid {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EntityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite entity identifier: owning account and entity uuid.
///
/// On the wire this is the single string `<owner>%<uuid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    owned_by_id: OwnedById,
    entity_uuid: EntityUuid,
}

impl EntityId {
    pub fn new(owned_by_id: OwnedById, entity_uuid: EntityUuid) -> Self {
        Self {
            owned_by_id,
            entity_uuid,
        }
    }

    pub fn owned_by_id(&self) -> OwnedById {
        self.owned_by_id
    }

    pub fn entity_uuid(&self) -> EntityUuid {
        self.entity_uuid
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%{}", self.owned_by_id, self.entity_uuid)
    }
}

impl FromStr for EntityId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdentifierError::MalformedEntityId { input: s.into() };

        let mut parts = s.split('%');
        let owner = parts.next().ok_or_else(|| malformed())?;
        let entity = parts.next().ok_or_else(|| malformed())?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            owned_by_id: OwnedById::new(AccountId::new(
                Uuid::from_str(owner).map_err(|_| malformed())?,
            )),
            entity_uuid: EntityUuid::new(Uuid::from_str(entity).map_err(|_| malformed())?),
        })
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Discriminator for the record of one entity edition in the graph service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct EntityRecordId(i64);

impl EntityRecordId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

/// Identifier of one specific edition of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityEditionId {
    pub base_id: EntityId,
    pub record_id: EntityRecordId,
    pub version: EntityVersion,
}

impl EntityEditionId {
    pub fn new(base_id: EntityId, record_id: EntityRecordId, version: EntityVersion) -> Self {
        Self {
            base_id,
            record_id,
            version,
        }
    }
}

/// An entity at a given moment of its lifespan.
///
/// The timestamp may be any instant, not necessarily an edition boundary; it is
/// how knowledge-graph edges qualify which version of their endpoint they mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIdAndTimestamp {
    pub base_id: EntityId,
    pub timestamp: Timestamp,
}

impl EntityIdAndTimestamp {
    pub fn new(base_id: EntityId, timestamp: Timestamp) -> Self {
        Self { base_id, timestamp }
    }
}

// ---------------------------------------------------------------------------
// Ontology type ids
// ---------------------------------------------------------------------------

/// The unversioned uri of an ontology type.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct BaseUri(String);

impl BaseUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Version counter of an ontology type. Versions start at 1 and increment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct OntologyTypeVersion(u32);

impl OntologyTypeVersion {
    pub fn new(version: u32) -> Self {
        Self(version)
    }

    pub fn inner(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OntologyTypeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A versioned ontology type uri: `<base>v/<version>` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionedUri {
    base_uri: BaseUri,
    version: OntologyTypeVersion,
}

impl VersionedUri {
    pub fn new(base_uri: BaseUri, version: OntologyTypeVersion) -> Self {
        Self { base_uri, version }
    }

    pub fn base_uri(&self) -> &BaseUri {
        &self.base_uri
    }

    pub fn version(&self) -> OntologyTypeVersion {
        self.version
    }
}

impl fmt::Display for VersionedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v/{}", self.base_uri, self.version)
    }
}

impl FromStr for VersionedUri {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdentifierError::MalformedVersionedUri { input: s.into() };

        // The base uri itself may contain `v/` segments; the version suffix is
        // whatever follows the *last* occurrence.
        let idx = s.rfind("v/").ok_or_else(|| malformed())?;
        let (base, rest) = s.split_at(idx);
        let version: u32 = rest[2..].parse().map_err(|_| malformed())?;
        if base.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            base_uri: BaseUri::new(base),
            version: OntologyTypeVersion::new(version),
        })
    }
}

impl Serialize for VersionedUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionedUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Identifier of one edition of an ontology type: base uri + version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyTypeEditionId {
    pub base_id: BaseUri,
    pub version: OntologyTypeVersion,
}

impl OntologyTypeEditionId {
    pub fn new(base_id: BaseUri, version: OntologyTypeVersion) -> Self {
        Self { base_id, version }
    }
}

impl From<&VersionedUri> for OntologyTypeEditionId {
    fn from(uri: &VersionedUri) -> Self {
        Self {
            base_id: uri.base_uri().clone(),
            version: uri.version(),
        }
    }
}

impl From<&OntologyTypeEditionId> for VersionedUri {
    fn from(edition_id: &OntologyTypeEditionId) -> Self {
        Self::new(edition_id.base_id.clone(), edition_id.version)
    }
}

impl fmt::Display for OntologyTypeEditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v/{}", self.base_id, self.version)
    }
}

// ---------------------------------------------------------------------------
// Vertex ids (root identifiers)
// ---------------------------------------------------------------------------

/// Exact key of an entity vertex: base id plus the revision timestamp the
/// vertex map is keyed by (the transaction-time start of the edition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityVertexId {
    pub base_id: EntityId,
    pub version: Timestamp,
}

impl EntityVertexId {
    pub fn new(base_id: EntityId, version: Timestamp) -> Self {
        Self { base_id, version }
    }
}

impl fmt::Display for EntityVertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.base_id, self.version)
    }
}

/// Identifier of any vertex in a subgraph — the type of `roots` entries.
///
/// Serde is untagged: ontology ids have a numeric version, entity ids a
/// timestamp string, so the two shapes never overlap on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphElementVertexId {
    Ontology(OntologyTypeEditionId),
    KnowledgeGraph(EntityVertexId),
}

impl From<OntologyTypeEditionId> for GraphElementVertexId {
    fn from(id: OntologyTypeEditionId) -> Self {
        Self::Ontology(id)
    }
}

impl From<EntityVertexId> for GraphElementVertexId {
    fn from(id: EntityVertexId) -> Self {
        Self::KnowledgeGraph(id)
    }
}

impl fmt::Display for GraphElementVertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ontology(id) => write!(f, "{id}"),
            Self::KnowledgeGraph(id) => write!(f, "{id}"),
        }
    }
}
