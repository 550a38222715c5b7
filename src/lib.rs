//! # ontograph
//!
//! A client-side toolkit for bitemporal knowledge-graph snapshots. A remote
//! graph service answers queries with an immutable **subgraph**: the requested
//! root elements plus their neighborhood, pre-resolved to bounded depths.
//! This crate models that snapshot and everything a client does with it.
//!
//! ## Architecture
//!
//! - **Identifiers** (`identifier`): versioned uris for ontology types,
//!   `owner%uuid` composite ids and bitemporal versions for entities
//! - **Elements** (`ontology`, `knowledge`): type schemas and entities with
//!   provenance metadata
//! - **Snapshot** (`subgraph`): the `roots`/`vertices`/`edges`/`depths`
//!   structure and its exact wire round-trip
//! - **Accessors** (`access`): pure lookups — root resolution, per-kind
//!   element access, effective-version-at-timestamp, edge-kind filters
//! - **Draft store** (`store`): the block editor's saved/draft dual-layer
//!   cache with last-writer-wins reconciliation
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use ontograph::access;
//!
//! let subgraph = ontograph::snapshot::load(Path::new("snapshot.json")).unwrap();
//! subgraph.validate().unwrap();
//! for entity_type in access::roots_as_entity_types(&subgraph).unwrap() {
//!     println!("{}", entity_type.schema.title);
//! }
//! ```

pub mod access;
pub mod error;
pub mod identifier;
pub mod knowledge;
pub mod ontology;
pub mod snapshot;
pub mod store;
pub mod subgraph;
