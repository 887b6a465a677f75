//! Channel catalog
//!
//! The catalog accumulates partial channel updates from the backend and turns
//! them into a typed channel list on request.
//!
//! # Architecture
//!
//! ```text
//!   HTSP channelAdd/channelUpdate
//!               │
//!               ▼
//!      ChannelCatalog::add()  ──► TunerEnrichment::add_tuner_info()
//!               │
//!               ▼
//!   ┌─────────────────────────────────┐
//!   │ records: Mutex<BTreeMap<id,     │   one lock for add / clean / build
//!   │   HtsMessage (merged fields)    │
//!   │ >>                              │
//!   └───────────────┬─────────────────┘
//!                   │ build_catalog(cancel)
//!                   ▼
//!   icon ──► name ──► number ──► kind ──► ChannelEntry
//!    │
//!    └──► IconCache (first write wins) ◄── lookup_icon()
//! ```
//!
//! # Merge rules
//!
//! A channel id is only accepted on first sight when the update carries a
//! `channelNumber` greater than zero. Once accepted, every later update for
//! that id replaces the fields it carries and leaves the rest alone.

pub mod classify;
pub mod config;
pub mod entry;
pub mod icon;
pub mod store;

pub use classify::{classify_record, classify_service_type, OtherTypePolicy, ParsePolicyError};
pub use config::CatalogConfig;
pub use entry::{ChannelEntry, ChannelIcon, ChannelKind};
pub use icon::IconCache;
pub use store::{AddOutcome, ChannelCatalog};
