//! # tvh-catalog
//!
//! Live-TV channel catalog fed by TVHeadend's HTSP channel updates.
//!
//! The backend pushes `channelAdd`/`channelUpdate` messages that may carry
//! only some of a channel's fields, may repeat, and may arrive before the
//! channel has a number. [`ChannelCatalog`] merges them per channel id and,
//! on request, builds a list of [`ChannelEntry`] values with the channel kind
//! derived from its services and its icon resolved to a remote URL or a
//! locally cached locator.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tokio_util::sync::CancellationToken;
//! use tvh_catalog::{ChannelCatalog, HtsMessage};
//!
//! # async fn example() {
//! let catalog = Arc::new(ChannelCatalog::new());
//!
//! catalog
//!     .add(
//!         HtsMessage::new()
//!             .with("channelId", 12)
//!             .with("channelNumber", 1)
//!             .with("channelName", "Das Erste HD")
//!             .with("services", vec![HtsMessage::new().with("type", "HDTV")]),
//!     )
//!     .await;
//!
//! let channels = catalog
//!     .build_catalog(CancellationToken::new())
//!     .await
//!     .expect("build task panicked");
//! for channel in &channels {
//!     println!("{}", channel);
//! }
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod htsmsg;
pub mod tuner;

pub use catalog::{
    AddOutcome, CatalogConfig, ChannelCatalog, ChannelEntry, ChannelIcon, ChannelKind,
    OtherTypePolicy,
};
pub use error::{Error, FieldError, HtsmsgError, Result};
pub use htsmsg::{HtsMessage, HtsValue};
pub use tuner::{NoopTuner, TunerEnrichment};
