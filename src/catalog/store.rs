//! Channel catalog implementation
//!
//! Merges channel updates into raw records and builds the published channel
//! list from them on demand.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::FieldError;
use crate::htsmsg::HtsMessage;
use crate::tuner::{NoopTuner, TunerEnrichment};

use super::classify::{classify_record, OtherTypePolicy};
use super::config::CatalogConfig;
use super::entry::{format_channel_number, ChannelEntry, ChannelIcon};
use super::icon::{is_remote_icon, IconCache};

const FIELD_CHANNEL_ID: &str = "channelId";
const FIELD_CHANNEL_NUMBER: &str = "channelNumber";
const FIELD_CHANNEL_NUMBER_MINOR: &str = "channelNumberMinor";
const FIELD_CHANNEL_NAME: &str = "channelName";
const FIELD_CHANNEL_ICON: &str = "channelIcon";

/// What `add` did with an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// First sight of the channel, stored as a new record
    Created,
    /// Fields merged into an existing record
    Merged,
    /// Unknown channel without a positive channel number
    Dropped,
    /// Update could not be read and was discarded
    Rejected,
}

/// Per-record result of a catalog build
enum RecordOutcome {
    Entry(ChannelEntry),
    BlankName,
    Unclassified,
}

/// Live channel catalog
///
/// Records are keyed by channel id and guarded by a single mutex; `add`,
/// `clean` and the iteration of a build never overlap. The icon cache is
/// locked separately so `lookup_icon` stays synchronous.
pub struct ChannelCatalog {
    /// Raw merged record per channel id
    records: Mutex<BTreeMap<u32, HtsMessage>>,

    /// Locally resolved icons, filled during builds
    icons: IconCache,

    /// Current `OtherTypePolicy`, stored as u8
    other_type_policy: AtomicU8,

    /// Enrichment port
    tuner: Box<dyn TunerEnrichment>,

    /// Configuration
    config: CatalogConfig,
}

impl ChannelCatalog {
    /// Create a catalog with default configuration and no enrichment
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create a catalog with custom configuration
    pub fn with_config(config: CatalogConfig) -> Self {
        Self::with_tuner(config, NoopTuner)
    }

    /// Create a catalog with custom configuration and enrichment port
    pub fn with_tuner(config: CatalogConfig, tuner: impl TunerEnrichment) -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            icons: IconCache::new(),
            other_type_policy: AtomicU8::new(config.other_type_policy.to_u8()),
            tuner: Box::new(tuner),
            config,
        }
    }

    /// Get the catalog configuration
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Set how services tagged `other` are classified by later builds
    pub fn set_other_type_policy(&self, policy: OtherTypePolicy) {
        self.other_type_policy.store(policy.to_u8(), Ordering::Relaxed);
        tracing::debug!(policy = %policy, "Channel type policy for 'other' updated");
    }

    /// Current policy for services tagged `other`
    pub fn other_type_policy(&self) -> OtherTypePolicy {
        OtherTypePolicy::from_u8(self.other_type_policy.load(Ordering::Relaxed))
    }

    /// Apply a channel update
    ///
    /// A channel is only stored once an update declares a channel number
    /// greater than zero. After that every update for its id is merged field
    /// by field; fields in the update replace stored ones, others are kept.
    /// Unreadable updates are logged and dropped.
    pub async fn add(&self, message: HtsMessage) -> AddOutcome {
        self.tuner.add_tuner_info(&message);

        let mut records = self.records.lock().await;

        let channel_id = match message.get_u32(FIELD_CHANNEL_ID) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, payload = %message, "Rejected channel update");
                return AddOutcome::Rejected;
            }
        };

        if let Some(stored) = records.get_mut(&channel_id) {
            for (name, value) in message {
                stored.put(name, value);
            }
            tracing::trace!(channel_id = channel_id, "Channel record updated");
            return AddOutcome::Merged;
        }

        match message.opt_i64(FIELD_CHANNEL_NUMBER) {
            Ok(Some(number)) if number > 0 => {
                records.insert(channel_id, message);
                tracing::trace!(channel_id = channel_id, number = number, "Channel record created");
                AddOutcome::Created
            }
            Ok(_) => {
                tracing::trace!(channel_id = channel_id, "Ignoring channel without number");
                AddOutcome::Dropped
            }
            Err(e) => {
                tracing::error!(error = %e, payload = %message, "Rejected channel update");
                AddOutcome::Rejected
            }
        }
    }

    /// Drop all records and cached icons
    pub async fn clean(&self) {
        let mut records = self.records.lock().await;
        let dropped = records.len();
        records.clear();
        self.icons.clear();
        self.tuner.clean();

        tracing::info!(records = dropped, "Channel catalog cleared");
    }

    /// Look up the local icon locator recorded for a channel
    pub fn lookup_icon(&self, channel_id: &str) -> Option<String> {
        self.icons.get(channel_id)
    }

    /// Number of locally resolved icons
    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    /// Number of raw channel records
    pub async fn channel_count(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Copy of the raw record for a channel
    pub async fn record(&self, channel_id: u32) -> Option<HtsMessage> {
        self.records.lock().await.get(&channel_id).cloned()
    }

    /// Build the channel list on a spawned task
    ///
    /// Cancelling `cancel` stops the build before the next record and the
    /// task resolves to the channels built so far.
    pub fn build_catalog(
        self: &Arc<Self>,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<Vec<ChannelEntry>> {
        let catalog = Arc::clone(self);
        tokio::spawn(async move { catalog.build(&cancel).await })
    }

    /// Build the channel list on the current task
    ///
    /// Records are visited in ascending channel id order with the store
    /// locked for the whole iteration.
    pub async fn build(&self, cancel: &CancellationToken) -> Vec<ChannelEntry> {
        let records = self.records.lock().await;
        self.build_from(&records, || cancel.is_cancelled())
    }

    fn build_from(
        &self,
        records: &BTreeMap<u32, HtsMessage>,
        mut is_cancelled: impl FnMut() -> bool,
    ) -> Vec<ChannelEntry> {
        let policy = self.other_type_policy();
        let mut result = Vec::with_capacity(records.len());
        let mut blank_names = 0usize;
        let mut unclassified = 0usize;
        let mut failed = 0usize;

        for (&channel_id, record) in records.iter() {
            if is_cancelled() {
                tracing::debug!(
                    built = result.len(),
                    total = records.len(),
                    "Catalog build cancelled, returning partial list"
                );
                return result;
            }

            match self.build_entry(channel_id, record, policy) {
                Ok(RecordOutcome::Entry(entry)) => {
                    tracing::debug!(channel_id = channel_id, name = ?entry.name, "Adding channel");
                    result.push(entry);
                }
                Ok(RecordOutcome::BlankName) => {
                    blank_names += 1;
                }
                Ok(RecordOutcome::Unclassified) => {
                    tracing::debug!(
                        channel_id = channel_id,
                        payload = %record,
                        "Unable to detect service type, skipping channel"
                    );
                    unclassified += 1;
                }
                Err(e) => {
                    tracing::error!(
                        channel_id = channel_id,
                        error = %e,
                        payload = %record,
                        "Failed to build channel entry"
                    );
                    failed += 1;
                }
            }
        }

        tracing::info!(
            channels = result.len(),
            records = records.len(),
            blank_names = blank_names,
            unclassified = unclassified,
            failed = failed,
            "Channel catalog built"
        );

        result
    }

    fn build_entry(
        &self,
        channel_id: u32,
        record: &HtsMessage,
        policy: OtherTypePolicy,
    ) -> Result<RecordOutcome, FieldError> {
        let id = channel_id.to_string();

        // Icons are cached even for records that end up skipped below
        let icon = match record.opt_str(FIELD_CHANNEL_ICON)? {
            Some(value) if is_remote_icon(value, &self.config.remote_icon_schemes) => {
                ChannelIcon::Remote(value.to_string())
            }
            Some(value) => {
                self.icons.insert_if_absent(&id, value);
                ChannelIcon::Local
            }
            None => ChannelIcon::None,
        };

        let name = match record.opt_str(FIELD_CHANNEL_NAME)? {
            Some(name) if name.trim().is_empty() => return Ok(RecordOutcome::BlankName),
            Some(name) => Some(name.to_string()),
            None => None,
        };

        let number = match record.opt_i64(FIELD_CHANNEL_NUMBER)? {
            Some(major) => {
                let minor = record.opt_i64(FIELD_CHANNEL_NUMBER_MINOR)?;
                Some(format_channel_number(major, minor))
            }
            None => None,
        };

        let Some(kind) = classify_record(record, policy)? else {
            return Ok(RecordOutcome::Unclassified);
        };

        Ok(RecordOutcome::Entry(ChannelEntry {
            id,
            name,
            number,
            kind,
            icon,
        }))
    }

    /// Spawn a task that feeds every received update into `add`
    ///
    /// Updates are applied in arrival order. The task ends when all senders
    /// are dropped and resolves to the number of updates processed.
    pub fn spawn_ingest_task(
        self: &Arc<Self>,
        mut rx: mpsc::Receiver<HtsMessage>,
    ) -> tokio::task::JoinHandle<usize> {
        let catalog = Arc::clone(self);

        tokio::spawn(async move {
            let mut processed = 0usize;
            while let Some(message) = rx.recv().await {
                catalog.add(message).await;
                processed += 1;
            }
            tracing::debug!(processed = processed, "Channel ingest finished");
            processed
        })
    }
}

impl Default for ChannelCatalog {
    fn default() -> Self {
        Self::new()
    }
}
