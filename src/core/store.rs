//! Holder of the single active dataset.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::diagnostics::IngestDiagnostics;
use crate::core::table::MessageTable;
use crate::error::{Result, StatsError};

/// Where a dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
    /// Accepted files in input file order
    pub filenames: Vec<String>,
    /// Total size of the upload batch in bytes
    pub total_bytes: u64,
    /// When the ingest completed
    pub ingested_at: DateTime<Utc>,
    /// Non-fatal problems found while building the table
    pub diagnostics: IngestDiagnostics,
}

/// One immutable message table plus its metadata.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// The merged messages
    pub table: MessageTable,
    /// Source metadata
    pub meta: DatasetMeta,
}

impl Dataset {
    /// Creates a dataset.
    pub fn new(table: MessageTable, meta: DatasetMeta) -> Self {
        Self { table, meta }
    }
}

/// Shared slot for the latest dataset.
///
/// Writers build a complete [`Dataset`] first and then swap it in under the
/// write lock. Readers clone the `Arc` and release the lock immediately, so a
/// query in progress keeps computing on the dataset it started with even if
/// a new ingest replaces it.
///
/// # Example
///
/// ```
/// use tgstats::core::DatasetStore;
///
/// let store = DatasetStore::new();
/// assert!(store.get().unwrap_err().is_no_dataset());
/// ```
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active dataset, returning the one it displaced.
    pub fn replace(&self, dataset: Dataset) -> Option<Arc<Dataset>> {
        let messages = dataset.table.len();
        let files = dataset.meta.filenames.len();
        let next = Arc::new(dataset);

        let previous = {
            let mut slot = self
                .current
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            slot.replace(next)
        };

        info!(messages, files, "dataset replaced");
        previous
    }

    /// Returns the active dataset.
    ///
    /// Fails with [`StatsError::NoDataset`] before the first ingest.
    pub fn get(&self) -> Result<Arc<Dataset>> {
        self.current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
            .ok_or(StatsError::NoDataset)
    }

    /// Returns `true` once a dataset has been stored.
    pub fn is_loaded(&self) -> bool {
        self.get().is_ok()
    }
}
