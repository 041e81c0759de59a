//! `TableManager`: fetch, reconcile, install, confirm.

use cronpad_table::{parse, ParseOutcome, Reconciler, SaveRequest, Table};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{backend::BackingStore, error::Result};

/// Owns the backing store and runs every table operation against it.
///
/// Saves through one manager are serialized. Writers outside this process
/// are not coordinated with; the last successful install wins.
pub struct TableManager {
    store: Arc<dyn BackingStore>,
    save_lock: tokio::sync::Mutex<()>,
}

impl TableManager {
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self {
            store,
            save_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Read and parse the current table.
    pub async fn fetch(&self) -> Result<ParseOutcome> {
        let raw = self.store.read().await?;
        let outcome = parse(&raw);
        info!(
            store = self.store.name(),
            entries = outcome.entries.len(),
            skipped = outcome.skipped.len(),
            "fetched table"
        );
        Ok(outcome)
    }

    /// Replace the table with `text`, then report what the store now holds.
    ///
    /// The returned entries come from a fresh read, never from `text`, since
    /// the store may normalize or drop lines on install.
    pub async fn install(&self, text: &str) -> Result<ParseOutcome> {
        if let Err(e) = self.store.replace(text).await {
            warn!(error = %e, table = %text, "install failed; table unchanged");
            return Err(e);
        }
        self.fetch().await
    }

    /// Merge `request` into a fresh read of the table and install the result.
    pub async fn save(&self, request: &SaveRequest) -> Result<ParseOutcome> {
        let _guard = self.save_lock.lock().await;

        let fresh = self.store.read().await?;
        let table = Table::parse(&fresh);

        let mut reconciler = Reconciler::new(&table);
        if let Some(baseline) = &request.baseline {
            reconciler = reconciler.with_baseline(baseline.iter().cloned());
        }
        let merged = reconciler.reconcile(&request.entries);

        for line in &merged.deleted {
            info!(line = %line, "dropping task line omitted by client");
        }
        info!(
            submitted = request.entries.len(),
            claimed = merged.claimed,
            deleted = merged.deleted.len(),
            "installing reconciled table"
        );

        self.install(&merged.text).await
    }
}
