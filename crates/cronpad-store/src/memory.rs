//! In-memory backing store for tests and local experiments.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    backend::BackingStore,
    error::{Result, StoreError},
};

/// Rewrites installed text, the way a real store may normalize lines.
pub type Reformat = fn(&str) -> String;

#[derive(Default)]
struct State {
    /// `None` models a store that has never had a table.
    table: Option<String>,
    read_failure: Option<String>,
    replace_failure: Option<String>,
    replaces: usize,
}

/// A [`BackingStore`] holding the table in a string.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    reformat: Option<Reformat>,
}

impl MemoryStore {
    /// A store with no table yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(text: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_table(text);
        store
    }

    /// Pass every installed table through `reformat` before storing it.
    pub fn with_reformat(mut self, reformat: Reformat) -> Self {
        self.reformat = Some(reformat);
        self
    }

    /// Overwrite the table directly, as an outside editor would.
    pub fn set_table(&self, text: impl Into<String>) {
        self.lock().table = Some(text.into());
    }

    /// Current table text, `None` if no table was ever written.
    pub fn table(&self) -> Option<String> {
        self.lock().table.clone()
    }

    /// Make every read fail with `output` until cleared with `None`.
    pub fn fail_reads(&self, output: Option<&str>) {
        self.lock().read_failure = output.map(str::to_string);
    }

    /// Make every replace fail with `output` until cleared with `None`.
    pub fn fail_replaces(&self, output: Option<&str>) {
        self.lock().replace_failure = output.map(str::to_string);
    }

    /// Number of successful replaces so far.
    pub fn replace_count(&self) -> usize {
        self.lock().replaces
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self) -> Result<String> {
        let state = self.lock();
        if let Some(output) = &state.read_failure {
            return Err(StoreError::ListFailed {
                status: "exit status 1".to_string(),
                output: output.clone(),
            });
        }
        Ok(state.table.clone().unwrap_or_default())
    }

    async fn replace(&self, text: &str) -> Result<()> {
        let mut state = self.lock();
        if let Some(output) = &state.replace_failure {
            return Err(StoreError::InstallFailed {
                status: "exit status 1".to_string(),
                output: output.clone(),
            });
        }
        let stored = match self.reformat {
            Some(reformat) => reformat(text),
            None => text.to_string(),
        };
        state.table = Some(stored);
        state.replaces += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_table_reads_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.read().await.unwrap(), "");
        assert_eq!(store.table(), None);
    }

    #[tokio::test]
    async fn replace_then_read() {
        let store = MemoryStore::new();
        store.replace("* * * * * ping\n").await.unwrap();
        assert_eq!(store.read().await.unwrap(), "* * * * * ping\n");
        assert_eq!(store.replace_count(), 1);
    }

    #[tokio::test]
    async fn failed_replace_leaves_table_untouched() {
        let store = MemoryStore::with_table("FOO=bar\n");
        store.fail_replaces(Some("bad minute"));
        let err = store.replace("garbage\n").await.unwrap_err();
        assert!(matches!(err, StoreError::InstallFailed { .. }));
        assert_eq!(store.table().as_deref(), Some("FOO=bar\n"));
        assert_eq!(store.replace_count(), 0);
    }

    #[tokio::test]
    async fn reformat_applies_on_install() {
        let store = MemoryStore::new().with_reformat(|t| t.to_uppercase());
        store.replace("* * * * * ping\n").await.unwrap();
        assert_eq!(store.table().as_deref(), Some("* * * * * PING\n"));
    }
}
