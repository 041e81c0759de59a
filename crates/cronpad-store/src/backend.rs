use async_trait::async_trait;

use crate::error::Result;

/// The two operations the backing table offers.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Short label for logs and the health endpoint.
    fn name(&self) -> &str;

    /// Current table text. A store with no table yet reads as `""`.
    async fn read(&self) -> Result<String>;

    /// Atomically replace the whole table with `text`.
    async fn replace(&self, text: &str) -> Result<()>;
}
