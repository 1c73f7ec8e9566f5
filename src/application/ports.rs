use async_trait::async_trait;

use crate::domain::{MonitoredTarget, PageUrl, Snapshot};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("storage error: {0}")]
    Store(String),
    #[error("notifier error: {0}")]
    Notify(String),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Fetch the raw document body for a page. Redirects, encoding and timeouts
/// are this collaborator's concern.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &PageUrl) -> AppResult<String>;
}

/// Durable url -> last-known-snapshot mapping; source of truth across
/// restarts. Implementations keep an in-memory working set in sync with
/// every write (write-through), so a `get` right after a successful `put`
/// in the same process observes the new value.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// `None` means "never checked", which is distinct from an empty snapshot.
    async fn get(&self, url: &PageUrl) -> AppResult<Option<Snapshot>>;

    /// Upsert: creates the target if unknown, else overwrites its snapshot.
    async fn put(&self, url: &PageUrl, snapshot: &Snapshot) -> AppResult<()>;

    /// Insert with absent snapshot. Registering a known url is a no-op.
    async fn register(&self, url: &PageUrl) -> AppResult<()>;

    async fn unregister(&self, url: &PageUrl) -> AppResult<()>;

    /// Startup-only: repopulates the working set so a restart neither loses
    /// membership nor resets baselines.
    async fn load_all(&self) -> AppResult<Vec<MonitoredTarget>>;
}

/// Deliver a notification text. Best effort; callers log failures and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> AppResult<()>;
}
