use std::sync::Arc;

use crate::application::{AppError, AppResult, Scheduler, SnapshotStore};
use crate::domain::PageUrl;

/// Thin add/remove/list surface over the store and the scheduler. The store
/// stays the single owner of target state; the scheduler only ever learns
/// url keys from here.
pub struct Registry {
    store: Arc<dyn SnapshotStore>,
    scheduler: Arc<Scheduler>,
}

impl Registry {
    pub fn new(store: Arc<dyn SnapshotStore>, scheduler: Arc<Scheduler>) -> Self {
        Self { store, scheduler }
    }

    pub async fn add_url(&self, raw: &str) -> AppResult<PageUrl> {
        let url = PageUrl::parse(raw).map_err(|e| AppError::Config(e.to_string()))?;
        self.store.register(&url).await?;
        self.scheduler.arm(url.clone())?;
        tracing::info!(%url, "page registered");
        Ok(url)
    }

    pub async fn remove_url(&self, raw: &str) -> AppResult<PageUrl> {
        let url = PageUrl::parse(raw).map_err(|e| AppError::Config(e.to_string()))?;
        self.scheduler.disarm(&url)?;
        self.store.unregister(&url).await?;
        tracing::info!(%url, "page unregistered");
        Ok(url)
    }

    pub fn list_urls(&self) -> AppResult<Vec<PageUrl>> {
        self.scheduler.active_urls()
    }

    /// Repopulates the working set from durable state and arms a timer per
    /// persisted page. Must run before anything else arms timers so that a
    /// restart neither loses membership nor re-seeds false baselines.
    pub async fn seed(&self) -> AppResult<usize> {
        let targets = self.store.load_all().await?;
        let count = targets.len();
        for target in targets {
            self.scheduler.arm(target.url)?;
        }
        Ok(count)
    }
}
