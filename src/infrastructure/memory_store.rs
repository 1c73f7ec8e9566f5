use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::{AppError, AppResult, SnapshotStore};
use crate::domain::{MonitoredTarget, PageUrl, Snapshot};

/// Purely in-memory store: the working set without the durable backing.
/// Used by tests and by `--ephemeral` runs where restart survival does not
/// matter.
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    inner: Arc<Mutex<HashMap<PageUrl, Option<Snapshot>>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn get(&self, url: &PageUrl) -> AppResult<Option<Snapshot>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        Ok(inner.get(url).cloned().flatten())
    }

    async fn put(&self, url: &PageUrl, snapshot: &Snapshot) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        inner.insert(url.clone(), Some(snapshot.clone()));
        Ok(())
    }

    async fn register(&self, url: &PageUrl) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        inner.entry(url.clone()).or_insert(None);
        Ok(())
    }

    async fn unregister(&self, url: &PageUrl) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        inner.remove(url);
        Ok(())
    }

    async fn load_all(&self) -> AppResult<Vec<MonitoredTarget>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        Ok(inner
            .iter()
            .map(|(url, snapshot)| MonitoredTarget {
                url: url.clone(),
                last_snapshot: snapshot.clone(),
            })
            .collect())
    }
}
