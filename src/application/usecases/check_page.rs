use std::sync::Arc;

use crate::application::{AppResult, Notifier, PageFetcher, SnapshotStore};
use crate::domain::{compare, normalize, PageUrl, Snapshot, Verdict};

/// One polling cycle for one page: fetch, normalize, compare against the
/// stored snapshot, notify on change, persist the new snapshot.
///
/// Single attempt, no internal retry. A fetch failure or a store read
/// failure aborts the cycle with nothing mutated; the target stays armed
/// for the next tick. A notifier failure is logged and never affects the
/// snapshot decision.
#[derive(Clone)]
pub struct CheckPageUseCase {
    pub fetcher: Arc<dyn PageFetcher>,
    pub store: Arc<dyn SnapshotStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl CheckPageUseCase {
    pub async fn execute(&self, url: &PageUrl) -> AppResult<()> {
        let raw = self.fetcher.fetch(url).await?;
        let current = Snapshot::new(normalize(&raw));

        // A read failure is treated conservatively as "unknown previous"
        // and aborts the cycle rather than guessing.
        let previous = self.store.get(url).await?;

        if let Verdict::Changed(event) = compare(url, previous.as_ref(), &current) {
            tracing::info!(%url, delta = %event.summary(), "change detected");
            if let Err(e) = self.notifier.notify(&event.notification_text()).await {
                tracing::warn!(%url, error = %e, "notification failed");
            }
        }

        // Persist unconditionally once fetch+normalize succeeded, even when
        // unchanged. The working set already leads if the durable write
        // fails, so the cycle still counts as complete.
        if let Err(e) = self.store.put(url, &current).await {
            tracing::warn!(%url, error = %e, "snapshot write failed");
        }

        Ok(())
    }
}
