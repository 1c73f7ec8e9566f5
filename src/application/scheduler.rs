use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::application::usecases::CheckPageUseCase;
use crate::application::{AppError, AppResult};
use crate::domain::PageUrl;

/// Owns the set of armed page timers and fires the checker for each on a
/// fixed process-wide cadence.
///
/// Every page gets its own independent tokio task: no global tick, phases
/// never align by construction. Cycles run inline in the task, so one page
/// never overlaps itself; ticks that fire while a cycle is still running
/// are skipped outright rather than queued.
pub struct Scheduler {
    interval: Duration,
    checker: CheckPageUseCase,
    timers: Mutex<HashMap<PageUrl, watch::Sender<bool>>>,
}

impl Scheduler {
    pub fn new(interval: Duration, checker: CheckPageUseCase) -> Self {
        Self {
            interval,
            checker,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Arms a timer for `url`. Idempotent: re-arming an already active page
    /// is a no-op, which makes startup seeding safe after an unclean
    /// shutdown. The first cycle runs immediately, then every interval.
    pub fn arm(&self, url: PageUrl) -> AppResult<()> {
        let mut timers = self
            .timers
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        if timers.contains_key(&url) {
            return Ok(());
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let checker = self.checker.clone();
        let interval = self.interval;
        let task_url = url.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = stop_rx.changed() => break,
                }
                if let Err(e) = checker.execute(&task_url).await {
                    tracing::warn!(url = %task_url, error = %e, "check cycle failed");
                }
                // disarmed mid-cycle: the cycle above was allowed to finish,
                // the timer is not rearmed
                if *stop_rx.borrow() {
                    break;
                }
            }
            tracing::debug!(url = %task_url, "timer stopped");
        });

        timers.insert(url, stop_tx);
        Ok(())
    }

    /// Disarms the timer for `url`. An in-flight cycle finishes; no further
    /// cycles start. Unknown urls are a no-op.
    pub fn disarm(&self, url: &PageUrl) -> AppResult<()> {
        let mut timers = self
            .timers
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        if let Some(stop) = timers.remove(url) {
            let _ = stop.send(true);
        }
        Ok(())
    }

    pub fn active_urls(&self) -> AppResult<Vec<PageUrl>> {
        let timers = self
            .timers
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        let mut urls: Vec<PageUrl> = timers.keys().cloned().collect();
        urls.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(urls)
    }

    pub fn is_armed(&self, url: &PageUrl) -> AppResult<bool> {
        let timers = self
            .timers
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        Ok(timers.contains_key(url))
    }
}
