use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::application::{AppError, AppResult, SnapshotStore};
use crate::domain::{MonitoredTarget, PageUrl, Snapshot};

type WorkingSet = HashMap<PageUrl, Option<Snapshot>>;

/// SQLite-backed store with a write-through in-memory working set.
///
/// Every write lands in the working set before the durable write is
/// attempted, so a `get` right after a successful `put` observes the new
/// value without a round trip. If the durable write fails the working set
/// keeps the newer value; the next successful write reconciles the two.
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
    cache: Arc<Mutex<WorkingSet>>,
}

impl SqliteSnapshotStore {
    /// db_url examples: "sqlite:./pagewatch.db", "sqlite:/data/pagewatch.db"
    pub async fn new(db_url: &str) -> AppResult<Self> {
        let opts = SqliteConnectOptions::from_str(db_url)
            .map_err(|e| AppError::Store(e.to_string()))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let store = Self {
            pool,
            cache: Arc::new(Mutex::new(HashMap::new())),
        };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS monitored_pages (
              url TEXT PRIMARY KEY,
              snapshot TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(())
    }

    fn cache_read(&self, url: &PageUrl) -> AppResult<Option<Option<Snapshot>>> {
        let cache = self
            .cache
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        Ok(cache.get(url).cloned())
    }

    fn cache_write(&self, url: &PageUrl, snapshot: Option<Snapshot>) -> AppResult<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| AppError::Store("lock poisoned".into()))?;
        cache.insert(url.clone(), snapshot);
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn get(&self, url: &PageUrl) -> AppResult<Option<Snapshot>> {
        // the working set may legitimately lead the durable store
        if let Some(cached) = self.cache_read(url)? {
            return Ok(cached);
        }

        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT snapshot FROM monitored_pages WHERE url = ? LIMIT 1")
                .bind(url.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;

        match row {
            Some((snapshot,)) => {
                let snapshot = snapshot.map(Snapshot::new);
                self.cache_write(url, snapshot.clone())?;
                Ok(snapshot)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, url: &PageUrl, snapshot: &Snapshot) -> AppResult<()> {
        // working set first: not rolled back if the durable write fails
        self.cache_write(url, Some(snapshot.clone()))?;

        sqlx::query(
            r#"
            INSERT INTO monitored_pages(url, snapshot) VALUES(?, ?)
            ON CONFLICT(url) DO UPDATE SET snapshot=excluded.snapshot
            "#,
        )
        .bind(url.as_str())
        .bind(snapshot.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(())
    }

    async fn register(&self, url: &PageUrl) -> AppResult<()> {
        {
            let mut cache = self
                .cache
                .lock()
                .map_err(|_| AppError::Store("lock poisoned".into()))?;
            cache.entry(url.clone()).or_insert(None);
        }

        // duplicate registration is a no-op, never clobbers a snapshot
        sqlx::query("INSERT OR IGNORE INTO monitored_pages(url, snapshot) VALUES(?, NULL)")
            .bind(url.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(())
    }

    async fn unregister(&self, url: &PageUrl) -> AppResult<()> {
        {
            let mut cache = self
                .cache
                .lock()
                .map_err(|_| AppError::Store("lock poisoned".into()))?;
            cache.remove(url);
        }

        sqlx::query("DELETE FROM monitored_pages WHERE url = ?")
            .bind(url.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(())
    }

    async fn load_all(&self) -> AppResult<Vec<MonitoredTarget>> {
        let rows: Vec<(String, Option<String>)> =
            sqlx::query_as("SELECT url, snapshot FROM monitored_pages")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        {
            let mut cache = self
                .cache
                .lock()
                .map_err(|_| AppError::Store("lock poisoned".into()))?;
            for (raw_url, snapshot) in rows {
                let url = match PageUrl::parse(&raw_url) {
                    Ok(u) => u,
                    Err(e) => {
                        tracing::warn!(url = %raw_url, error = %e, "skipping unparsable row");
                        continue;
                    }
                };
                let snapshot = snapshot.map(Snapshot::new);
                // keep newer in-process values over what the row says
                cache.entry(url.clone()).or_insert_with(|| snapshot.clone());
                out.push(MonitoredTarget {
                    url,
                    last_snapshot: snapshot,
                });
            }
        }
        Ok(out)
    }
}
