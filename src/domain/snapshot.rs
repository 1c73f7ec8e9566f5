use serde::{Deserialize, Serialize};

use super::PageUrl;

/// Normalized content of a page at a point in time. Opaque: equality is
/// byte-for-byte on the normalized form, never on the raw fetched bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn new(normalized: String) -> Self {
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A monitored page plus its last-known snapshot. Owned exclusively by the
/// snapshot store; the scheduler only ever holds the `PageUrl` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredTarget {
    pub url: PageUrl,
    pub last_snapshot: Option<Snapshot>,
}
