use std::fmt;

use serde::{Deserialize, Serialize};

/// Key identifying a monitored page. The string form is the identity:
/// two `PageUrl`s are the same target iff their strings are byte-equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageUrl(String);

impl PageUrl {
    pub fn parse(s: &str) -> Result<Self, PageUrlError> {
        let s = s.trim();
        let rest = s
            .strip_prefix("http://")
            .or_else(|| s.strip_prefix("https://"))
            .ok_or_else(|| PageUrlError::InvalidFormat(s.to_string()))?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(PageUrlError::InvalidFormat(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum PageUrlError {
    #[error("invalid page url: {0} (expected http:// or https:// with a host)")]
    InvalidFormat(String),
}
