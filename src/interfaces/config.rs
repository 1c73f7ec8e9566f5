use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Process-wide polling cadence; every page shares it.
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Overridable via the DATABASE_URL env var.
    pub database_url: Option<String>,
    /// Pages to register at startup, on top of whatever the store already
    /// holds. Already-known urls keep their snapshots.
    #[serde(default)]
    pub urls: Vec<String>,
}

fn default_check_interval() -> u64 {
    3 * 60 * 60
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_interval_seconds: default_check_interval(),
            fetch_timeout_seconds: default_fetch_timeout(),
            listen_addr: default_listen_addr(),
            database_url: None,
            urls: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let raw = expand_env(&raw);
        let cfg: Config = serde_yaml::from_str(&raw)?;
        Ok(cfg)
    }

    /// Missing file falls back to defaults; a present but broken file is
    /// still an error.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn resolve_database_url(&self) -> String {
        std::env::var("DATABASE_URL")
            .ok()
            .or_else(|| self.database_url.clone())
            .unwrap_or_else(|| "sqlite:./pagewatch.db".to_string())
    }
}

/// very small ${VAR} expansion to keep config simple
fn expand_env(s: &str) -> String {
    let mut out = s.to_string();
    for (k, v) in std::env::vars() {
        out = out.replace(&format!("${{{}}}", k), &v);
    }
    out
}
