use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;

use crate::application::{AppError, AppResult, PageFetcher};
use crate::domain::PageUrl;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Option<Duration>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| AppError::Fetch(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &PageUrl) -> AppResult<String> {
        let resp = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, "pagewatch")
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        resp.text().await.map_err(|e| AppError::Fetch(e.to_string()))
    }
}
