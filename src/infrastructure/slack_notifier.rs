use async_trait::async_trait;
use serde::Serialize;

use crate::application::{AppError, AppResult, Notifier};

/// Posts to a Slack incoming webhook. Failures surface as `AppError::Notify`;
/// the checker logs them and moves on, so delivery stays best effort.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook: String,
}

impl SlackNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook,
        }
    }
}

#[derive(Debug, Serialize)]
struct SlackTextMsg<'a> {
    text: &'a str,
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, text: &str) -> AppResult<()> {
        let payload = SlackTextMsg { text };

        self.client
            .post(&self.webhook)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notify(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Notify(e.to_string()))?;

        Ok(())
    }
}
