use async_trait::async_trait;

use crate::application::{AppResult, Notifier};

/// Fan-out to several channels. One channel failing never stops the others;
/// the last failure is reported so the caller can log it.
pub struct MultiNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn notify(&self, text: &str) -> AppResult<()> {
        let mut last_err = None;

        for n in &self.notifiers {
            if let Err(e) = n.notify(text).await {
                last_err = Some(e);
            }
        }

        if let Some(e) = last_err {
            return Err(e);
        }

        Ok(())
    }
}
