use async_trait::async_trait;

use crate::domain::ports::ActionService;
use crate::utils::error::Result;

/// Turns an action reference into a web client link and hands it to `sink`.
pub struct WebActionService<F>
where
    F: Fn(&str) + Send + Sync,
{
    base_url: String,
    sink: F,
}

impl<F> WebActionService<F>
where
    F: Fn(&str) + Send + Sync,
{
    pub fn new(base_url: &str, sink: F) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sink,
        }
    }

    pub fn link(&self, reference: &str) -> String {
        format!("{}/web#action={}", self.base_url, reference)
    }
}

#[async_trait]
impl<F> ActionService for WebActionService<F>
where
    F: Fn(&str) + Send + Sync,
{
    async fn do_action(&self, reference: &str) -> Result<()> {
        let link = self.link(reference);
        tracing::debug!("Opening {}", link);
        (self.sink)(&link);
        Ok(())
    }
}
