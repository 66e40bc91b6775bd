pub mod email;

pub use email::EmailNotifier;

use anyhow::Result;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert. Failure is reported, never retried here.
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}
