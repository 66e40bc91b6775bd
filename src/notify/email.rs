use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::Notifier;
use crate::config::MonitorConfig;

/// SMTP notifier. Alerts go from the notification account to itself,
/// authenticated with an app password.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn new(cfg: &MonitorConfig) -> Result<Self> {
        let creds = Credentials::new(
            cfg.notify_address.clone(),
            cfg.notify_app_password.clone(),
        );
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .with_context(|| format!("invalid SMTP host {}", cfg.smtp_host))?
            .credentials(creds)
            .build();

        let mailbox: Mailbox = cfg
            .notify_address
            .parse()
            .with_context(|| format!("invalid notification address {}", cfg.notify_address))?;

        Ok(Self {
            mailer,
            from: mailbox.clone(),
            to: mailbox,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
