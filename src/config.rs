//! Startup configuration. All environment reads happen here, once; the
//! rest of the crate only sees this struct.

use anyhow::{anyhow, Result};

pub const DEFAULT_PORTAL_URL: &str = "https://link.arise.com/reference";
pub const DEFAULT_STATE_PATH: &str = "state/last_widget.txt";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Portal login.
    pub portal_username: String,
    pub portal_password: String,
    /// Opportunities page to monitor.
    pub portal_url: String,
    /// Gmail-style notification account; alerts are sent to itself.
    pub notify_address: String,
    pub notify_app_password: String,
    pub smtp_host: String,
    /// Where the last observed snapshot lives.
    pub state_path: String,
}

impl MonitorConfig {
    /// Build from the environment. Required: ARISE_USERNAME, ARISE_PASSWORD,
    /// GMAIL_ADDRESS, GMAIL_APP_PASSWORD. PORTAL_URL, STATE_PATH and
    /// SMTP_HOST fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            portal_username: required("ARISE_USERNAME")?,
            portal_password: required("ARISE_PASSWORD")?,
            portal_url: optional("PORTAL_URL", DEFAULT_PORTAL_URL),
            notify_address: required("GMAIL_ADDRESS")?,
            notify_app_password: required("GMAIL_APP_PASSWORD")?,
            smtp_host: optional("SMTP_HOST", DEFAULT_SMTP_HOST),
            state_path: optional("STATE_PATH", DEFAULT_STATE_PATH),
        })
    }
}

fn required(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow!("missing required environment variable {key}")),
    }
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
