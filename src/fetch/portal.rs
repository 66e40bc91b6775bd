//! Authenticated portal access over a cookie session.

use anyhow::{anyhow, Context, Result};
use reqwest::{cookie::Jar, redirect, Client, Url};
use std::sync::Arc;
use std::time::Duration;

use super::{extract_widget, ContentFetcher};
use crate::config::MonitorConfig;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the opportunities page behind the portal login.
///
/// Login is best-effort: the portal's form endpoint and field names have
/// changed over time, so a few known variants are tried in order. A failed
/// login is only a warning; whether the run fails is decided by the widget
/// being present on the fetched page.
pub struct PortalFetcher {
    /// No redirects, so a 302 on the login POST is visible as acceptance.
    login_client: Client,
    /// Follows redirects; shares the cookie jar with `login_client`.
    page_client: Client,
    page_url: Url,
    username: String,
    password: String,
}

impl PortalFetcher {
    pub fn new(cfg: &MonitorConfig) -> Result<Self> {
        let page_url = Url::parse(&cfg.portal_url)
            .with_context(|| format!("invalid portal URL {}", cfg.portal_url))?;

        let jar = Arc::new(Jar::default());
        let login_client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(jar.clone())
            .redirect(redirect::Policy::none())
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("build login HTTP client")?;
        let page_client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(jar)
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("build page HTTP client")?;

        Ok(Self {
            login_client,
            page_client,
            page_url,
            username: cfg.portal_username.clone(),
            password: cfg.portal_password.clone(),
        })
    }

    /// Known (path, username-field, password-field) login form variants.
    fn login_attempts(&self) -> Vec<(Url, [(&'static str, &str); 2])> {
        let mut out = Vec::new();
        for (path, user_field, pass_field) in [
            ("/Account/Login", "username", "password"),
            ("/login", "email", "password"),
            ("/", "Username", "Password"),
        ] {
            if let Ok(url) = self.page_url.join(path) {
                out.push((
                    url,
                    [
                        (user_field, self.username.as_str()),
                        (pass_field, self.password.as_str()),
                    ],
                ));
            }
        }
        out
    }

    async fn login(&self) -> bool {
        for (url, form) in self.login_attempts() {
            match self.login_client.post(url.clone()).form(&form).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let got_cookie = resp.headers().contains_key("set-cookie");
                    if status.is_redirection() || (status.is_success() && got_cookie) {
                        tracing::info!(%url, %status, "portal login accepted");
                        return true;
                    }
                    tracing::debug!(%url, %status, "login attempt rejected");
                }
                Err(e) => {
                    tracing::debug!(%url, "login attempt failed: {e:#}");
                }
            }
        }
        tracing::warn!("all login attempts failed, fetching page anyway");
        false
    }
}

#[async_trait::async_trait]
impl ContentFetcher for PortalFetcher {
    async fn fetch_widget(&self) -> Result<String> {
        self.login().await;

        let resp = self
            .page_client
            .get(self.page_url.clone())
            .send()
            .await
            .with_context(|| format!("fetch {}", self.page_url))?
            .error_for_status()
            .with_context(|| format!("fetch {}", self.page_url))?;
        let page = resp.text().await.context("read portal page body")?;

        extract_widget(&page)
            .ok_or_else(|| anyhow!("opportunity widget not found on {}", self.page_url))
    }
}
