//! Opportunity Monitor — Binary Entrypoint
//! One check per invocation; repeated monitoring comes from an external
//! scheduler re-running the binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use opportunity_monitor::{
    run_once, EmailNotifier, FileStateStore, MonitorConfig, NotifyStatus, PortalFetcher,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("opportunity_monitor=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

async fn run() -> anyhow::Result<()> {
    let cfg = MonitorConfig::from_env()?;

    let fetcher = PortalFetcher::new(&cfg)?;
    let store = FileStateStore::new(&cfg.state_path);
    let notifier = EmailNotifier::new(&cfg)?;

    let report = run_once(&fetcher, &store, &notifier).await?;
    match &report.notified {
        NotifyStatus::NotAttempted => {
            tracing::info!(kind = ?report.kind, "run complete, no alert needed");
        }
        NotifyStatus::Sent => {
            tracing::info!(kind = ?report.kind, "run complete, alert sent");
        }
        NotifyStatus::Failed(reason) => {
            // Change was observed and the baseline advanced; only delivery
            // was lost. Not a run failure.
            tracing::error!(kind = ?report.kind, %reason, "run complete, alert NOT delivered");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!("monitor run failed: {e:#}");
        std::process::exit(1);
    }
}
