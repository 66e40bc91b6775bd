//! One monitoring run: fetch, load baseline, classify, notify, persist.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::detector::{detect, ChangeEvent, ChangeKind};
use crate::fetch::ContentFetcher;
use crate::notify::Notifier;
use crate::snapshot::WidgetSnapshot;
use crate::state::StateStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyStatus {
    /// No change, nothing to deliver.
    NotAttempted,
    Sent,
    /// Delivery failed; the baseline was still advanced so the next run
    /// does not re-alert on the same change.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub kind: ChangeKind,
    pub notified: NotifyStatus,
}

fn kind_subject(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Appeared => "New opportunities posted on the portal",
        ChangeKind::Removed => "Opportunities no longer listed on the portal",
        ChangeKind::Updated => "Opportunity listings changed on the portal",
        ChangeKind::None => "",
    }
}

fn text_or_none(text: &str) -> &str {
    if text.is_empty() {
        "(none)"
    } else {
        text
    }
}

/// Human-readable subject and body for a detected change.
/// Only meaningful for `kind != None`.
pub fn render_notification(ev: &ChangeEvent, ts: DateTime<Utc>) -> (String, String) {
    let subject = kind_subject(ev.kind).to_string();
    let previous = ev
        .previous
        .as_ref()
        .map(WidgetSnapshot::text)
        .unwrap_or_default();
    let body = format!(
        "Change: {:?}\nPrevious: {}\nCurrent: {}\nChecked at: {}\n",
        ev.kind,
        text_or_none(previous),
        text_or_none(ev.current.text()),
        ts.to_rfc3339(),
    );
    (subject, body)
}

/// Execute one run against the wired collaborators.
///
/// Policies, in order:
/// - fetch failure: error out before touching the baseline, so the next
///   run diffs against the same state;
/// - store I/O failure: fatal for the run, no notification;
/// - notify failure: logged and reported, but the save still happens.
pub async fn run_once(
    fetcher: &dyn ContentFetcher,
    store: &dyn StateStore,
    notifier: &dyn Notifier,
) -> Result<RunReport> {
    let raw = fetcher.fetch_widget().await.context("fetch widget")?;
    let current = WidgetSnapshot::new(&raw);

    let previous = store.load().await.context("load baseline")?;
    let event = detect(previous.as_ref(), &current);

    let notified = match event.kind {
        ChangeKind::None => {
            if previous.is_none() {
                tracing::info!("no baseline yet, establishing one");
            } else {
                tracing::info!("no change detected");
            }
            NotifyStatus::NotAttempted
        }
        kind => {
            let (subject, body) = render_notification(&event, Utc::now());
            tracing::info!(?kind, "change detected, sending notification");
            match notifier.send(&subject, &body).await {
                Ok(()) => NotifyStatus::Sent,
                Err(e) => {
                    tracing::error!("notification delivery failed: {e:#}");
                    NotifyStatus::Failed(format!("{e:#}"))
                }
            }
        }
    };

    store.save(&current).await.context("save baseline")?;

    Ok(RunReport {
        kind: event.kind,
        notified,
    })
}
