// tests/run_pipeline.rs
// Orchestrator policies exercised against fakes: baseline establishment,
// alerting, and the save/no-save rules around failures.

use std::sync::Mutex;

use anyhow::{bail, Result};
use opportunity_monitor::{
    run_once, ChangeKind, ContentFetcher, FileStateStore, MemoryStateStore, Notifier,
    NotifyStatus, StateStore, WidgetSnapshot,
};

struct FakeFetcher {
    widget: Option<String>,
}

impl FakeFetcher {
    fn ok(widget: &str) -> Self {
        Self {
            widget: Some(widget.to_string()),
        }
    }

    fn failing() -> Self {
        Self { widget: None }
    }
}

#[async_trait::async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch_widget(&self) -> Result<String> {
        match &self.widget {
            Some(w) => Ok(w.clone()),
            None => bail!("portal unreachable"),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        if self.fail {
            bail!("SMTP rejected");
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn first_run_saves_baseline_without_notifying() {
    let store = MemoryStateStore::new();
    let notifier = RecordingNotifier::default();
    let report = run_once(&FakeFetcher::ok("No Data"), &store, &notifier)
        .await
        .unwrap();

    assert_eq!(report.kind, ChangeKind::None);
    assert_eq!(report.notified, NotifyStatus::NotAttempted);
    assert!(notifier.sent().is_empty());
    // Baseline exists now, as the empty snapshot.
    assert!(store.current().unwrap().is_empty());
}

#[tokio::test]
async fn appeared_change_alerts_and_advances_baseline() {
    let store = MemoryStateStore::with_baseline(WidgetSnapshot::new("No Data"));
    let notifier = RecordingNotifier::default();
    let widget = r#"<table><tr><td>Client Program A</td><td>a.pdf</td></tr></table>"#;
    let report = run_once(&FakeFetcher::ok(widget), &store, &notifier)
        .await
        .unwrap();

    assert_eq!(report.kind, ChangeKind::Appeared);
    assert_eq!(report.notified, NotifyStatus::Sent);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "New opportunities posted on the portal");
    assert!(sent[0].1.contains("Client Program A"));

    assert_eq!(store.current().unwrap().text(), "Client Program A a.pdf");
}

#[tokio::test]
async fn removed_change_alerts() {
    let store = MemoryStateStore::with_baseline(WidgetSnapshot::new("Client Program A"));
    let notifier = RecordingNotifier::default();
    let report = run_once(
        &FakeFetcher::ok("<h4 class=\"alert alert-warning\">No Data</h4>"),
        &store,
        &notifier,
    )
    .await
    .unwrap();

    assert_eq!(report.kind, ChangeKind::Removed);
    assert_eq!(
        notifier.sent()[0].0,
        "Opportunities no longer listed on the portal"
    );
    assert!(store.current().unwrap().is_empty());
}

#[tokio::test]
async fn noop_run_stays_quiet_but_still_saves() {
    let store = MemoryStateStore::with_baseline(WidgetSnapshot::new("Program A"));
    let notifier = RecordingNotifier::default();
    // Same text, different markup and spacing.
    let report = run_once(
        &FakeFetcher::ok("<div><b>Program\n\nA</b></div>"),
        &store,
        &notifier,
    )
    .await
    .unwrap();

    assert_eq!(report.kind, ChangeKind::None);
    assert!(notifier.sent().is_empty());
    assert_eq!(store.current().unwrap().text(), "Program A");
}

#[tokio::test]
async fn fetch_failure_leaves_state_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_widget.txt");
    let store = FileStateStore::new(&path);
    store
        .save(&WidgetSnapshot::new("Client Program A"))
        .await
        .unwrap();
    let before = std::fs::read(&path).unwrap();

    let notifier = RecordingNotifier::default();
    let result = run_once(&FakeFetcher::failing(), &store, &notifier).await;

    assert!(result.is_err());
    assert!(notifier.sent().is_empty());
    let after = std::fs::read(&path).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn notify_failure_still_advances_baseline() {
    let store = MemoryStateStore::with_baseline(WidgetSnapshot::new("3 opportunities listed"));
    let notifier = RecordingNotifier::failing();
    let report = run_once(&FakeFetcher::ok("5 opportunities listed"), &store, &notifier)
        .await
        .unwrap();

    assert_eq!(report.kind, ChangeKind::Updated);
    assert!(matches!(report.notified, NotifyStatus::Failed(_)));
    // The observed change is persisted even though delivery failed,
    // so the next run does not duplicate the alert.
    assert_eq!(
        store.current().unwrap().text(),
        "5 opportunities listed"
    );
}
