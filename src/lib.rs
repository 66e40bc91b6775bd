// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod detector;
pub mod fetch;
pub mod notify;
pub mod run;
pub mod snapshot;
pub mod state;

// ---- Re-exports for stable public API ----
pub use crate::config::MonitorConfig;
pub use crate::detector::{detect, ChangeEvent, ChangeKind};
pub use crate::fetch::{ContentFetcher, PortalFetcher};
pub use crate::notify::{EmailNotifier, Notifier};
pub use crate::run::{run_once, NotifyStatus, RunReport};
pub use crate::snapshot::WidgetSnapshot;
pub use crate::state::{FileStateStore, MemoryStateStore, StateStore};
