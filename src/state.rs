//! Persistence of the last observed widget snapshot. One plain-text file,
//! absence meaning "no baseline yet".

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::snapshot::WidgetSnapshot;

#[async_trait::async_trait]
pub trait StateStore: Send + Sync {
    /// Read the persisted baseline. `Ok(None)` when none exists yet;
    /// errors only on unexpected filesystem failures.
    async fn load(&self) -> Result<Option<WidgetSnapshot>>;

    /// Overwrite the baseline with `snapshot`.
    async fn save(&self, snapshot: &WidgetSnapshot) -> Result<()>;
}

/// File-backed store. Writes go to a temp file in the same directory and
/// are renamed into place, so a crash mid-write cannot leave a truncated
/// baseline behind.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<Option<WidgetSnapshot>> {
        match fs::read_to_string(&self.path).await {
            Ok(s) => Ok(Some(WidgetSnapshot::from_stored(&s))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read state file {}", self.path.display())),
        }
    }

    async fn save(&self, snapshot: &WidgetSnapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("create state dir {}", dir.display()))?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, snapshot.text())
            .await
            .with_context(|| format!("write temp state file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("rename state file into {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStateStore {
    inner: std::sync::Mutex<Option<WidgetSnapshot>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baseline(snapshot: WidgetSnapshot) -> Self {
        Self {
            inner: std::sync::Mutex::new(Some(snapshot)),
        }
    }

    pub fn current(&self) -> Option<WidgetSnapshot> {
        self.inner.lock().expect("state mutex poisoned").clone()
    }
}

#[async_trait::async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<Option<WidgetSnapshot>> {
        Ok(self.current())
    }

    async fn save(&self, snapshot: &WidgetSnapshot) -> Result<()> {
        *self.inner.lock().expect("state mutex poisoned") = Some(snapshot.clone());
        Ok(())
    }
}
