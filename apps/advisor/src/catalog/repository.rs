//! Lazily loaded, read-only reference data with modification-time invalidation.
//!
//! Constructed once in `main` and carried in `AppState`. Readers get an
//! `Arc<CatalogSnapshot>`; the snapshot itself is never mutated.

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::catalog::loader::load_snapshot;
use crate::catalog::models::{CatalogSnapshot, CourseCatalog, DataSource, LoadDiagnostic};
use crate::config::DataSources;

/// Modification times of the three sources; `None` for a missing file.
type Fingerprint = [Option<SystemTime>; 3];

struct Cached {
    snapshot: Arc<CatalogSnapshot>,
    fingerprint: Fingerprint,
}

pub struct CatalogRepository {
    sources: DataSources,
    cached: RwLock<Option<Cached>>,
}

impl CatalogRepository {
    pub fn new(sources: DataSources) -> Self {
        Self {
            sources,
            cached: RwLock::new(None),
        }
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    /// Returns the current snapshot, loading it on first use or when a source
    /// file's modification time changed since the last load.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        let fingerprint = self.fingerprint().await;

        {
            let guard = self.cached.read().await;
            if let Some(cached) = guard.as_ref() {
                if cached.fingerprint == fingerprint {
                    return Arc::clone(&cached.snapshot);
                }
            }
        }

        let mut guard = self.cached.write().await;
        // Another request may have reloaded while we waited for the write lock.
        if let Some(cached) = guard.as_ref() {
            if cached.fingerprint == fingerprint {
                return Arc::clone(&cached.snapshot);
            }
        }

        let reason = if guard.is_some() {
            "source files changed"
        } else {
            "first use"
        };
        info!(
            "Loading reference data from {} ({reason})",
            self.sources.data_dir.display()
        );
        let snapshot = Arc::new(self.load().await);
        *guard = Some(Cached {
            snapshot: Arc::clone(&snapshot),
            fingerprint,
        });
        snapshot
    }

    /// Drops the cached snapshot; the next `snapshot()` call reloads.
    pub async fn invalidate(&self) {
        info!("Reference data cache invalidated");
        *self.cached.write().await = None;
    }

    async fn load(&self) -> CatalogSnapshot {
        let sources = self.sources.clone();
        // CSV parsing is blocking file IO.
        match tokio::task::spawn_blocking(move || load_snapshot(&sources)).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Reference data load task failed: {e}");
                CatalogSnapshot::new(
                    CourseCatalog::default(),
                    vec![],
                    vec![],
                    vec![LoadDiagnostic::error(
                        DataSource::DataDir,
                        format!("load task failed: {e}"),
                    )],
                )
            }
        }
    }

    async fn fingerprint(&self) -> Fingerprint {
        [
            modified(&self.sources.master_path()).await,
            modified(&self.sources.curriculum_path()).await,
            modified(&self.sources.cases_path()).await,
        ]
    }
}

async fn modified(path: &Path) -> Option<SystemTime> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    metadata.modified().ok()
}
