use std::collections::HashSet;
use std::sync::Arc;

use galerie_db::GalleryStore;
use galerie_storage::Storage;
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

/// Candidates not referenced by any surviving document, first occurrence order, no
/// repeats.
pub fn files_to_remove(candidates: &[String], referenced: &HashSet<String>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut removable = Vec::new();
    for path in candidates {
        if !referenced.contains(path) && seen.insert(path.as_str()) {
            removable.push(path.clone());
        }
    }
    removable
}

/// Background removal of stored files no longer referenced by any gallery.
///
/// Removals run detached from the request that scheduled them. Failures are logged
/// and never retried; a skipped or failed removal leaves an orphaned file behind.
#[derive(Clone)]
pub struct FileReaper {
    store: Arc<dyn GalleryStore>,
    storage: Arc<dyn Storage>,
    tracker: TaskTracker,
    /// Set once by `shutdown`; guards every reopen of the tracker
    shut_down: Arc<Mutex<bool>>,
}

impl FileReaper {
    pub fn new(store: Arc<dyn GalleryStore>, storage: Arc<dyn Storage>) -> Self {
        Self {
            store,
            storage,
            tracker: TaskTracker::new(),
            shut_down: Arc::new(Mutex::new(false)),
        }
    }

    /// Schedule removal of `paths`, skipping any still referenced by a gallery other
    /// than `excluding`.
    pub fn remove_unreferenced(&self, paths: Vec<String>, excluding: Option<Uuid>) {
        if paths.is_empty() {
            return;
        }

        let store = self.store.clone();
        let storage = self.storage.clone();
        self.tracker.spawn(async move {
            let referenced = match store.referenced_paths(&paths, excluding).await {
                Ok(referenced) => referenced,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        files = paths.len(),
                        "Reference check failed, leaving files on disk"
                    );
                    return;
                }
            };

            for path in paths.iter().filter(|p| referenced.contains(*p)) {
                tracing::debug!(path = %path, "File still referenced by another gallery, keeping");
            }

            let removable = files_to_remove(&paths, &referenced);
            let mut removed = 0usize;
            for path in &removable {
                if storage.remove(path).await {
                    removed += 1;
                }
            }

            tracing::debug!(
                scheduled = paths.len(),
                removed,
                "Background file removal finished"
            );
        });
    }

    /// Number of removals still running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every scheduled removal has finished. New removals may be scheduled
    /// afterwards, unless `shutdown` has started in the meantime.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;

        let shut_down = self.shut_down.lock().await;
        if !*shut_down {
            self.tracker.reopen();
        }
    }

    /// Close the tracker for good and drain outstanding removals.
    pub async fn shutdown(&self) {
        {
            let mut shut_down = self.shut_down.lock().await;
            *shut_down = true;
            self.tracker.close();
        }

        let pending = self.pending();
        if pending > 0 {
            tracing::info!(pending, "Waiting for background file removals");
        }
        self.tracker.wait().await;
    }
}
