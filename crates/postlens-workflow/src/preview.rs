//! Preview resource management.
//!
//! The manager owns at most one live [`PreviewHandle`] and releases it on
//! rebind, on [`PreviewManager::release`], and when dropped.

use bytes::Bytes;
use parking_lot::Mutex;
use postlens_core::{PreviewHandle, PreviewStore, SelectedFile};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Scoped owner of the current preview handle.
pub struct PreviewManager {
    store: Arc<dyn PreviewStore>,
    current: Option<PreviewHandle>,
}

impl PreviewManager {
    pub fn new(store: Arc<dyn PreviewStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Release the previous handle, then create one for `file`.
    pub fn rebind(&mut self, file: &SelectedFile) -> &PreviewHandle {
        self.release();

        let handle = self.store.create(file);
        debug!(url = %handle, file = %file.name(), "Preview created");
        self.current.insert(handle)
    }

    /// Release the current handle. No-op when none is held.
    pub fn release(&mut self) {
        if let Some(handle) = self.current.take() {
            debug!(url = %handle, "Preview released");
            self.store.revoke(&handle);
        }
    }

    pub fn handle(&self) -> Option<&PreviewHandle> {
        self.current.as_ref()
    }
}

impl Drop for PreviewManager {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for PreviewManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewManager")
            .field("current", &self.current)
            .finish()
    }
}

/// In-memory preview store handing out `blob:` style URLs.
#[derive(Debug, Default)]
pub struct MemoryPreviewStore {
    entries: Mutex<HashMap<String, Bytes>>,
}

impl MemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Resolve a preview URL to the bytes behind it.
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        self.entries.lock().get(url).cloned()
    }
}

impl PreviewStore for MemoryPreviewStore {
    fn create(&self, file: &SelectedFile) -> PreviewHandle {
        let url = format!("blob:postlens/{}", Uuid::new_v4());
        self.entries.lock().insert(url.clone(), file.data().clone());
        PreviewHandle::new(url)
    }

    fn revoke(&self, handle: &PreviewHandle) {
        self.entries.lock().remove(handle.url());
    }
}
