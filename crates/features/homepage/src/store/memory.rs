use super::LayoutStore;
use crate::error::HomepageError;
use crate::model::{Layout, LayoutVersion, Section};
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// Process-local store for tests and ephemeral deployments.
///
/// Readers clone an `Arc` snapshot under a short read lock; swaps happen under the write lock.
#[derive(Debug, Clone)]
pub struct MemoryLayoutStore {
    current: Arc<RwLock<Arc<Layout>>>,
}

impl MemoryLayoutStore {
    /// Creates a store seeded with the catalog defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(Layout::seed(Utc::now()))
    }

    #[must_use]
    pub fn with_layout(layout: Layout) -> Self {
        Self { current: Arc::new(RwLock::new(Arc::new(layout))) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Layout> {
        Arc::clone(&self.current.read())
    }
}

impl Default for MemoryLayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutStore for MemoryLayoutStore {
    async fn load(&self) -> Result<Layout, HomepageError> {
        Ok(self.snapshot().as_ref().clone())
    }

    async fn compare_and_swap(
        &self,
        expected: LayoutVersion,
        sections: Vec<Section>,
    ) -> Result<Layout, HomepageError> {
        let mut current = self.current.write();
        if current.version != expected {
            return Err(HomepageError::Conflict {
                expected,
                current: current.version,
                context: None,
            });
        }

        let next = Layout { sections, version: current.version.next(), updated_at: Utc::now() };
        *current = Arc::new(next.clone());
        trace!(version = %next.version, "Layout swapped in memory");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_sections;

    #[tokio::test]
    async fn swap_advances_version() {
        let store = MemoryLayoutStore::new();
        let layout = store.compare_and_swap(LayoutVersion(1), default_sections()).await.unwrap();
        assert_eq!(layout.version, LayoutVersion(2));
        assert_eq!(store.load().await.unwrap(), layout);
    }

    #[tokio::test]
    async fn stale_swap_leaves_store_untouched() {
        let store = MemoryLayoutStore::new();
        let before = store.snapshot();
        let err = store.compare_and_swap(LayoutVersion(7), Vec::new()).await.unwrap_err();
        assert!(matches!(
            err,
            HomepageError::Conflict { expected: LayoutVersion(7), current: LayoutVersion(1), .. }
        ));
        assert_eq!(*store.snapshot(), *before);
    }
}
