//! Persistence of the single layout aggregate.

mod memory;
mod surreal;

pub use memory::MemoryLayoutStore;
pub use surreal::SurrealLayoutStore;

use crate::error::HomepageError;
use crate::model::{Layout, LayoutVersion, Section};
use std::future::Future;

/// Versioned storage of the layout aggregate.
///
/// Implementations must make [`compare_and_swap`](LayoutStore::compare_and_swap) atomic: at
/// most one swap succeeds per version value, and a failed swap leaves the stored layout
/// untouched.
pub trait LayoutStore: Send + Sync + 'static {
    /// Current layout snapshot.
    fn load(&self) -> impl Future<Output = Result<Layout, HomepageError>> + Send;

    /// Replaces the sections if the stored version equals `expected`, advancing it by one.
    ///
    /// `sections` are stored as given; validation happens before this call.
    ///
    /// # Errors
    /// [`HomepageError::Conflict`] carrying the stored version when it differs from `expected`.
    fn compare_and_swap(
        &self,
        expected: LayoutVersion,
        sections: Vec<Section>,
    ) -> impl Future<Output = Result<Layout, HomepageError>> + Send;
}

/// Store selected by `homepage.store` at startup.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Memory(MemoryLayoutStore),
    Surreal(SurrealLayoutStore),
}

impl LayoutStore for StoreBackend {
    async fn load(&self) -> Result<Layout, HomepageError> {
        match self {
            Self::Memory(store) => store.load().await,
            Self::Surreal(store) => store.load().await,
        }
    }

    async fn compare_and_swap(
        &self,
        expected: LayoutVersion,
        sections: Vec<Section>,
    ) -> Result<Layout, HomepageError> {
        match self {
            Self::Memory(store) => store.compare_and_swap(expected, sections).await,
            Self::Surreal(store) => store.compare_and_swap(expected, sections).await,
        }
    }
}

impl From<MemoryLayoutStore> for StoreBackend {
    fn from(store: MemoryLayoutStore) -> Self {
        Self::Memory(store)
    }
}

impl From<SurrealLayoutStore> for StoreBackend {
    fn from(store: SurrealLayoutStore) -> Self {
        Self::Surreal(store)
    }
}
