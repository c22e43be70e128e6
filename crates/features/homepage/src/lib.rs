//! # Homepage Layout
//!
//! The ordered, visibility-flagged set of sections shown on the public homepage.
//!
//! Sections come from a fixed [catalog](catalog). The layout is a single versioned aggregate
//! replaced only through [`LayoutService::commit`]: a candidate is validated, then swapped in
//! if the store is still at the version the editor started from. A stale base version yields
//! [`HomepageError::Conflict`] and the editor re-fetches; nothing is merged or retried.
//!
//! ```rust
//! use folio_event_bus::EventBus;
//! use folio_homepage::catalog::SectionId;
//! use folio_homepage::reorder::move_section;
//! use folio_homepage::{LayoutService, MemoryLayoutStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), folio_homepage::HomepageError> {
//! let service = LayoutService::new(MemoryLayoutStore::new(), EventBus::new());
//! let current = service.read().await?;
//! let candidate = move_section(&current.sections, SectionId::Blog, 1);
//! let committed = service.commit(candidate, current.version).await?;
//! assert_eq!(committed.version, current.version.next());
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "server")]
pub mod api;
pub mod catalog;
mod error;
pub mod events;
pub mod model;
pub mod render;
pub mod reorder;
pub mod service;
pub mod session;
pub mod store;
pub mod validator;

#[cfg(feature = "server")]
pub use crate::error::ConflictBody;
pub use crate::error::{HomepageError, HomepageErrorExt};
pub use crate::events::LayoutCommitted;
pub use crate::model::{Layout, LayoutVersion, Section};
pub use crate::service::{LayoutService, RetryPolicy};
pub use crate::session::{EditSession, SaveFailure, SessionError, SessionState};
pub use crate::store::{LayoutStore, MemoryLayoutStore, StoreBackend, SurrealLayoutStore};
pub use crate::validator::{CandidateSection, LayoutViolation};

use folio_database::{Database, Migration};
use folio_event_bus::EventBus;
use folio_kernel::domain::config::{HomepageConfig, LayoutStoreKind};
use folio_kernel::domain::registry::InitializedSlice;
use tracing::info;

/// Schema owned by this slice.
pub const MIGRATIONS: &[Migration] =
    &[Migration::new("homepage", "0001", include_str!("../migrations/0001_layout.surql"))];

/// Homepage feature state
#[folio_derive::folio_slice]
pub struct Homepage {
    pub service: LayoutService<StoreBackend>,
}

/// Initialize the homepage feature on the configured store.
///
/// The database store expects [`MIGRATIONS`] to be applied already and seeds the layout
/// record on first start.
///
/// # Errors
/// * [`HomepageError::Internal`] if the database store is selected without a connection.
/// * [`HomepageError::StoreUnavailable`] if the layout record cannot be read or seeded.
pub async fn init(
    config: &HomepageConfig,
    database: Option<&Database>,
    events: &EventBus,
) -> Result<(Homepage, InitializedSlice), HomepageError> {
    let store = match (config.store, database) {
        (LayoutStoreKind::Memory, _) => StoreBackend::from(MemoryLayoutStore::new()),
        (LayoutStoreKind::Database, Some(db)) => {
            StoreBackend::from(SurrealLayoutStore::open(db.clone()).await?)
        },
        (LayoutStoreKind::Database, None) => {
            return Err(HomepageError::Internal {
                message: "database store selected but no database connection provided".into(),
                context: Some("homepage.store".into()),
            });
        },
    };

    let service = LayoutService::new(store, events.clone()).with_retry(RetryPolicy::from(config));
    let current = service.read().await?;
    info!(store = ?config.store, version = %current.version, "Homepage slice initialized");

    let slice = Homepage::new(HomepageInner { service });
    Ok((slice.clone(), InitializedSlice::new(slice)))
}
