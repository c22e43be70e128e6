//! Facade crate for Folio features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `folio` with the `server` feature for the HTTP surface.
//! - Apply [`migrations`] when connecting the database, then call [`init`] to build the
//!   feature slices and the administrator access policy.

use folio_database::{Database, Migration};
pub use folio_domain as domain;
use folio_domain::config::ApiConfig;
use folio_domain::registry::InitializedSlice;
use folio_event_bus::EventBus;
use folio_homepage::HomepageError;
use folio_identity::IdentityError;
pub use folio_kernel as kernel;
use folio_kernel::security::AccessPolicy;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use folio_homepage::api::router as homepage_router;
        pub use folio_kernel::server::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use folio_homepage as homepage;
    pub use folio_identity as identity;

    /// Slices compiled into this build.
    pub const ENABLED: &[&str] = &[
        "homepage",
        "identity",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[folio_derive::folio_error]
pub enum PlatformError {
    #[error("Identity bootstrap failed{}: {source}", format_context(.context))]
    Identity { source: IdentityError, context: Option<Cow<'static, str>> },
    #[error("Homepage bootstrap failed{}: {source}", format_context(.context))]
    Homepage { source: HomepageError, context: Option<Cow<'static, str>> },
}

/// Initialized feature slices and the access policy guarding administrator routes.
#[derive(Debug)]
pub struct Platform {
    pub slices: Vec<InitializedSlice>,
    pub access: Arc<dyn AccessPolicy>,
}

/// Schema migrations of every slice, in application order.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    folio_homepage::MIGRATIONS.to_vec()
}

/// Initialize all enabled features.
///
/// `database` may be `None` when the homepage runs on the in-memory store.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub async fn init(
    config: &ApiConfig,
    database: Option<&Database>,
    events: &EventBus,
) -> Result<Platform, PlatformError> {
    let mut slices = Vec::new();

    // Identity
    let (identity, slice) = folio_identity::init(&config.security.identity)?;
    let access = identity.access_policy();
    slices.push(slice);

    // Homepage
    let (_, slice) = folio_homepage::init(&config.homepage, database, events).await?;
    slices.push(slice);

    info!(slices = slices.len(), "Platform initialized");
    Ok(Platform { slices, access })
}
