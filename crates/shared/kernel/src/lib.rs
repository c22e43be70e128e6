//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading, the administrator access seam and,
//! behind the `server` feature, the Axum state and system routes every slice plugs into.
//!
//! ## Config loading
//! ```rust,ignore
//! use folio_kernel::config::load_config;
//! use folio_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server.toml"))?;
//! ```

pub mod config;
pub mod prelude;
pub mod security;
#[cfg(feature = "server")]
pub mod server;

pub use folio_domain as domain;
pub use folio_event_bus as events;
