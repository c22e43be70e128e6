//! Names shared between slices, the database schema and the API documentation.

/// Application name used for logs, runtime threads and the default namespace.
pub const APP_NAME: &str = "folio";

/// `OpenAPI` tag of system endpoints.
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag of the homepage layout endpoints.
pub const HOMEPAGE_TAG: &str = "Homepage";

/// Table holding the homepage layout aggregate.
pub const HOMEPAGE_LAYOUT_TABLE: &str = "homepage_layout";
/// Record key of the single layout aggregate.
pub const HOMEPAGE_LAYOUT_RECORD: &str = "current";
