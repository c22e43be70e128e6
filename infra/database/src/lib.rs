//! # Database Infrastructure
//!
//! This crate provides a unified interface for initializing and managing [SurrealDB](https://surrealdb.com)
//! connections across the workspace.
//!
//! ## Key Features
//! - **Engine Agnostic**: Supports `mem://`, `rocksdb://`, `ws://`, and `http://` via the `any` engine.
//! - **Resilient Connectivity**: Built-in retry logic for health checks during engine startup.
//! - **Slice Migrations**: Feature slices contribute [`Migration`] scripts that are applied once
//!   and verified by checksum on every start.
//!
//! ## Example
//!
//! ```rust
//! use folio_database::{Database, DatabaseError, Migration};
//!
//! const MIGRATIONS: &[Migration] =
//!     &[Migration::new("demo", "0001", "DEFINE TABLE IF NOT EXISTS note SCHEMALESS;")];
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("folio", "core")
//!         .migrations(MIGRATIONS)
//!         .init()
//!         .await?;
//!
//!     let _version = db.version().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod migrations;

pub use error::{DatabaseError, DatabaseErrorExt};
pub use migrations::{Migration, MigrationReport};

use migrations::MigrationRunner;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{info, instrument, warn};

const HEALTH_ATTEMPTS: u32 = 3;
const HEALTH_INITIAL_DELAY: Duration = Duration::from_millis(500);

/// Inner state of the [`Database`] wrapper.
#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// Cheaply cloneable `SurrealDB` client bound to a namespace and database.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Creates a new [`DatabaseBuilder`].
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Applies the given migrations in order, skipping those already recorded.
    ///
    /// # Errors
    /// * [`DatabaseError::Migration`] if a script fails or an applied script was edited.
    /// * [`DatabaseError::Surreal`] if the migration table cannot be read.
    pub async fn migrate(&self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        MigrationRunner::new(&self.inner.instance).run(migrations).await
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.inner.ns
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.inner.db
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// A fluent builder for configuring and establishing a `SurrealDB` connection.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
    migrations: Vec<Migration>,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Add root credentials to the connection.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Queues migrations to apply after the session is activated.
    ///
    /// May be called repeatedly; migrations run in the order they were added.
    pub fn migrations(mut self, migrations: &[Migration]) -> Self {
        self.migrations.extend_from_slice(migrations);
        self
    }

    /// Consumes the builder and establishes the connection.
    ///
    /// # Process
    /// 1. **Validation**: URL, namespace and database name must be provided.
    /// 2. **Engine Initialization**: Connects through the `any` engine.
    /// 3. **Resilience**: Up to 3 health checks with exponential backoff starting at 500ms.
    /// 4. **Authentication**: Signs in as root when credentials were given.
    /// 5. **Session Activation**: Selects the namespace and database.
    /// 6. **Migrations**: Applies the queued migrations.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if required parameters are missing.
    /// * [`DatabaseError::Connection`] if the engine fails to start or remains unhealthy.
    /// * [`DatabaseError::Auth`] if the provided credentials are rejected.
    /// * [`DatabaseError::Surreal`] if the session activation (`use_ns`/`use_db`) fails.
    /// * [`DatabaseError::Migration`] if a migration fails or its checksum changed.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url = self.url.ok_or(DatabaseError::Validation {
            message: "URL is required".into(),
            context: None,
        })?;
        let ns = self.ns.ok_or(DatabaseError::Validation {
            message: "Namespace is required".into(),
            context: None,
        })?;
        let db = self.db.ok_or(DatabaseError::Validation {
            message: "Database is required".into(),
            context: None,
        })?;

        let instance = connect(&url).await.map_err(|e| DatabaseError::Connection {
            message: e.to_string().into(),
            context: Some("Initializing engine".into()),
        })?;

        let mut delay = HEALTH_INITIAL_DELAY;
        for attempt in 1..=HEALTH_ATTEMPTS {
            if instance.health().await.is_ok() {
                break;
            }
            if attempt == HEALTH_ATTEMPTS {
                return Err(DatabaseError::Connection {
                    message: "Unhealthy after retries".into(),
                    context: Some(url.into()),
                });
            }
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        if let Some((username, password)) = self.auth {
            instance.signin(Root { username, password }).await.map_err(|e| {
                DatabaseError::Auth { message: e.to_string().into(), context: Some(url.into()) }
            })?;
        }

        instance.use_ns(&ns).use_db(&db).await.context("Activating session")?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        let database = Database { inner: Arc::new(DatabaseInner { instance, ns, db }) };

        if !self.migrations.is_empty() {
            info!(count = self.migrations.len(), "Applying database migrations...");
            let report = database.migrate(&self.migrations).await?;
            info!(
                applied = report.applied.len(),
                skipped = report.skipped.len(),
                "Database migrations applied successfully"
            );
        }

        Ok(database)
    }
}
