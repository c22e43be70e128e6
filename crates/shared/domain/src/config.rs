use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub homepage: HomepageConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// `SurrealDB` connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub credentials: Option<DatabaseCredentials>,
}

/// `SurrealDB` root credentials (optional when using unauthenticated engines like mem://).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

/// Optional API security knobs.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub identity: IdentityConfig,
}

/// Administrator identity configuration.
///
/// Holds hex-encoded SHA-256 digests of accepted bearer tokens, never the tokens themselves.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub admin_token_digests: Vec<String>,
}

/// Backend persisting the homepage layout.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStoreKind {
    #[default]
    Database,
    Memory,
}

/// Homepage layout service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomepageConfig {
    pub store: LayoutStoreKind,
    /// Extra attempts after a transient store failure; conflicts are never retried.
    pub commit_retries: u32,
    /// Initial backoff between retries, doubled on every attempt.
    pub retry_backoff_ms: u64,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4583, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mem://".to_owned(),
            namespace: "folio".to_owned(),
            database: "core".to_owned(),
            credentials: None,
        }
    }
}

impl Default for DatabaseCredentials {
    fn default() -> Self {
        Self { username: "root".to_owned(), password: "root".to_owned() }
    }
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self { store: LayoutStoreKind::Database, commit_retries: 3, retry_backoff_ms: 100 }
    }
}
