use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides (`FOLIO__DATABASE__URL` maps to `database.url`).
pub const ENV_PREFIX: &str = "FOLIO";
const DEFAULT_CONFIG_FILE: &str = "server";

/// Custom error type for config loading.
#[folio_derive::folio_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file layered with environment overrides.
///
/// 1. **Base File**: `path` with any extension supported by `config` (e.g., `server.toml`).
///    An explicit path must exist; when `path` is `None` the `server` file in the working
///    directory is used if present and the type defaults apply otherwise.
/// 2. **Environment Overrides**: variables prefixed with `FOLIO__`, nested with `__`.
///
/// # Errors
/// * An explicitly given file cannot be found or parsed.
/// * The merged values do not match the structure of `T`.
///
/// # Example
/// ```rust
/// use folio_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    info!(path = %effective_path.display(), required, "Loading config");
    load_layered(&effective_path, required, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("security.identity.admin_token_digests")
}

fn load_layered<T>(path: &Path, required: bool, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::config::{ApiConfig, LayoutStoreKind};
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        environment().source(Some(
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
        ))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_are_loaded() {
        let file = toml_file(
            "[server]\nport = 9000\n\n[homepage]\nstore = \"memory\"\ncommit_retries = 1\n",
        );
        let cfg: ApiConfig = load_layered(file.path(), true, env(&[])).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.homepage.store, LayoutStoreKind::Memory);
        assert_eq!(cfg.homepage.commit_retries, 1);
        assert_eq!(cfg.database.url, "mem://");
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml_file("[server]\nport = 9000\n");
        let cfg: ApiConfig = load_layered(
            file.path(),
            true,
            env(&[
                ("FOLIO__SERVER__PORT", "9100"),
                ("FOLIO__SECURITY__IDENTITY__ADMIN_TOKEN_DIGESTS", "aa,bb"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.security.identity.admin_token_digests, vec!["aa", "bb"]);
    }

    #[test]
    fn optional_missing_file_uses_defaults() {
        let cfg: ApiConfig =
            load_layered(Path::new("definitely-missing-folio"), false, env(&[])).unwrap();
        assert_eq!(cfg.server.port, 4583);
    }

    #[test]
    fn required_missing_file_fails() {
        let err = load_layered::<ApiConfig>(Path::new("definitely-missing-folio"), true, env(&[]))
            .unwrap_err();
        assert_eq!(err.kind(), "Config");
    }
}
