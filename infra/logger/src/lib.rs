//! # Logger
//!
//! Installs the global `tracing` subscriber for the workspace binaries: console output
//! (compact or JSON), optional rolling file output through a non-blocking writer, and
//! `RUST_LOG`-style filtering.
//!
//! * Optional `profiling` support attaches `console-subscriber` when built with
//!   `--cfg tokio_unstable`.
//! * Use [`LoggerBuilder::env_filter`] for module-directed defaults
//!   (e.g., `"folio_homepage=debug,hyper=info"`); `RUST_LOG` still applies when no filter is set.
//!
//! ## Example
//!
//! ```rust
//! # use folio_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("folio-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output encoding of a log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human readable output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

#[derive(Debug)]
struct FileSink {
    path: PathBuf,
    rotation: Rotation,
    max_files: usize,
    format: LogFormat,
}

#[derive(Debug)]
struct LoggerConfig {
    console: Option<LogFormat>,
    file: Option<FileSink>,
    level: LevelFilter,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: Some(LogFormat::Compact),
            file: None,
            level: LevelFilter::INFO,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// A builder for the global tracing subscriber.
///
/// The name is mandatory (it prefixes rolling log files); file-only knobs become available
/// after [`LoggerBuilder::path`].
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Sets the name of the logger.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder { name: WithName(name.into()), config: self.config, file_state: PhantomData }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    /// Maximum number of rotated log files to keep.
    #[must_use]
    pub fn max_files(mut self, max: usize) -> Self {
        if let Some(file) = self.config.file.as_mut() {
            file.max_files = max;
        }
        self
    }

    /// Log file rotation strategy.
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = self.config.file.as_mut() {
            file.rotation = rotation;
        }
        self
    }

    /// Writes JSON lines to the log files.
    #[must_use]
    pub fn json(mut self) -> Self {
        if let Some(file) = self.config.file.as_mut() {
            file.format = LogFormat::Json;
        }
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Minimum level emitted when no filter directive matches.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Programmatic filter directives (e.g., `folio=debug,hyper=info`).
    ///
    /// Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables console output.
    #[must_use]
    pub fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled.then(|| self.config.console.unwrap_or_default());
        self
    }

    /// Console output encoding; implies console output.
    #[must_use]
    pub const fn console_format(mut self, format: LogFormat) -> Self {
        self.config.console = Some(format);
        self
    }

    /// Writes rolling log files into `path`.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.file = Some(FileSink {
            path: path.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            format: LogFormat::Compact,
        });
        LoggerBuilder { config, name: self.name, file_state: PhantomData }
    }

    /// Installs the global subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle owning the file writer guard; keep it alive until shutdown so
    /// buffered lines are flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`,
    ///   bad filter directives or when every sink is disabled.
    /// * [`LoggerError::Appender`] if the rolling file appender cannot be created.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        validate_config(&self.config, &name)?;
        let env_filter = build_env_filter(&self.config)?;

        let mut layers: Vec<BoxedLayer> = Vec::new();

        #[cfg(all(feature = "profiling", tokio_unstable))]
        if self.config.console.is_some() {
            layers.push(console_subscriber::spawn().boxed());
        }

        match self.config.console {
            Some(LogFormat::Compact) => layers.push(layer().compact().with_ansi(true).boxed()),
            Some(LogFormat::Json) => layers.push(layer().json().boxed()),
            None => {},
        }

        let guard = match self.config.file {
            Some(sink) => {
                let (file_layer, guard) = file_layer(&name, sink)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging sinks enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(env_filter).try_init()?;

        Ok(Logger { guard })
    }
}

fn file_layer(name: &str, sink: FileSink) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&sink.path).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create path: {}", sink.path.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(sink.rotation)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(sink.max_files)
        .build(&sink.path)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let base = layer().with_writer(writer).with_ansi(false);
    let boxed = match sink.format {
        LogFormat::Compact => base.boxed(),
        LogFormat::Json => base.json().boxed(),
    };

    Ok((boxed, guard))
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts configuring the global subscriber.
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder().name("my-app").level(LevelFilter::DEBUG).init().unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName, file_state: PhantomData }
    }

    /// Returns the file writer guard, if file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.file.as_ref().is_some_and(|file| file.max_files == 0) {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builder_defaults_to_compact_console() {
        let builder = Logger::builder().name("test-app").env_filter("folio=debug");
        assert_eq!(builder.config.console, Some(LogFormat::Compact));
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("folio=debug"));
        assert!(builder.config.file.is_none());
    }

    #[test]
    fn file_options_apply_to_sink() {
        let tmp_dir = tempdir().unwrap();
        let log_dir = tmp_dir.path().join("logs");
        let builder = Logger::builder()
            .name("test-app")
            .console(false)
            .path(log_dir.clone())
            .max_files(5)
            .rotation(Rotation::HOURLY)
            .json()
            .level(LevelFilter::DEBUG);

        let sink = builder.config.file.as_ref().unwrap();
        assert!(builder.config.console.is_none());
        assert_eq!(builder.config.level, LevelFilter::DEBUG);
        assert_eq!(sink.max_files, 5);
        assert_eq!(sink.format, LogFormat::Json);
        assert_eq!(sink.path, log_dir);
    }

    #[test]
    fn console_toggle_keeps_selected_format() {
        let builder = Logger::builder().name("test-app").console_format(LogFormat::Json);
        let builder = builder.console(true);
        assert_eq!(builder.config.console, Some(LogFormat::Json));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn no_sinks_is_rejected() {
        let err = Logger::builder().name("silent").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let err = Logger::builder().name("filtered").env_filter("folio=loudest").init().unwrap_err();
        assert_eq!(err.kind(), "InvalidConfiguration");
    }
}
