//! # Runtime
//!
//! Standardized [Tokio](https://tokio.rs) runtime profiles for the workspace binaries.
//!
//! ## Profiles
//! * **Server**: Larger stacks and long keep-alive for the HTTP server.
//! * **Compact**: Half the workers and small stacks for tools and tests.
//! * **Default**: Worker count detected from `TOKIO_WORKER_THREADS` or the hardware.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[folio_runtime::main(server)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use folio_derive::main;

use anyhow::anyhow;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Fallback worker count when the parallelism cannot be detected.
const DEFAULT_WORKER_THREADS: usize = 4;
const MAX_WORKER_THREADS: usize = 1024;
/// Default stack size for worker threads (3 `MiB`).
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
const MIN_STACK_SIZE: usize = 1024 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const DEFAULT_THREAD_NAME: &str = "folio-worker";

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

fn detected_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= MAX_WORKER_THREADS)
            .unwrap_or_else(|| {
                available_parallelism()
                    .map(std::num::NonZero::get)
                    .unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

/// Configuration for the multithreaded Tokio runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: detected_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            thread_keep_alive: Duration::from_secs(60),
        }
    }
}

impl RuntimeConfig {
    /// Preset for the HTTP server.
    #[must_use]
    pub fn server() -> Self {
        Self {
            stack_size: 4 * 1024 * 1024,
            thread_name: "folio-server".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
            ..Self::default()
        }
    }

    /// Preset for short-lived tools where memory footprint matters.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            worker_threads: (detected_worker_threads() / 2).max(1),
            stack_size: 2 * 1024 * 1024,
            thread_name: "folio-compact".to_owned(),
            thread_keep_alive: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name = if name.trim().is_empty() { DEFAULT_THREAD_NAME.to_owned() } else { name };
        self
    }

    /// Clamps every knob into its supported range.
    fn normalized(&self) -> Self {
        self.clone()
            .with_worker_threads(self.worker_threads)
            .with_stack_size(self.stack_size)
            .with_thread_name(self.thread_name.clone())
    }
}

/// Builds a multithreaded runtime with I/O and timers enabled.
///
/// # Errors
///
/// Returns an error if the OS refuses to spawn the worker threads.
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(config = ?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}
