//! Read and commit operations over a [`LayoutStore`].

use crate::catalog::default_sections;
use crate::error::HomepageError;
use crate::events::LayoutCommitted;
use crate::model::{Layout, LayoutVersion, Section, sorted};
use crate::store::LayoutStore;
use crate::validator::{CandidateSection, parse_candidate, validate};
use folio_event_bus::EventBus;
use folio_kernel::domain::config::HomepageConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Bounded retries of transient store failures.
///
/// Conflicts and validation errors are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    /// Delay before the first retry; doubled after each attempt.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: Self = Self { retries: 0, backoff: Duration::ZERO };
}

impl From<&HomepageConfig> for RetryPolicy {
    fn from(config: &HomepageConfig) -> Self {
        Self {
            retries: config.commit_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&HomepageConfig::default())
    }
}

/// Reader and writer of the homepage layout.
///
/// Holds no lock between calls; concurrent writers are serialized only by the store's
/// compare-and-swap.
#[derive(Debug, Clone)]
pub struct LayoutService<S> {
    store: S,
    events: EventBus,
    retry: RetryPolicy,
}

impl<S: LayoutStore> LayoutService<S> {
    pub fn new(store: S, events: EventBus) -> Self {
        Self { store, events, retry: RetryPolicy::default() }
    }

    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Current layout and its version. Never mutates the store.
    ///
    /// # Errors
    /// [`HomepageError::StoreUnavailable`] once retries are exhausted, or
    /// [`HomepageError::Corrupted`] if the stored layout cannot be decoded.
    #[instrument(skip(self))]
    pub async fn read(&self) -> Result<Layout, HomepageError> {
        self.retrying("read", || self.store.load()).await
    }

    /// Validates `candidate` and swaps it in if the store is still at `base`.
    ///
    /// # Errors
    /// * [`HomepageError::Invalid`] if the candidate breaks a layout invariant.
    /// * [`HomepageError::Conflict`] if another commit advanced the version first.
    /// * [`HomepageError::StoreUnavailable`] once retries are exhausted.
    #[instrument(skip(self, candidate), fields(%base))]
    pub async fn commit(
        &self,
        candidate: Vec<Section>,
        base: LayoutVersion,
    ) -> Result<Layout, HomepageError> {
        validate(&candidate).inspect_err(|violation| {
            debug!(kind = violation.kind(), "Candidate layout rejected");
        })?;
        self.swap(sorted(&candidate), base).await
    }

    /// Same as [`LayoutService::commit`] for an untyped wire candidate.
    ///
    /// # Errors
    /// See [`LayoutService::commit`]; unknown ids are reported as
    /// `UnknownOrMissingSection`.
    #[instrument(skip(self, candidate), fields(%base))]
    pub async fn commit_entries(
        &self,
        candidate: &[CandidateSection],
        base: LayoutVersion,
    ) -> Result<Layout, HomepageError> {
        let sections = parse_candidate(candidate).inspect_err(|violation| {
            debug!(kind = violation.kind(), "Candidate layout rejected");
        })?;
        self.swap(sections, base).await
    }

    /// Commits the catalog defaults through the regular compare-and-swap path.
    ///
    /// # Errors
    /// See [`LayoutService::commit`].
    #[instrument(skip(self), fields(%base))]
    pub async fn reset(&self, base: LayoutVersion) -> Result<Layout, HomepageError> {
        self.swap(default_sections(), base).await
    }

    async fn swap(
        &self,
        sections: Vec<Section>,
        base: LayoutVersion,
    ) -> Result<Layout, HomepageError> {
        let result = self.swap_once_landed(&sections, base).await;

        match &result {
            Ok(layout) => {
                info!(version = %layout.version, "Homepage layout committed");
                if let Err(err) = self.events.publish(LayoutCommitted { layout: layout.clone() }) {
                    warn!(error = %err, "Failed to publish layout commit");
                }
            },
            Err(HomepageError::Conflict { current, .. }) => {
                info!(%base, %current, "Homepage layout commit lost to a newer version");
            },
            Err(_) => {},
        }
        result
    }

    /// Issues the swap, resolving transient failures by re-reading the store.
    ///
    /// A failed reply does not mean the write was dropped. The swap is re-issued only while
    /// the store is still at `base`; a store at `base.next()` holding `sections` is our own
    /// commit. Any other state leaves the outcome unknown and the failure is surfaced.
    async fn swap_once_landed(
        &self,
        sections: &[Section],
        base: LayoutVersion,
    ) -> Result<Layout, HomepageError> {
        let mut delay = self.retry.backoff;
        let mut retries = 0;
        loop {
            let err = match self.store.compare_and_swap(base, sections.to_vec()).await {
                Err(err) if err.is_transient() => err,
                result => return result,
            };

            match self.retrying("commit recovery", || self.store.load()).await {
                Ok(current)
                    if current.version == base.next() && sorted(&current.sections) == sections =>
                {
                    warn!(
                        error = %err,
                        version = %current.version,
                        "Layout swap landed despite store failure"
                    );
                    return Ok(current);
                },
                Ok(current) if current.version == base && retries < self.retry.retries => {
                    retries += 1;
                    warn!(retries, ?delay, error = %err, "Layout store unavailable, retrying...");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                },
                _ => return Err(err),
            }
        }
    }

    async fn retrying<T, F, Fut>(&self, op: &'static str, mut attempt: F) -> Result<T, HomepageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, HomepageError>>,
    {
        let mut delay = self.retry.backoff;
        let mut retries = 0;
        loop {
            match attempt().await {
                Err(err) if err.is_transient() && retries < self.retry.retries => {
                    retries += 1;
                    warn!(op, retries, ?delay, error = %err, "Layout store unavailable, retrying...");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                },
                result => return result,
            }
        }
    }
}
