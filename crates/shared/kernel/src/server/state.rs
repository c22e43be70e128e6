use super::health::START_TIME;
use crate::security::{AccessPolicy, DenyAll};
use axum::extract::FromRef;
use folio_database::Database;
use folio_domain::config::ApiConfig;
use folio_domain::registry::{FeatureSlice, InitializedSlice};
use folio_event_bus::EventBus;
use fxhash::FxHashMap;
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::{Arc, LazyLock};
use tracing::debug;

#[folio_derive::folio_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("State missing feature slice{}: {message}", format_context(.context))]
    MissingSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub database: Option<Database>,
    pub events: EventBus,
    pub access: Arc<dyn AccessPolicy>,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    #[must_use]
    pub fn get_slice<T: FeatureSlice>(&self) -> Option<&T> {
        self.inner
            .slices
            .get(&TypeId::of::<T>())
            .and_then(|initialized| initialized.state.as_any().downcast_ref::<T>())
    }

    /// Returns a reference to the slice if it is registered.
    ///
    /// # Errors
    /// Returns an error if the slice is not registered.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.get_slice::<T>().ok_or_else(|| ApiStateError::MissingSlice {
            message: std::any::type_name::<T>().into(),
            context: None,
        })
    }

    /// Names of the registered slices (for diagnostics).
    pub fn slice_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.slices.values().map(InitializedSlice::name)
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<ApiState> for EventBus {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.events.clone()
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    database: Option<Database>,
    events: Option<EventBus>,
    access: Option<Arc<dyn AccessPolicy>>,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Attaches the database handle; deployments on the in-memory store may omit it.
    #[must_use]
    pub fn db(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    #[must_use]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Sets the administrator access policy; every token is refused without one.
    #[must_use]
    pub fn access(mut self, access: Arc<dyn AccessPolicy>) -> Self {
        self.access = Some(access);
        self
    }

    #[must_use]
    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.insert(slice.id, slice);
        self
    }

    /// Registers multiple slices at once.
    #[must_use]
    pub fn register_slices<I>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = InitializedSlice>,
    {
        for slice in slices {
            self.slices.insert(slice.id, slice);
        }
        self
    }

    /// # Errors
    /// Returns [`ApiStateError::Validation`] if no configuration was provided.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = self.config.ok_or_else(|| ApiStateError::Validation {
            message: "ApiConfig not provided".into(),
            context: None,
        })?;
        let events = self.events.unwrap_or_default();
        let access = self.access.unwrap_or_else(|| Arc::new(DenyAll));

        LazyLock::force(&START_TIME);
        debug!(slices = self.slices.len(), "API state built");

        Ok(ApiState {
            inner: Arc::new(ApiStateInner {
                config,
                database: self.database,
                events,
                access,
                slices: self.slices,
            }),
        })
    }
}
