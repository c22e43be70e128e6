//! Common imports for feature slices.

pub use crate::domain::config::ApiConfig;
pub use crate::domain::registry::{FeatureSlice, InitializedSlice};
pub use crate::events::EventBus;
pub use crate::security::{AccessError, AccessPolicy, Principal};
pub use folio_derive::{api_handler, api_model, folio_error, folio_slice};

#[cfg(feature = "server")]
pub use crate::security::AdminAccess;
#[cfg(feature = "server")]
pub use crate::server::{ApiState, ErrorBody, error_response};
