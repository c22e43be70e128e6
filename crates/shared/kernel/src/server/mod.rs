//! Axum building blocks shared by every slice: state, system routes and error bodies.

pub mod error;
mod health;
mod json;
mod state;

pub use error::{ErrorBody, error_response};
pub use health::router as system_router;
pub use json::ApiJson;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
