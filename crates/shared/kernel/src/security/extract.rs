use super::access::{AccessError, Principal};
use crate::server::ApiState;
use crate::server::error::error_response;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

/// Extractor granting access to administrator-only handlers.
///
/// Reads `Authorization: Bearer <token>` and asks the configured
/// [`AccessPolicy`](super::AccessPolicy). Missing or malformed credentials are rejected with
/// `401 Unauthorized`, refused tokens with `403 Forbidden`.
#[derive(Debug, Clone)]
pub struct AdminAccess(pub Principal);

impl FromRequestParts<ApiState> for AdminAccess {
    type Rejection = AccessError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let principal = state.access.authorize(token).inspect_err(|err| {
            warn!(path = %parts.uri.path(), error = %err, "Administrator token rejected");
        })?;
        debug!(subject = %principal.subject, "Administrator authorized");
        Ok(Self(principal))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AccessError> {
    let header = parts.headers.get(AUTHORIZATION).ok_or(AccessError::Unauthenticated {
        message: "Authorization header is missing".into(),
        context: None,
    })?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(AccessError::Unauthenticated {
            message: "Expected a bearer token".into(),
            context: None,
        })
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        match &self {
            Self::Unauthenticated { .. } => {
                let mut response =
                    error_response(StatusCode::UNAUTHORIZED, self.kind(), self.to_string());
                response.headers_mut().insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            },
            Self::Forbidden { .. } => {
                error_response(StatusCode::FORBIDDEN, self.kind(), self.to_string())
            },
        }
    }
}
