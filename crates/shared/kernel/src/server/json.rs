use super::error::error_response;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

/// JSON request body whose rejections are reported as [`ErrorBody`](super::ErrorBody).
///
/// Status codes follow axum's `Json`: 400 for unparsable input, 415 without a JSON content
/// type and 422 when the document does not match `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let kind = rejection_kind(&rejection);
                debug!(kind, error = %rejection.body_text(), "Request body rejected");
                Err(error_response(rejection.status(), kind, rejection.body_text()))
            },
        }
    }
}

const fn rejection_kind(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonDataError(_) => "InvalidBody",
        JsonRejection::MissingJsonContentType(_) => "UnsupportedMediaType",
        _ => "MalformedBody",
    }
}
