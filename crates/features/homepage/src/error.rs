use crate::model::LayoutVersion;
use crate::validator::LayoutViolation;
use std::borrow::Cow;

/// A specialized [`HomepageError`] enum of this crate.
#[folio_derive::folio_error]
pub enum HomepageError {
    /// The candidate failed validation; the store was not touched.
    #[error("Invalid layout{}: {source}", format_context(.context))]
    Invalid { source: LayoutViolation, context: Option<Cow<'static, str>> },
    /// The base version is stale; the store was not touched.
    #[error(
        "Layout conflict{}: expected version {expected}, store is at {current}",
        format_context(.context)
    )]
    Conflict {
        expected: LayoutVersion,
        current: LayoutVersion,
        context: Option<Cow<'static, str>>,
    },
    /// Transient storage failure; safe to retry.
    #[error("Layout store unavailable{}: {message}", format_context(.context))]
    StoreUnavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// The persisted layout cannot be decoded.
    #[error("Stored layout is corrupted{}: {message}", format_context(.context))]
    Corrupted { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal homepage error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl HomepageError {
    /// Whether the failure may succeed when retried unchanged.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Machine-readable kind; validation failures report the violated rule.
    #[must_use]
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Invalid { source, .. } => source.kind(),
            other => other.kind(),
        }
    }
}

impl From<surrealdb::Error> for HomepageError {
    fn from(err: surrealdb::Error) -> Self {
        Self::StoreUnavailable { message: err.to_string().into(), context: None }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::HomepageError;
    use crate::model::LayoutVersion;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use folio_derive::api_model;
    use folio_kernel::server::error_response;
    use tracing::error;

    /// Payload of a `412 Precondition Failed` commit response.
    #[api_model]
    pub struct ConflictBody {
        /// Always `Conflict`.
        pub kind: String,
        pub message: String,
        /// Version the store is actually at; re-fetch before retrying.
        pub current_version: LayoutVersion,
    }

    impl IntoResponse for HomepageError {
        fn into_response(self) -> Response {
            match &self {
                Self::Invalid { source, .. } => error_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    source.kind(),
                    source.to_string(),
                ),
                Self::Conflict { current, .. } => (
                    StatusCode::PRECONDITION_FAILED,
                    Json(ConflictBody {
                        kind: self.kind().to_owned(),
                        message: self.to_string(),
                        current_version: *current,
                    }),
                )
                    .into_response(),
                Self::StoreUnavailable { .. } => {
                    error_response(StatusCode::SERVICE_UNAVAILABLE, self.kind(), self.to_string())
                },
                Self::Corrupted { .. } | Self::Internal { .. } => {
                    error!(error = %self, "Homepage request failed");
                    error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        self.kind(),
                        "Internal server error",
                    )
                },
            }
        }
    }
}

#[cfg(feature = "server")]
pub use response::ConflictBody;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_converts_into_invalid() {
        let err = HomepageError::from(LayoutViolation::NoVisibleSections);
        assert_eq!(err.kind(), "Invalid");
        assert_eq!(err.error_kind(), "NoVisibleSections");
        assert!(!err.is_transient());
    }

    #[test]
    fn conflict_reports_both_versions() {
        let err = HomepageError::Conflict {
            expected: LayoutVersion(5),
            current: LayoutVersion(6),
            context: None,
        };
        assert_eq!(err.to_string(), "Layout conflict: expected version 5, store is at 6");
    }

    #[test]
    fn only_store_failures_are_transient() {
        let err = HomepageError::StoreUnavailable { message: "timeout".into(), context: None };
        assert!(err.is_transient());
        assert!(!HomepageError::from("boom").is_transient());
    }
}
