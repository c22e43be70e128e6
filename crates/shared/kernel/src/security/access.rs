use std::borrow::Cow;
use std::fmt::Debug;

#[folio_derive::folio_error]
pub enum AccessError {
    /// No usable credentials were presented.
    #[error("Missing credentials{}: {message}", format_context(.context))]
    Unauthenticated { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Credentials were presented but do not grant administrator access.
    #[error("Access denied{}: {message}", format_context(.context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// An authenticated administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: Cow<'static, str>,
}

impl Principal {
    #[must_use]
    pub fn new(subject: impl Into<Cow<'static, str>>) -> Self {
        Self { subject: subject.into() }
    }
}

/// Decides whether a bearer token grants administrator access.
///
/// Implemented by the identity slice; the kernel only extracts the token from requests.
pub trait AccessPolicy: Debug + Send + Sync + 'static {
    /// # Errors
    /// Returns [`AccessError::Forbidden`] when the token is not accepted.
    fn authorize(&self, token: &str) -> Result<Principal, AccessError>;
}

/// Policy rejecting every token; used when no identity provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl AccessPolicy for DenyAll {
    fn authorize(&self, _token: &str) -> Result<Principal, AccessError> {
        Err(AccessError::Forbidden {
            message: "No administrator tokens are configured".into(),
            context: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_all_rejects_every_token() {
        let err = DenyAll.authorize("anything").unwrap_err();
        assert_eq!(err.kind(), "Forbidden");
    }
}
