//! Identity feature slice: verifies administrator bearer tokens for write endpoints.

mod error;
mod token;

pub use crate::error::{IdentityError, IdentityErrorExt};
pub use crate::token::TokenDigestPolicy;

use folio_kernel::domain::config::IdentityConfig;
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::security::AccessPolicy;
use std::sync::Arc;
use tracing::{info, warn};

/// Identity feature state
#[folio_derive::folio_slice]
pub struct Identity {
    pub policy: Arc<TokenDigestPolicy>,
}

impl Identity {
    /// The policy as the kernel access seam.
    #[must_use]
    pub fn access_policy(&self) -> Arc<dyn AccessPolicy> {
        self.policy.clone()
    }
}

/// Initialize the identity feature from the `security.identity` configuration.
///
/// # Errors
/// Returns [`IdentityError::Config`] if a configured digest is malformed.
pub fn init(config: &IdentityConfig) -> Result<(Identity, InitializedSlice), IdentityError> {
    let policy = TokenDigestPolicy::from_hex_digests(&config.admin_token_digests)?;
    if policy.is_empty() {
        warn!("No administrator token digests configured; write endpoints will reject every request");
    }
    info!(admins = policy.len(), "Identity slice initialized");

    let slice = Identity::new(IdentityInner { policy: Arc::new(policy) });
    Ok((slice.clone(), InitializedSlice::new(slice)))
}
