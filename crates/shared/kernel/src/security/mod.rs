//! Access control seam between the HTTP layer and the identity provider.

mod access;
#[cfg(feature = "server")]
mod extract;

pub use access::{AccessError, AccessErrorExt, AccessPolicy, DenyAll, Principal};
#[cfg(feature = "server")]
pub use extract::AdminAccess;
