use crate::error::IdentityError;
use folio_kernel::security::{AccessError, AccessPolicy, Principal};
use sha2::{Digest, Sha256};

const DIGEST_HEX_LEN: usize = 64;

/// Accepts bearer tokens whose SHA-256 digest is in the configured allow list.
///
/// Only digests are held in memory; the subject of an accepted token is `admin:<prefix>`
/// where `<prefix>` is the first eight hex digits of its digest.
#[derive(Debug, Clone, Default)]
pub struct TokenDigestPolicy {
    digests: Vec<[u8; 32]>,
}

impl TokenDigestPolicy {
    /// Parses hex-encoded SHA-256 digests.
    ///
    /// # Errors
    /// Returns [`IdentityError::Config`] for an entry that is not 64 hex digits.
    pub fn from_hex_digests<I, S>(digests: I) -> Result<Self, IdentityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let digests = digests
            .into_iter()
            .enumerate()
            .map(|(index, digest)| parse_digest(index, digest.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { digests })
    }

    /// Hex-encoded SHA-256 of `token`, the format expected in configuration.
    #[must_use]
    pub fn digest_hex(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl AccessPolicy for TokenDigestPolicy {
    fn authorize(&self, token: &str) -> Result<Principal, AccessError> {
        let digest: [u8; 32] = Sha256::digest(token.as_bytes()).into();
        if self.digests.contains(&digest) {
            Ok(Principal::new(format!("admin:{}", &hex::encode(digest)[..8])))
        } else {
            Err(AccessError::Forbidden {
                message: "Token is not an administrator token".into(),
                context: None,
            })
        }
    }
}

fn parse_digest(index: usize, digest: &str) -> Result<[u8; 32], IdentityError> {
    let digest = digest.trim();
    let mut bytes = [0u8; 32];
    if digest.len() != DIGEST_HEX_LEN || hex::decode_to_slice(digest, &mut bytes).is_err() {
        return Err(IdentityError::Config {
            message: format!("admin_token_digests[{index}] must be 64 hex digits").into(),
            context: None,
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_configured_token() {
        let policy =
            TokenDigestPolicy::from_hex_digests([TokenDigestPolicy::digest_hex("s3cret")]).unwrap();
        let principal = policy.authorize("s3cret").unwrap();
        assert!(principal.subject.starts_with("admin:"));
        assert_eq!(principal.subject.len(), "admin:".len() + 8);
    }

    #[test]
    fn rejects_other_tokens() {
        let policy =
            TokenDigestPolicy::from_hex_digests([TokenDigestPolicy::digest_hex("s3cret")]).unwrap();
        assert_eq!(policy.authorize("guess").unwrap_err().kind(), "Forbidden");
    }

    #[test]
    fn uppercase_digests_are_accepted() {
        let digest = TokenDigestPolicy::digest_hex("s3cret").to_uppercase();
        let policy = TokenDigestPolicy::from_hex_digests([digest]).unwrap();
        assert!(policy.authorize("s3cret").is_ok());
    }

    #[test]
    fn malformed_digest_is_a_config_error() {
        let err = TokenDigestPolicy::from_hex_digests(["not-hex"]).unwrap_err();
        assert!(matches!(err, IdentityError::Config { .. }));
        assert!(err.to_string().contains("admin_token_digests[0]"));
    }

    #[test]
    fn empty_policy_rejects_everything() {
        let policy = TokenDigestPolicy::from_hex_digests(Vec::<String>::new()).unwrap();
        assert!(policy.is_empty());
        assert!(policy.authorize("").is_err());
    }
}
