//! Bearer token check for uploads.

use super::UploadError;
use crate::config::split_secrets;

/// Accepts `Authorization: Bearer <secret>` for any configured secret.
///
/// Secrets are kept as blake3 digests; `blake3::Hash` equality is constant
/// time, so comparing digests does not leak how much of a token matched.
#[derive(Debug, Clone, Default)]
pub struct BearerAuth {
    digests: Vec<blake3::Hash>,
}

impl BearerAuth {
    pub fn new<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let digests = secrets
            .into_iter()
            .filter(|s| !s.as_ref().is_empty())
            .map(|s| blake3::hash(s.as_ref().as_bytes()))
            .collect();
        Self { digests }
    }

    /// Build from a comma separated list such as `"alpha,beta"`
    pub fn from_secrets(raw: &str) -> Self {
        Self::new(split_secrets(raw))
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Check an `Authorization` header value
    pub fn authorize(&self, header: Option<&str>) -> Result<(), UploadError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or(UploadError::Unauthorized)?;

        let digest = blake3::hash(token.as_bytes());
        if self.digests.iter().any(|d| *d == digest) {
            Ok(())
        } else {
            tracing::debug!("rejected upload token");
            Err(UploadError::Unauthorized)
        }
    }
}
