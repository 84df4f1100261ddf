//! Random object key generation.

use super::store::ObjectStore;
use super::UploadError;

/// Lengths tried past `initial_length` before giving up
const MAX_GROWTH: usize = 32;

/// Draws short random names from `[0-9A-Za-z]`, growing the length after
/// repeated collisions with existing objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGenerator {
    pub initial_length: usize,
    pub tries_per_length: usize,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self {
            initial_length: 5,
            tries_per_length: 3,
        }
    }
}

impl KeyGenerator {
    pub fn new(initial_length: usize, tries_per_length: usize) -> Self {
        Self {
            initial_length: initial_length.max(1),
            tries_per_length: tries_per_length.max(1),
        }
    }

    /// One random candidate of `length` characters, with `.extension`
    /// appended when the extension is non-empty.
    pub fn candidate(&self, rng: &mut fastrand::Rng, length: usize, extension: &str) -> String {
        let mut key: String = std::iter::repeat_with(|| rng.alphanumeric())
            .take(length)
            .collect();
        if !extension.is_empty() {
            key.push('.');
            key.push_str(extension);
        }
        key
    }

    /// Find a key not yet present in `store`.
    pub async fn generate<S>(&self, store: &S, extension: &str) -> Result<String, UploadError>
    where
        S: ObjectStore + ?Sized,
    {
        let mut rng = fastrand::Rng::new();
        let mut attempts = 0;

        for length in self.initial_length..=self.initial_length + MAX_GROWTH {
            for _ in 0..self.tries_per_length {
                let key = self.candidate(&mut rng, length, extension);
                attempts += 1;
                if !store.exists(&key).await? {
                    tracing::debug!(key = %key, attempts, "generated object key");
                    return Ok(key);
                }
                tracing::trace!(key = %key, "object key taken");
            }
        }

        Err(UploadError::KeySpaceExhausted(attempts))
    }
}
