//! Upload Module - Authenticated, type-sniffed object uploads
//!
//! An upload is authorized against the configured bearer secrets, its first
//! few kilobytes are peeked and sniffed, and the whole stream (prefix
//! included) is written to an [`ObjectStore`] under either the caller's key
//! or a freshly generated one carrying the detected extension.

pub mod auth;
pub mod keygen;
pub mod store;

use std::io;

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

pub use auth::BearerAuth;
pub use keygen::KeyGenerator;
pub use store::{validate_key, FsStore, ObjectMeta, ObjectStore};

use crate::config::Config;
use crate::sniff::{FileKind, Sniffer, DEFAULT_PREFIX_LEN};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error("invalid object key: {0:?}")]
    InvalidKey(String),

    #[error("no free object key after {0} attempts")]
    KeySpaceExhausted(usize),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Read up to `len` bytes from the head of `reader` without losing them.
///
/// Returns the prefix together with a reader that yields the prefix again
/// followed by the rest of the stream. Short streams give a short prefix.
pub async fn peek_prefix<R>(
    mut reader: R,
    len: usize,
) -> io::Result<(Vec<u8>, impl AsyncRead + Unpin)>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        let n = reader.read(&mut prefix[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    prefix.truncate(filled);

    let replay = io::Cursor::new(prefix.clone());
    Ok((prefix, replay.chain(reader)))
}

/// Per-upload parameters supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Raw `Authorization` header value
    pub authorization: Option<String>,
    /// Explicit object key; generated when absent
    pub key: Option<String>,
    /// Declared content type; the sniffed MIME is used when absent or empty
    pub content_type: Option<String>,
}

/// Result of a stored upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub key: String,
    /// What sniffing found; `None` when nothing matched
    pub detected: Option<FileKind>,
    pub meta: ObjectMeta,
}

/// Sniff-then-store pipeline over an [`ObjectStore`]
pub struct Uploader<S> {
    store: S,
    sniffer: Sniffer,
    auth: BearerAuth,
    keys: KeyGenerator,
    prefix_len: usize,
}

impl<S: ObjectStore> Uploader<S> {
    pub fn new(store: S, auth: BearerAuth) -> Self {
        Self {
            store,
            sniffer: Sniffer::new(),
            auth,
            keys: KeyGenerator::default(),
            prefix_len: DEFAULT_PREFIX_LEN,
        }
    }

    /// Uploader configured from the `[sniff]` and `[upload]` sections
    pub fn from_config(store: S, config: &Config) -> Self {
        Self {
            store,
            sniffer: Sniffer::with_options(config.sniff.options()),
            auth: BearerAuth::new(&config.upload.auth_secrets),
            keys: KeyGenerator::new(config.upload.initial_key_length, config.upload.tries_per_length),
            prefix_len: config.sniff.prefix_len,
        }
    }

    pub fn with_keys(mut self, keys: KeyGenerator) -> Self {
        self.keys = keys;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn put<R>(&self, reader: R, request: UploadRequest) -> Result<UploadReceipt, UploadError>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.auth.authorize(request.authorization.as_deref())?;
        if let Some(key) = &request.key {
            validate_key(key)?;
        }

        let (prefix, mut body) = peek_prefix(reader, self.prefix_len).await?;
        let detected = self.sniffer.detect(&prefix);
        let kind = detected.unwrap_or(FileKind::OCTET_STREAM);

        let content_type = request
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| kind.mime.to_string());

        let key = match request.key {
            Some(key) => key,
            None => self.keys.generate(&self.store, kind.extension).await?,
        };

        let meta = self.store.put(&key, &mut body, &content_type).await?;
        tracing::info!(
            key = %key,
            content_type = %meta.content_type,
            size = meta.size,
            detected = detected.map(|k| k.extension),
            "stored upload"
        );

        Ok(UploadReceipt { key, detected, meta })
    }
}
