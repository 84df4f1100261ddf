//! Object storage behind the upload boundary.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};

use super::UploadError;

/// Sidecar suffix for object metadata
pub const META_SUFFIX: &str = ".meta.json";
/// Longest key whose object, `.part` and sidecar names all fit in 255 bytes
pub const MAX_KEY_LEN: usize = 255 - META_SUFFIX.len();

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UploadError>> + Send + 'a>>;

/// Async key/value object store
pub trait ObjectStore: Send + Sync {
    /// Is there already an object under `key`?
    fn exists<'a>(&'a self, key: &'a str) -> StoreFuture<'a, bool>;

    /// Stream `body` into a new object
    fn put<'a>(
        &'a self,
        key: &'a str,
        body: &'a mut (dyn AsyncRead + Unpin + Send),
        content_type: &'a str,
    ) -> StoreFuture<'a, ObjectMeta>;
}

/// What the store knows about an object once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub key: String,
    pub content_type: String,
    pub size: u64,
    /// blake3 digest of the body, lowercase hex
    pub blake3: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Keys become file names, so they are limited to a flat, portable alphabet.
pub fn validate_key(key: &str) -> Result<(), UploadError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('.')
        && !key.ends_with(META_SUFFIX)
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(UploadError::InvalidKey(key.to_string()))
    }
}

/// Objects as plain files under a root directory, each with a JSON sidecar
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}{META_SUFFIX}"))
    }

    /// Read back the sidecar of a stored object
    pub async fn meta(&self, key: &str) -> Result<ObjectMeta, UploadError> {
        validate_key(key)?;
        let raw = fs::read(self.meta_path(key)).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn write(
        &self,
        key: &str,
        body: &mut (dyn AsyncRead + Unpin + Send),
        content_type: &str,
    ) -> Result<ObjectMeta, UploadError> {
        validate_key(key)?;
        fs::create_dir_all(&self.root).await?;

        // Written under a dot-name first so readers never see a partial object
        let partial = self.root.join(format!(".{key}.part"));
        let copied = copy_with_hash(body, &partial).await;
        let (size, blake3) = match copied {
            Ok(done) => done,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        fs::rename(&partial, self.object_path(key)).await?;

        let meta = ObjectMeta {
            key: key.to_string(),
            content_type: content_type.to_string(),
            size,
            blake3,
            uploaded_at: Utc::now(),
        };
        if let Err(e) = self.write_meta(&meta).await {
            let _ = fs::remove_file(self.object_path(key)).await;
            return Err(e);
        }

        Ok(meta)
    }

    async fn write_meta(&self, meta: &ObjectMeta) -> Result<(), UploadError> {
        let raw = serde_json::to_vec_pretty(meta)?;
        fs::write(self.meta_path(&meta.key), raw).await?;
        Ok(())
    }
}

impl ObjectStore for FsStore {
    fn exists<'a>(&'a self, key: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            validate_key(key)?;
            Ok(fs::try_exists(self.object_path(key)).await?)
        })
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        body: &'a mut (dyn AsyncRead + Unpin + Send),
        content_type: &'a str,
    ) -> StoreFuture<'a, ObjectMeta> {
        Box::pin(self.write(key, body, content_type))
    }
}

/// Copy a stream to `dest` and compute its blake3 hash simultaneously
async fn copy_with_hash(
    body: &mut (dyn AsyncRead + Unpin + Send),
    dest: &Path,
) -> Result<(u64, String), UploadError> {
    let dest_file = fs::File::create(dest).await?;
    let mut writer = BufWriter::new(dest_file);
    let mut hasher = blake3::Hasher::new();

    let mut total_bytes = 0u64;
    let mut buffer = vec![0u8; 64 * 1024]; // 64KB buffer

    loop {
        let bytes_read = body.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
        writer.write_all(&buffer[..bytes_read]).await?;
        total_bytes += bytes_read as u64;
    }

    writer.flush().await?;
    writer.get_ref().sync_all().await?;

    Ok((total_bytes, hex::encode(hasher.finalize().as_bytes())))
}
