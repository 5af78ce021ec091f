pub mod coordinator;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::forms::UploadedFile;

/// Characters left unescaped in public object URLs (RFC 3986 unreserved set)
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to upload '{key}': {message}")]
    Upload { key: String, message: String },
}

/// Object storage gateway: puts a blob under a key and hands back where it can be fetched.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` and return its public URL.
    async fn upload(&self, key: &str, data: Bytes, content_type: &str)
        -> Result<String, StorageError>;
}

/// Objects are stored flat under the bucket root, keyed by the client's file name.
/// Directory components are dropped; a nameless part gets a random key.
pub fn object_key(file: &UploadedFile) -> String {
    file.file_name
        .as_deref()
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

pub fn public_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        utf8_percent_encode(key, KEY_ENCODE_SET)
    )
}
