use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("upload signing is not configured")]
    NotConfigured,

    #[error("signer rejected request: {0}")]
    Rejected(String),
}

/// Issues short-lived URLs that let a browser PUT one object directly into
/// the object store.
#[async_trait]
pub trait UploadSigner: Send + Sync {
    async fn sign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, UploadError>;
}

/// Object key for an uploaded file: `{prefix}/{unix_millis}-{filename}`.
///
/// Path separators in the filename are flattened so the key stays under
/// `prefix`.
pub fn object_key(prefix: &str, filename: &str, unix_millis: i64) -> String {
    let filename: String = filename
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();

    format!("{}/{unix_millis}-{filename}", prefix.trim_end_matches('/'))
}

/// Mints URLs against a fixed upload endpoint, carrying the content type and
/// expiry as query parameters. Suits a gateway or proxy that enforces them;
/// object stores needing request signatures plug in their own signer.
#[derive(Debug, Clone)]
pub struct StaticUploadSigner {
    upload_base: String,
}

impl StaticUploadSigner {
    pub fn new(upload_base: &str) -> Self {
        Self {
            upload_base: upload_base.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl UploadSigner for StaticUploadSigner {
    async fn sign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, UploadError> {
        if self.upload_base.is_empty() {
            return Err(UploadError::NotConfigured);
        }

        let key: Vec<String> = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        Ok(format!(
            "{base}/{key}?content-type={content_type}&expires={expires}",
            base = self.upload_base,
            key = key.join("/"),
            content_type = urlencoding::encode(content_type),
            expires = expires_in.as_secs()
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_object_key() {
        assert_eq!(
            object_key("uploads", "team photo.png", 1700000000000),
            "uploads/1700000000000-team photo.png"
        );
        assert_eq!(object_key("uploads/", "../etc/passwd", 1), "uploads/1-..-etc-passwd");
    }

    #[tokio::test]
    async fn test_static_signer_encodes_key() {
        let signer = StaticUploadSigner::new("https://uploads.example.com/");
        let url = signer
            .sign_put("uploads/1-team photo.png", "image/png", Duration::from_secs(300))
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://uploads.example.com/uploads/1-team%20photo.png?content-type=image%2Fpng&expires=300"
        );
    }

    #[tokio::test]
    async fn test_static_signer_requires_base() {
        let signer = StaticUploadSigner::new("");
        assert!(matches!(
            signer.sign_put("k", "image/png", Duration::from_secs(1)).await,
            Err(UploadError::NotConfigured)
        ));
    }
}
