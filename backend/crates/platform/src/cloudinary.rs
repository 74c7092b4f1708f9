//! Cloudinary Client
//!
//! Signed upload and destroy calls against the Cloudinary REST API.
//!
//! ## Signing
//! Every call carries `api_key`, `timestamp` and `signature`, where the
//! signature is the SHA-1 hex digest of the sorted `key=value` pairs joined
//! with `&`, followed directly by the API secret. `file`, `api_key`,
//! `resource_type` and `cloud_name` are not part of the signed string.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Error)]
pub enum CloudinaryError {
    #[error("Cloudinary request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Cloudinary rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Cloudinary destroy returned '{0}'")]
    DestroyFailed(String),
}

/// Cloudinary account configuration
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// API root, overridable for tests
    pub api_base: String,
}

impl CloudinaryConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryUpload {
    pub public_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub secure_url: String,
}

impl CloudinaryUpload {
    /// URL to hand back to clients, preferring HTTPS
    pub fn delivery_url(&self) -> &str {
        if self.secure_url.is_empty() {
            &self.url
        } else {
            &self.secure_url
        }
    }
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { http, config }
    }

    /// Upload a file with `resource_type=auto`
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<CloudinaryUpload, CloudinaryError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(&[("timestamp", &timestamp)], &self.config.api_secret);

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let url = format!(
            "{}/{}/auto/upload",
            self.config.api_base, self.config.cloud_name
        );
        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::Rejected { status, body });
        }

        let upload: CloudinaryUpload = response.json().await?;
        tracing::debug!(public_id = %upload.public_id, "Uploaded asset to Cloudinary");
        Ok(upload)
    }

    /// Delete an uploaded image by public id
    pub async fn destroy(&self, public_id: &str) -> Result<(), CloudinaryError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.config.api_secret,
        );

        let params = [
            ("public_id", public_id),
            ("api_key", self.config.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
        ];

        let url = format!(
            "{}/{}/image/destroy",
            self.config.api_base, self.config.cloud_name
        );
        let response = self.http.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::Rejected { status, body });
        }

        let outcome: DestroyResponse = response.json().await?;
        if outcome.result != "ok" {
            return Err(CloudinaryError::DestroyFailed(outcome.result));
        }

        tracing::debug!(public_id = %public_id, "Destroyed Cloudinary asset");
        Ok(())
    }
}

/// Compute the request signature for the given parameters
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive the public id from a delivery URL
///
/// `https://res.cloudinary.com/demo/image/upload/v1/abc123.png` -> `abc123`
pub fn public_id_from_url(url: &str) -> Option<String> {
    let last = url.trim_end_matches('/').rsplit('/').next()?;
    let id = last.split('.').next()?;
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[test]
    fn test_sign_sorts_parameters() {
        let a = sign(&[("timestamp", "1315060510"), ("public_id", "sample")], "abcd");
        let b = sign(&[("public_id", "sample"), ("timestamp", "1315060510")], "abcd");
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);

        let mut hasher = Sha1::new();
        hasher.update(b"public_id=sample&timestamp=1315060510abcd");
        assert_eq!(a, hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_public_id_from_url() {
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/v1/abc123.png"),
            Some("abc123".to_string())
        );
        assert_eq!(
            public_id_from_url("https://host/x/archive.tar.gz"),
            Some("archive".to_string())
        );
        assert_eq!(public_id_from_url("https://host/x/.png"), None);
        assert_eq!(public_id_from_url(""), None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = CloudinaryConfig::new("demo", "key", "super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    type Seen = Arc<Mutex<Vec<String>>>;

    async fn spawn_stub(destroy_result: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::default();

        let app = Router::new()
            .route(
                "/demo/auto/upload",
                post(|State(seen): State<Seen>, body: String| async move {
                    seen.lock().await.push(body);
                    axum::Json(serde_json::json!({
                        "public_id": "abc123",
                        "url": "http://res.cloudinary.com/demo/image/upload/v1/abc123.png",
                        "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/abc123.png",
                    }))
                }),
            )
            .route(
                "/demo/image/destroy",
                post(move |State(seen): State<Seen>, body: String| async move {
                    seen.lock().await.push(body);
                    axum::Json(serde_json::json!({ "result": destroy_result }))
                }),
            )
            .route(
                "/broken/auto/upload",
                post(|| async { (StatusCode::UNAUTHORIZED, "Invalid Signature") }),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }

    #[tokio::test]
    async fn test_upload_posts_signed_multipart() {
        let (base, seen) = spawn_stub("ok").await;
        let client =
            CloudinaryClient::new(CloudinaryConfig::new("demo", "key-1", "secret").with_api_base(base));

        let upload = client.upload("avatar.png", b"png-bytes".to_vec()).await.unwrap();
        assert_eq!(upload.public_id, "abc123");
        assert!(upload.delivery_url().starts_with("https://"));

        let bodies = seen.lock().await;
        let body = &bodies[0];
        assert!(body.contains("name=\"file\"; filename=\"avatar.png\""));
        assert!(body.contains("png-bytes"));
        assert!(body.contains("name=\"api_key\""));
        assert!(body.contains("name=\"signature\""));
    }

    #[tokio::test]
    async fn test_upload_rejected() {
        let (base, _) = spawn_stub("ok").await;
        let client =
            CloudinaryClient::new(CloudinaryConfig::new("broken", "key", "secret").with_api_base(base));

        let err = client.upload("a.png", vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, CloudinaryError::Rejected { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_destroy() {
        let (base, seen) = spawn_stub("ok").await;
        let client =
            CloudinaryClient::new(CloudinaryConfig::new("demo", "key-1", "secret").with_api_base(base));

        client.destroy("abc123").await.unwrap();

        let bodies = seen.lock().await;
        assert!(bodies[0].contains("public_id=abc123"));
        assert!(bodies[0].contains("api_key=key-1"));
        assert!(bodies[0].contains("signature="));
    }

    #[tokio::test]
    async fn test_destroy_not_found() {
        let (base, _) = spawn_stub("not found").await;
        let client =
            CloudinaryClient::new(CloudinaryConfig::new("demo", "key", "secret").with_api_base(base));

        let err = client.destroy("missing").await.unwrap_err();
        assert!(matches!(err, CloudinaryError::DestroyFailed(ref r) if r == "not found"));
    }
}
