//! Upload collaborator: sends an encoded image to the upload service and
//! returns a shareable link.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pixelpop_booth_model::EncodedPhoto;
use pixelpop_common::config::UploadConfig;
use pixelpop_common::error::{PixelpopError, PixelpopResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which link from the upload response is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShareMode {
    /// Viewer page, when the service offers one.
    #[default]
    View,
    /// Forced-download route, when the service offers one.
    Download,
    /// The stored file itself.
    Raw,
}

impl ShareMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ShareMode::View => "view",
            ShareMode::Download => "download",
            ShareMode::Raw => "raw",
        }
    }
}

impl fmt::Display for ShareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShareMode {
    type Err = PixelpopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(ShareMode::View),
            "download" => Ok(ShareMode::Download),
            "raw" => Ok(ShareMode::Raw),
            other => Err(PixelpopError::config(format!(
                "Unknown share mode '{other}' (expected view, download or raw)"
            ))),
        }
    }
}

/// JSON body of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// `data:<mime>;base64,...`
    pub image_data: String,
    pub file_name: String,
}

impl UploadRequest {
    pub fn new(photo: &EncodedPhoto, file_name: impl Into<String>) -> Self {
        Self {
            image_data: photo.to_data_url(),
            file_name: file_name.into(),
        }
    }
}

/// Upload service response. Every field is optional so that partial or
/// error bodies still parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub viewer_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadResponse {
    /// Link to share for `mode`, falling back to the raw URL.
    pub fn share_url(&self, mode: ShareMode) -> Option<&str> {
        let preferred = match mode {
            ShareMode::View => self.viewer_url.as_deref(),
            ShareMode::Download => self.download_url.as_deref(),
            ShareMode::Raw => None,
        };
        preferred.or(self.url.as_deref()).filter(|u| !u.is_empty())
    }
}

/// A successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Absolute link to hand to the share-code renderer.
    pub share_url: String,
    pub id: Option<String>,
}

/// Anything that can publish an image and return a link.
#[async_trait::async_trait]
pub trait UploadCollaborator: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> PixelpopResult<UploadReceipt>;
}

/// Resolve a possibly relative URL against the service base.
pub fn absolutize(api_base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let base = api_base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

/// HTTP client for the upload service.
#[derive(Debug, Clone)]
pub struct HttpUploadClient {
    client: reqwest::Client,
    api_base: String,
    mode: ShareMode,
    verify_public_url: bool,
}

impl HttpUploadClient {
    pub fn new(api_base: impl Into<String>) -> PixelpopResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PixelpopError::upload(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            mode: ShareMode::default(),
            verify_public_url: false,
        })
    }

    /// Client for the configured service, or `None` when uploads are off.
    pub fn from_config(config: &UploadConfig) -> PixelpopResult<Option<Self>> {
        let Some(api_base) = config.api_base.as_deref().filter(|b| !b.trim().is_empty()) else {
            return Ok(None);
        };
        let client = Self::new(api_base)?
            .with_mode(config.share_mode.parse()?)
            .with_verification(config.verify_public_url);
        Ok(Some(client))
    }

    pub fn with_mode(mut self, mode: ShareMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_public_url = verify;
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn upload_endpoint(&self) -> String {
        format!("{}/api/upload", self.api_base)
    }

    /// HEAD the link; only logged, never fatal.
    async fn verify(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::warn!(%url, status = %resp.status(), "Share link not reachable yet");
                false
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "Share link check failed");
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl UploadCollaborator for HttpUploadClient {
    async fn upload(&self, request: UploadRequest) -> PixelpopResult<UploadReceipt> {
        let endpoint = self.upload_endpoint();
        tracing::debug!(%endpoint, file_name = %request.file_name, "Uploading image");

        let response = self
            .client
            .post(&endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| PixelpopError::upload(format!("Request to {endpoint} failed: {e}")))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: UploadResponse = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            let reason = parsed.error.unwrap_or_else(|| status.to_string());
            return Err(PixelpopError::upload(format!(
                "Upload rejected ({status}): {reason}"
            )));
        }

        let share_url = parsed
            .share_url(self.mode)
            .map(|u| absolutize(&self.api_base, u))
            .ok_or_else(|| PixelpopError::upload("Upload response has no URL"))?;

        if self.verify_public_url {
            self.verify(&share_url).await;
        }

        tracing::info!(%share_url, mode = %self.mode, "Image uploaded");
        Ok(UploadReceipt {
            share_url,
            id: parsed.id,
        })
    }
}
