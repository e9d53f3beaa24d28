//! Download, print and share actions for a finished layout.
//!
//! Both local actions export the mirrored raster first, finish their local
//! side effect, and only then try to publish the raster. A failed upload is
//! logged and leaves the local result intact.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use pixelpop_booth_model::EncodedPhoto;
use pixelpop_common::clock::stamped_file_name;
use pixelpop_common::error::{PixelpopError, PixelpopResult};
use pixelpop_render_engine::{export_raster, print_document, ExportOptions};

use crate::client::{UploadCollaborator, UploadRequest};
use crate::print::PrintSink;
use crate::share_code::ShareCodeRenderer;

pub const DOWNLOAD_FILE_PREFIX: &str = "pixelpop-photos";
pub const UPLOAD_FILE_PREFIX: &str = "pixelpop-photo";

/// Result of a download or print action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Where the local artifact was written, if anywhere.
    pub path: Option<PathBuf>,
    /// Share link, when the upload succeeded.
    pub share_url: Option<String>,
}

/// Export/share actions wired to their collaborators.
#[derive(Clone)]
pub struct ShareActions {
    uploader: Option<Arc<dyn UploadCollaborator>>,
    share_code: Arc<dyn ShareCodeRenderer>,
    download_dir: PathBuf,
    export: ExportOptions,
}

impl ShareActions {
    pub fn new(share_code: Arc<dyn ShareCodeRenderer>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploader: None,
            share_code,
            download_dir: download_dir.into(),
            export: ExportOptions::default(),
        }
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn UploadCollaborator>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_export_options(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn can_upload(&self) -> bool {
        self.uploader.is_some()
    }

    /// Write `pixelpop-photos-<ms>.jpg`, then upload and share it.
    pub async fn download(&self, layout: &RgbaImage) -> PixelpopResult<ActionOutcome> {
        let raster = self.export(layout).await?;

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| {
                PixelpopError::storage(format!(
                    "Cannot create download directory {}: {e}",
                    self.download_dir.display()
                ))
            })?;
        let path = self
            .download_dir
            .join(stamped_file_name(DOWNLOAD_FILE_PREFIX, raster.extension()));
        tokio::fs::write(&path, &raster.bytes).await?;
        tracing::info!(path = %path.display(), bytes = raster.len(), "Downloaded layout");

        let share_url = self.publish(&raster).await;
        Ok(ActionOutcome {
            path: Some(path),
            share_url,
        })
    }

    /// Hand a self-printing document to `sink`, then upload and share the
    /// raster.
    pub async fn print(
        &self,
        layout: &RgbaImage,
        sink: &dyn PrintSink,
    ) -> PixelpopResult<ActionOutcome> {
        let raster = self.export(layout).await?;
        let path = sink.print(&print_document(&raster))?;

        let share_url = self.publish(&raster).await;
        Ok(ActionOutcome { path, share_url })
    }

    /// Upload an already encoded image under `file_name` and render its
    /// share code. Returns the link, or `None` when uploads are disabled or
    /// the upload failed.
    pub async fn share(&self, photo: &EncodedPhoto, file_name: &str) -> Option<String> {
        let uploader = self.uploader.as_ref()?;
        let receipt = match uploader.upload(UploadRequest::new(photo, file_name)).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(%file_name, error = %e, "Upload failed; skipping share code");
                return None;
            }
        };

        if let Err(e) = self.share_code.render(&receipt.share_url) {
            tracing::warn!(url = %receipt.share_url, error = %e, "Failed to render share code");
        }
        Some(receipt.share_url)
    }

    async fn publish(&self, raster: &EncodedPhoto) -> Option<String> {
        if self.uploader.is_none() {
            tracing::debug!("No upload service configured");
            return None;
        }
        let file_name = stamped_file_name(UPLOAD_FILE_PREFIX, raster.extension());
        self.share(raster, &file_name).await
    }

    async fn export(&self, layout: &RgbaImage) -> PixelpopResult<EncodedPhoto> {
        let layout = layout.clone();
        let options = self.export;
        tokio::task::spawn_blocking(move || export_raster(&layout, &options))
            .await
            .map_err(|e| PixelpopError::render(format!("Export task failed: {e}")))?
    }
}

impl std::fmt::Debug for ShareActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareActions")
            .field("can_upload", &self.can_upload())
            .field("download_dir", &self.download_dir)
            .field("export", &self.export)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share_code::ShareLinkSlot;
    use image::Rgba;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pixelpop-actions-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn test_download_without_uploader() {
        let dir = scratch_dir("plain");
        let slot = Arc::new(ShareLinkSlot::new());
        let actions = ShareActions::new(slot.clone(), &dir);
        let layout = RgbaImage::from_pixel(30, 20, Rgba([10, 200, 30, 255]));

        let outcome = actions.download(&layout).await.unwrap();
        let path = outcome.path.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pixelpop-photos-") && name.ends_with(".jpg"));

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (60, 40));
        assert_eq!(outcome.share_url, None);
        assert_eq!(slot.render_count(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
