//! Camera backed by a still image file.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use pixelpop_common::error::{PixelpopError, PixelpopResult};
use pixelpop_render_engine::encode::decode_bytes;

use crate::camera::{CameraConstraints, CameraSource, VideoStream};

/// Serves the same image as every frame.
#[derive(Debug, Clone)]
pub struct StillImageCamera {
    path: PathBuf,
}

impl StillImageCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CameraSource for StillImageCamera {
    fn name(&self) -> &str {
        "still-image"
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    async fn open(&self, _constraints: &CameraConstraints) -> PixelpopResult<Box<dyn VideoStream>> {
        if !self.is_available() {
            return Err(PixelpopError::FileNotFound {
                path: self.path.clone(),
            });
        }
        let bytes = tokio::fs::read(&self.path).await?;
        let frame = tokio::task::spawn_blocking(move || decode_bytes(&bytes))
            .await
            .map_err(|e| PixelpopError::camera(format!("Frame decode task failed: {e}")))??;
        tracing::debug!(
            path = %self.path.display(),
            width = frame.width(),
            height = frame.height(),
            "Loaded still frame"
        );
        Ok(Box::new(StillStream {
            frame: Some(frame),
        }))
    }
}

struct StillStream {
    frame: Option<RgbaImage>,
}

#[async_trait::async_trait]
impl VideoStream for StillStream {
    async fn grab_frame(&mut self) -> PixelpopResult<RgbaImage> {
        self.frame
            .clone()
            .ok_or_else(|| PixelpopError::capture("Still image stream stopped"))
    }

    fn dimensions(&self) -> (u32, u32) {
        self.frame.as_ref().map_or((0, 0), |f| f.dimensions())
    }

    fn stop(&mut self) {
        self.frame = None;
    }

    fn is_live(&self) -> bool {
        self.frame.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[tokio::test]
    async fn test_serves_file_as_frame() {
        let dir = std::env::temp_dir().join(format!("pixelpop-still-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.png");
        RgbaImage::from_pixel(48, 32, Rgba([9, 8, 7, 255]))
            .save(&path)
            .unwrap();

        let camera = StillImageCamera::new(&path);
        assert!(camera.is_available());
        let mut stream = camera.open(&CameraConstraints::default()).await.unwrap();
        assert_eq!(stream.dimensions(), (48, 32));
        assert_eq!(stream.grab_frame().await.unwrap().get_pixel(0, 0).0, [9, 8, 7, 255]);

        stream.stop();
        assert!(stream.grab_frame().await.is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_fails_to_open() {
        let camera = StillImageCamera::new("/nonexistent/booth.png");
        assert!(!camera.is_available());
        assert!(camera.open(&CameraConstraints::default()).await.is_err());
    }
}
