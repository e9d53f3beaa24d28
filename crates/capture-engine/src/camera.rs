//! Camera lifecycle management.
//!
//! A [`CameraSource`] opens a [`VideoStream`]; the [`CameraManager`] owns at
//! most one live stream and guarantees it is stopped on every exit path.

use std::sync::Arc;

use image::RgbaImage;

use pixelpop_common::error::{PixelpopError, PixelpopResult};

/// Message shown to the guest when the camera cannot be opened.
pub const CAMERA_DENIED_MESSAGE: &str =
    "Camera access denied. Please allow camera permission and try again.";

/// Which way the camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    #[default]
    User,
    Environment,
}

/// Requested stream properties. Width and height are preferences; the
/// source may deliver a different native resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: FacingMode,
    pub audio: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            facing: FacingMode::User,
            audio: false,
        }
    }
}

/// A running video stream.
#[async_trait::async_trait]
pub trait VideoStream: Send {
    /// Grab the current frame at native resolution.
    async fn grab_frame(&mut self) -> PixelpopResult<RgbaImage>;

    /// Native frame size.
    fn dimensions(&self) -> (u32, u32);

    /// Stop every track of the stream. Idempotent.
    fn stop(&mut self);

    /// Whether the stream is still delivering frames.
    fn is_live(&self) -> bool;
}

/// Something that can open a camera stream.
#[async_trait::async_trait]
pub trait CameraSource: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Check if this source can be used on this system.
    fn is_available(&self) -> bool;

    /// Acquire a stream matching `constraints` as closely as possible.
    async fn open(&self, constraints: &CameraConstraints) -> PixelpopResult<Box<dyn VideoStream>>;
}

/// Camera state as seen by the booth UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CameraStatus {
    #[default]
    Idle,
    /// Acquisition in progress (loading indicator shown).
    Loading,
    Live,
    /// Acquisition failed; holds the user-facing message.
    Failed(String),
}

/// Owns the camera source and the current stream.
pub struct CameraManager {
    source: Arc<dyn CameraSource>,
    constraints: CameraConstraints,
    stream: Option<Box<dyn VideoStream>>,
    status: CameraStatus,
}

impl CameraManager {
    pub fn new(source: Arc<dyn CameraSource>, constraints: CameraConstraints) -> Self {
        Self {
            source,
            constraints,
            stream: None,
            status: CameraStatus::Idle,
        }
    }

    pub fn status(&self) -> &CameraStatus {
        &self.status
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn constraints(&self) -> &CameraConstraints {
        &self.constraints
    }

    /// Whether a stream is held and still live.
    pub fn is_live(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_live())
    }

    /// Native size of the live stream.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.stream.as_ref().map(|s| s.dimensions())
    }

    /// Acquire the camera. No retry is attempted on failure.
    pub async fn start(&mut self) -> PixelpopResult<()> {
        if self.is_live() {
            return Ok(());
        }
        self.stop();
        self.status = CameraStatus::Loading;
        tracing::info!(
            source = self.source.name(),
            width = self.constraints.ideal_width,
            height = self.constraints.ideal_height,
            "Requesting camera"
        );

        match self.source.open(&self.constraints).await {
            Ok(stream) => {
                let (width, height) = stream.dimensions();
                tracing::info!(source = self.source.name(), width, height, "Camera live");
                self.stream = Some(stream);
                self.status = CameraStatus::Live;
                Ok(())
            }
            Err(e) => {
                tracing::error!(source = self.source.name(), error = %e, "Camera access error");
                self.status = CameraStatus::Failed(CAMERA_DENIED_MESSAGE.to_string());
                Err(match e {
                    PixelpopError::PermissionDenied { .. } => {
                        PixelpopError::permission_denied(CAMERA_DENIED_MESSAGE)
                    }
                    _ => PixelpopError::camera(CAMERA_DENIED_MESSAGE),
                })
            }
        }
    }

    /// Stop all tracks and release the stream.
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::info!(source = self.source.name(), "Camera stopped");
        }
        self.status = CameraStatus::Idle;
    }

    /// Grab a frame from the live stream.
    pub async fn grab_frame(&mut self) -> PixelpopResult<RgbaImage> {
        match self.stream.as_mut() {
            Some(stream) if stream.is_live() => stream.grab_frame().await,
            _ => Err(PixelpopError::capture("Camera is not live")),
        }
    }
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for CameraManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraManager")
            .field("source", &self.source.name())
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SyntheticCamera;

    #[tokio::test]
    async fn test_start_goes_live() {
        let source = Arc::new(SyntheticCamera::new());
        let mut manager = CameraManager::new(source, CameraConstraints::default());
        assert_eq!(manager.status(), &CameraStatus::Idle);

        manager.start().await.unwrap();
        assert_eq!(manager.status(), &CameraStatus::Live);
        assert_eq!(manager.dimensions(), Some((1280, 720)));

        let frame = manager.grab_frame().await.unwrap();
        assert_eq!(frame.dimensions(), (1280, 720));
    }

    #[tokio::test]
    async fn test_denied_camera_reports_user_message() {
        let source = Arc::new(SyntheticCamera::denied());
        let mut manager = CameraManager::new(source, CameraConstraints::default());

        let err = manager.start().await.unwrap_err();
        assert!(matches!(err, PixelpopError::PermissionDenied { .. }));
        assert!(err.to_string().contains(CAMERA_DENIED_MESSAGE));
        assert_eq!(
            manager.status(),
            &CameraStatus::Failed(CAMERA_DENIED_MESSAGE.to_string())
        );
        assert!(!manager.is_live());
        assert!(manager.grab_frame().await.is_err());
    }

    #[tokio::test]
    async fn test_stop_releases_tracks() {
        let source = Arc::new(SyntheticCamera::new());
        let tracks = source.active_streams();
        let mut manager = CameraManager::new(source, CameraConstraints::default());

        manager.start().await.unwrap();
        assert_eq!(tracks.load(std::sync::atomic::Ordering::SeqCst), 1);
        manager.stop();
        assert_eq!(tracks.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(manager.status(), &CameraStatus::Idle);
        // Stopping twice is harmless.
        manager.stop();
    }

    #[tokio::test]
    async fn test_drop_stops_stream() {
        let source = Arc::new(SyntheticCamera::new());
        let tracks = source.active_streams();
        {
            let mut manager = CameraManager::new(source, CameraConstraints::default());
            manager.start().await.unwrap();
        }
        assert_eq!(tracks.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
