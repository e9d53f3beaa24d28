//! Camera backends.

use std::path::PathBuf;
use std::sync::Arc;

use crate::camera::CameraSource;

#[cfg(feature = "gstreamer")]
pub mod gst;
pub mod still;
pub mod synthetic;

#[cfg(feature = "gstreamer")]
pub use gst::GstCamera;
pub use still::StillImageCamera;
pub use synthetic::SyntheticCamera;

/// Which camera to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraChoice {
    /// Best available real camera, falling back to the synthetic pattern.
    Auto,
    Synthetic,
    Still(PathBuf),
    /// Explicit device node.
    Device(String),
}

/// Resolve a camera choice to a source.
pub fn select_camera(choice: &CameraChoice) -> Arc<dyn CameraSource> {
    match choice {
        CameraChoice::Synthetic => Arc::new(SyntheticCamera::new()),
        CameraChoice::Still(path) => Arc::new(StillImageCamera::new(path.clone())),
        #[cfg(feature = "gstreamer")]
        CameraChoice::Device(device) => Arc::new(GstCamera::with_device(device.clone())),
        #[cfg(not(feature = "gstreamer"))]
        CameraChoice::Device(device) => {
            tracing::warn!(%device, "Built without gstreamer support; using synthetic camera");
            Arc::new(SyntheticCamera::new())
        }
        CameraChoice::Auto => auto_camera(),
    }
}

#[cfg(feature = "gstreamer")]
fn auto_camera() -> Arc<dyn CameraSource> {
    let camera = GstCamera::new();
    if camera.is_available() {
        Arc::new(camera)
    } else {
        tracing::warn!("No webcam available; using synthetic camera");
        Arc::new(SyntheticCamera::new())
    }
}

#[cfg(not(feature = "gstreamer"))]
fn auto_camera() -> Arc<dyn CameraSource> {
    Arc::new(SyntheticCamera::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_synthetic_and_still() {
        assert_eq!(select_camera(&CameraChoice::Synthetic).name(), "synthetic");
        let still = select_camera(&CameraChoice::Still(PathBuf::from("/tmp/x.png")));
        assert_eq!(still.name(), "still-image");
    }
}
