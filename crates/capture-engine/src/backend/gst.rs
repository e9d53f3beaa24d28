//! GStreamer webcam backend (V4L2 source into an appsink).

use std::sync::OnceLock;

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_app as gst_app;
use image::RgbaImage;

use pixelpop_common::error::{PixelpopError, PixelpopResult};

use crate::camera::{CameraConstraints, CameraSource, VideoStream};

const FRAME_TIMEOUT_SECS: u64 = 5;

/// Webcam capture through GStreamer.
#[derive(Debug, Clone, Default)]
pub struct GstCamera {
    /// Explicit device node; detected when `None`.
    device: Option<String>,
}

impl GstCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(device: impl Into<String>) -> Self {
        Self {
            device: Some(device.into()),
        }
    }
}

#[async_trait::async_trait]
impl CameraSource for GstCamera {
    fn name(&self) -> &str {
        "gstreamer-v4l2"
    }

    fn is_available(&self) -> bool {
        init_gstreamer().is_ok()
            && (self.device.is_some() || detect_default_webcam_device().is_some())
    }

    async fn open(&self, constraints: &CameraConstraints) -> PixelpopResult<Box<dyn VideoStream>> {
        init_gstreamer()?;
        let device = self
            .device
            .clone()
            .or_else(detect_default_webcam_device)
            .ok_or_else(|| PixelpopError::camera("No webcam device found"))?;
        let launch = webcam_launch(&device, constraints);
        tracing::debug!(%launch, "Building webcam pipeline");

        let stream = tokio::task::spawn_blocking(move || GstStream::start(&launch))
            .await
            .map_err(|e| PixelpopError::camera(format!("Pipeline task failed: {e}")))??;
        Ok(Box::new(stream))
    }
}

struct GstStream {
    pipeline: gst::Pipeline,
    sink: gst_app::AppSink,
    width: u32,
    height: u32,
    live: bool,
}

impl GstStream {
    fn start(launch: &str) -> PixelpopResult<Self> {
        let pipeline = gst::parse::launch(launch)
            .map_err(|e| PixelpopError::camera(format!("Failed to build pipeline: {e}")))?
            .dynamic_cast::<gst::Pipeline>()
            .map_err(|_| PixelpopError::camera("Launch string did not produce a pipeline"))?;
        let sink = pipeline
            .by_name("sink")
            .and_then(|e| e.dynamic_cast::<gst_app::AppSink>().ok())
            .ok_or_else(|| PixelpopError::camera("Pipeline has no appsink"))?;

        pipeline.set_state(gst::State::Playing).map_err(|e| {
            PixelpopError::permission_denied(format!("Failed to start webcam pipeline: {e:?}"))
        })?;

        // The first sample fixes the negotiated resolution.
        let first = match pull_frame(&sink) {
            Ok(frame) => frame,
            Err(e) => {
                let _ = pipeline.set_state(gst::State::Null);
                return Err(e);
            }
        };
        Ok(Self {
            pipeline,
            sink,
            width: first.width(),
            height: first.height(),
            live: true,
        })
    }
}

#[async_trait::async_trait]
impl VideoStream for GstStream {
    async fn grab_frame(&mut self) -> PixelpopResult<RgbaImage> {
        if !self.live {
            return Err(PixelpopError::capture("Webcam stream stopped"));
        }
        let sink = self.sink.clone();
        tokio::task::spawn_blocking(move || pull_frame(&sink))
            .await
            .map_err(|e| PixelpopError::capture(format!("Frame task failed: {e}")))?
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn stop(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            tracing::warn!(error = ?e, "Failed to stop webcam pipeline");
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for GstStream {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pull_frame(sink: &gst_app::AppSink) -> PixelpopResult<RgbaImage> {
    let sample = sink
        .try_pull_sample(gst::ClockTime::from_seconds(FRAME_TIMEOUT_SECS))
        .ok_or_else(|| PixelpopError::capture("Timed out waiting for a webcam frame"))?;
    let structure = sample
        .caps()
        .and_then(|caps| caps.structure(0))
        .ok_or_else(|| PixelpopError::capture("Frame has no caps"))?;
    let width = structure
        .get::<i32>("width")
        .map_err(|e| PixelpopError::capture(format!("Frame width missing: {e}")))?;
    let height = structure
        .get::<i32>("height")
        .map_err(|e| PixelpopError::capture(format!("Frame height missing: {e}")))?;
    let buffer = sample
        .buffer()
        .ok_or_else(|| PixelpopError::capture("Frame has no buffer"))?;
    let map = buffer
        .map_readable()
        .map_err(|e| PixelpopError::capture(format!("Frame buffer unreadable: {e}")))?;

    let (width, height) = (width as u32, height as u32);
    let row = width as usize * 4;
    let data = map.as_slice();
    if height == 0 || data.len() < row * height as usize {
        return Err(PixelpopError::capture("Frame buffer shorter than its caps"));
    }
    // Rows may be padded past width * 4.
    let stride = data.len() / height as usize;
    let mut pixels = Vec::with_capacity(row * height as usize);
    for y in 0..height as usize {
        pixels.extend_from_slice(&data[y * stride..y * stride + row]);
    }
    RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| PixelpopError::capture("Frame size mismatch"))
}

fn webcam_launch(device: &str, constraints: &CameraConstraints) -> String {
    let device = device.replace('"', "\\\"");
    format!(
        "v4l2src device=\"{device}\" ! videoconvert ! videoscale ! video/x-raw,format=RGBA,width={},height={} ! appsink name=sink max-buffers=1 drop=true sync=false",
        constraints.ideal_width, constraints.ideal_height
    )
}

fn init_gstreamer() -> PixelpopResult<()> {
    static GST_INIT: OnceLock<Result<(), String>> = OnceLock::new();
    let init_res = GST_INIT.get_or_init(|| gst::init().map_err(|e| e.to_string()));
    match init_res {
        Ok(()) => Ok(()),
        Err(e) => Err(PixelpopError::camera(format!(
            "Failed to initialize GStreamer: {e}"
        ))),
    }
}

/// First `/dev/videoN` node whose sysfs name looks like a webcam, else the
/// first node that exists.
fn detect_default_webcam_device() -> Option<String> {
    let mut candidates: Vec<(String, u32)> = (0..16u32)
        .filter_map(|idx| {
            let dev_path = format!("/dev/video{idx}");
            std::path::Path::new(&dev_path)
                .exists()
                .then(|| (dev_path, webcam_device_priority(idx)))
        })
        .collect();
    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    let (device, priority) = candidates.into_iter().next()?;
    tracing::info!(%device, priority, "Selected webcam device");
    Some(device)
}

fn webcam_device_priority(idx: u32) -> u32 {
    let name = std::fs::read_to_string(format!("/sys/class/video4linux/video{idx}/name"))
        .unwrap_or_default()
        .to_lowercase();
    score_device_name(&name)
}

fn score_device_name(name: &str) -> u32 {
    const WEBCAM: &[&str] = &["webcam", "camera", "cam", "facetime", "uvc", "v4l2loopback"];
    const NOT_WEBCAM: &[&str] = &["tuner", "tv", "dvb", "hdmi", "encoder", "decoder"];
    if NOT_WEBCAM.iter().any(|kw| name.contains(kw)) {
        0
    } else if WEBCAM.iter().any(|kw| name.contains(kw)) {
        80
    } else {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_requests_rgba_appsink() {
        let launch = webcam_launch("/dev/video0", &CameraConstraints::default());
        assert!(launch.starts_with("v4l2src device=\"/dev/video0\""));
        assert!(launch.contains("format=RGBA,width=1280,height=720"));
        assert!(launch.ends_with("appsink name=sink max-buffers=1 drop=true sync=false"));
    }

    #[test]
    fn test_device_scoring() {
        assert_eq!(score_device_name("integrated camera: integrated c"), 80);
        assert_eq!(score_device_name("hdmi capture"), 0);
        assert_eq!(score_device_name("unknown"), 10);
    }
}
