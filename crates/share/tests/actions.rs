//! Download/print actions against a failing and a succeeding collaborator.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use pixelpop_common::error::{PixelpopError, PixelpopResult};
use pixelpop_share::{
    HtmlFilePrintSink, ShareActions, ShareLinkSlot, UploadCollaborator, UploadReceipt,
    UploadRequest,
};

struct FailingUpload {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl UploadCollaborator for FailingUpload {
    async fn upload(&self, _request: UploadRequest) -> PixelpopResult<UploadReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PixelpopError::upload(
            "Upload rejected (500 Internal Server Error): Image upload failed",
        ))
    }
}

#[derive(Default)]
struct RecordingUpload {
    requests: std::sync::Mutex<Vec<UploadRequest>>,
}

#[async_trait::async_trait]
impl UploadCollaborator for RecordingUpload {
    async fn upload(&self, request: UploadRequest) -> PixelpopResult<UploadReceipt> {
        let url = format!("http://booth.local/images/{}", request.file_name);
        self.requests.lock().unwrap().push(request);
        Ok(UploadReceipt {
            share_url: url,
            id: None,
        })
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pixelpop-share-it-{name}-{}", std::process::id()))
}

fn layout() -> RgbaImage {
    RgbaImage::from_pixel(40, 30, Rgba([250, 105, 180, 255]))
}

#[tokio::test]
async fn upload_failure_still_downloads_without_share_code() {
    let dir = scratch_dir("fail");
    let uploader = Arc::new(FailingUpload {
        calls: AtomicUsize::new(0),
    });
    let slot = Arc::new(ShareLinkSlot::new());
    let actions = ShareActions::new(slot.clone(), &dir).with_uploader(uploader.clone());

    let outcome = actions.download(&layout()).await.unwrap();

    let path = outcome.path.expect("download path");
    assert!(path.exists());
    assert_eq!(outcome.share_url, None);
    assert_eq!(uploader.calls.load(Ordering::SeqCst), 1);
    assert_eq!(slot.last(), None);
    assert_eq!(slot.render_count(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn successful_upload_renders_share_code() {
    let dir = scratch_dir("ok");
    let uploader = Arc::new(RecordingUpload::default());
    let slot = Arc::new(ShareLinkSlot::new());
    let actions = ShareActions::new(slot.clone(), &dir).with_uploader(uploader.clone());

    let outcome = actions.download(&layout()).await.unwrap();

    let requests = uploader.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.file_name.starts_with("pixelpop-photo-"));
    assert!(request.file_name.ends_with(".jpg"));
    assert!(request.image_data.starts_with("data:image/jpeg;base64,"));

    let expected = format!("http://booth.local/images/{}", request.file_name);
    assert_eq!(outcome.share_url.as_deref(), Some(expected.as_str()));
    assert_eq!(slot.last(), Some(expected));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn print_writes_document_and_survives_upload_failure() {
    let dir = scratch_dir("print");
    let uploader = Arc::new(FailingUpload {
        calls: AtomicUsize::new(0),
    });
    let slot = Arc::new(ShareLinkSlot::new());
    let actions = ShareActions::new(slot.clone(), &dir).with_uploader(uploader.clone());
    let sink = HtmlFilePrintSink::new(&dir);

    let outcome = actions.print(&layout(), &sink).await.unwrap();

    let html = std::fs::read_to_string(outcome.path.unwrap()).unwrap();
    assert!(html.contains("<title>PixelPop Studio Photos</title>"));
    assert!(html.contains("window.print()"));
    assert!(html.contains("data:image/jpeg;base64,"));
    assert_eq!(outcome.share_url, None);
    assert_eq!(uploader.calls.load(Ordering::SeqCst), 1);
    assert_eq!(slot.render_count(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}
