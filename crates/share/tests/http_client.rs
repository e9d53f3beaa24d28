//! `HttpUploadClient` against a local axum stand-in for the upload service.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pixelpop_booth_model::EncodedPhoto;
use pixelpop_share::{HttpUploadClient, ShareMode, UploadCollaborator, UploadRequest};
use serde_json::{json, Value};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn request() -> UploadRequest {
    UploadRequest::new(&EncodedPhoto::jpeg(vec![0xff, 0xd8, 0xff]), "pixelpop-photo-1.jpg")
}

#[tokio::test]
async fn server_error_is_an_upload_error() {
    let app = Router::new().route(
        "/api/upload",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Image upload failed" })),
            )
        }),
    );
    let addr = spawn(app).await;
    let client = HttpUploadClient::new(format!("http://{addr}")).unwrap();

    let err = client.upload(request()).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("500"), "{message}");
    assert!(message.contains("Image upload failed"), "{message}");
}

#[tokio::test]
async fn relative_url_is_made_absolute() {
    let app = Router::new().route(
        "/api/upload",
        post(|Json(body): Json<Value>| async move {
            let name = body["fileName"].as_str().unwrap_or_default().to_string();
            Json(json!({ "success": true, "url": format!("/images/{name}") }))
        }),
    );
    let addr = spawn(app).await;
    let client = HttpUploadClient::new(format!("http://{addr}/")).unwrap();

    let receipt = client.upload(request()).await.unwrap();
    assert_eq!(
        receipt.share_url,
        format!("http://{addr}/images/pixelpop-photo-1.jpg")
    );
}

#[tokio::test]
async fn share_mode_selects_viewer_link() {
    let app = Router::new().route(
        "/api/upload",
        post(|| async {
            Json(json!({
                "success": true,
                "id": "abc",
                "url": "/images/a.jpg",
                "viewerUrl": "/view/abc",
                "downloadUrl": "/download/abc"
            }))
        }),
    );
    let addr = spawn(app).await;
    let base = format!("http://{addr}");

    let viewer = HttpUploadClient::new(&base).unwrap().with_mode(ShareMode::View);
    let receipt = viewer.upload(request()).await.unwrap();
    assert_eq!(receipt.share_url, format!("{base}/view/abc"));
    assert_eq!(receipt.id.as_deref(), Some("abc"));

    let download = HttpUploadClient::new(&base)
        .unwrap()
        .with_mode(ShareMode::Download);
    let receipt = download.upload(request()).await.unwrap();
    assert_eq!(receipt.share_url, format!("{base}/download/abc"));
}

#[tokio::test]
async fn unreachable_service_is_an_upload_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpUploadClient::new(format!("http://{addr}")).unwrap();
    assert!(client.upload(request()).await.is_err());
}
