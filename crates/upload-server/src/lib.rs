//! PixelPop Upload Server
//!
//! Receives base64 images from the booth and serves them back:
//!
//! ```text
//!  POST /api/upload { imageData, fileName } ──► <images_dir>/<fileName>
//!  GET  /images/<fileName>                  ◄── ServeDir(<images_dir>)
//! ```

pub mod error;
pub mod handlers;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use pixelpop_common::config::ServerConfig;
use pixelpop_common::error::{PixelpopError, PixelpopResult};

pub use error::ApiError;
pub use store::ImageStore;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<ImageStore>,
}

impl AppState {
    pub fn new(store: ImageStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the router. `body_limit` caps the upload request size.
pub fn router(state: AppState, body_limit: usize) -> Router {
    let images = ServeDir::new(state.store.root());
    Router::new()
        .route("/api/upload", post(handlers::upload))
        .nest_service("/images", images)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(config: &ServerConfig) -> PixelpopResult<()> {
    let store = ImageStore::open(&config.images_dir)?;
    let app = router(AppState::new(store), config.body_limit_bytes);

    let addr = format!("{}:{}", config.bind_address, config.effective_port());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PixelpopError::config(format!("Cannot bind {addr}: {e}")))?;
    let local: SocketAddr = listener.local_addr()?;
    tracing::info!(
        %local,
        images_dir = %config.images_dir.display(),
        "Upload server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Upload server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
