//! Run the upload service.

use std::path::PathBuf;

use pixelpop_common::config::AppConfig;

pub async fn run(
    mut config: AppConfig,
    port: Option<u16>,
    bind: Option<String>,
    images_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let server = &mut config.server;
    if let Some(port) = port {
        server.port = port;
    }
    if let Some(bind) = bind {
        server.bind_address = bind;
    }
    if let Some(dir) = images_dir {
        server.images_dir = dir;
    }

    println!(
        "Serving uploads on http://{}:{} (images in {})",
        server.bind_address,
        server.effective_port(),
        server.images_dir.display()
    );
    println!("Press Ctrl+C to stop...");

    pixelpop_upload_server::serve(server).await?;
    Ok(())
}
