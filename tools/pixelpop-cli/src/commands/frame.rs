//! Overlay a decorative frame on a photo.

use std::path::PathBuf;

use pixelpop_common::clock::stamped_file_name;
use pixelpop_common::config::AppConfig;
use pixelpop_render_engine::frame::frame_photo;

use crate::UploadArgs;

pub async fn run(
    config: &AppConfig,
    photo: PathBuf,
    frame: PathBuf,
    output: Option<PathBuf>,
    upload: Option<UploadArgs>,
) -> anyhow::Result<()> {
    let output = super::output_dir(config, output);
    let photo_bytes = tokio::fs::read(&photo)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", photo.display()))?;
    let frame_bytes = tokio::fs::read(&frame)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", frame.display()))?;

    let framed = tokio::task::spawn_blocking(move || frame_photo(&photo_bytes, &frame_bytes))
        .await??;

    tokio::fs::create_dir_all(&output).await?;
    let file_name = stamped_file_name("framed-image", framed.extension());
    let path = output.join(&file_name);
    tokio::fs::write(&path, &framed.bytes).await?;
    println!("Framed image: {}", path.display());

    if let Some(upload) = upload {
        let actions = super::share_actions(config, &upload, &output)?;
        if !actions.can_upload() {
            anyhow::bail!("No upload service configured; pass --api-base");
        }
        if actions.share(&framed, &file_name).await.is_none() {
            println!("Upload failed; the framed image is still saved locally.");
        }
    }

    Ok(())
}
