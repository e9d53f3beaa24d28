pub mod booth;
pub mod compose;
pub mod frame;
pub mod layouts;
pub mod serve;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pixelpop_common::config::AppConfig;
use pixelpop_common::error::PixelpopResult;
use pixelpop_render_engine::ExportOptions;
use pixelpop_share::{HttpUploadClient, ShareActions, ShareCodeRenderer};

use crate::UploadArgs;

/// Prints share links to the terminal.
pub struct ConsoleShareCode;

impl ShareCodeRenderer for ConsoleShareCode {
    fn render(&self, url: &str) -> PixelpopResult<()> {
        println!("Share link: {url}");
        Ok(())
    }
}

/// Download/print/share actions configured from the config file and flags.
pub fn share_actions(
    config: &AppConfig,
    upload: &UploadArgs,
    dir: &Path,
) -> anyhow::Result<ShareActions> {
    let mut actions = ShareActions::new(Arc::new(ConsoleShareCode), dir).with_export_options(
        ExportOptions {
            scale_factor: config.export.scale_factor,
            quality: config.export.quality,
        },
    );
    if upload.no_upload {
        return Ok(actions);
    }

    let mut upload_config = config.upload.clone();
    if let Some(api_base) = &upload.api_base {
        upload_config.api_base = Some(api_base.clone());
    }
    if let Some(mode) = &upload.share_mode {
        upload_config.share_mode = mode.clone();
    }
    if let Some(client) = HttpUploadClient::from_config(&upload_config)
        .map_err(|e| anyhow::anyhow!("Invalid upload settings: {e}"))?
    {
        actions = actions.with_uploader(Arc::new(client));
    }
    Ok(actions)
}

/// Output directory from the flag, or the configured default.
pub fn output_dir(config: &AppConfig, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| config.output_dir.clone())
}
