//! Assemble existing photo files into a layout.

use std::path::{Path, PathBuf};

use pixelpop_booth_model::{EncodedPhoto, LayoutKind};
use pixelpop_common::clock::stamped_file_name;
use pixelpop_common::config::AppConfig;
use pixelpop_render_engine::encode::encode_png;
use pixelpop_render_engine::{compose_layout, CaptionFont, CaptionText};

use crate::UploadArgs;

pub struct ComposeOptions {
    pub photos: Vec<PathBuf>,
    pub layout: Option<String>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub show_date: bool,
    pub export: bool,
}

pub async fn run(
    config: &AppConfig,
    options: ComposeOptions,
    upload: UploadArgs,
) -> anyhow::Result<()> {
    let layout: LayoutKind = options
        .layout
        .as_deref()
        .unwrap_or(&config.booth.layout)
        .parse()?;
    let output = super::output_dir(config, options.output);

    let mut photos = Vec::with_capacity(options.photos.len());
    for path in &options.photos {
        photos.push(read_photo(path).await?);
    }
    if photos.len() > layout.required_photos() {
        println!(
            "Layout {layout} uses {} photo(s); ignoring the rest",
            layout.required_photos()
        );
    }

    let title = options
        .title
        .unwrap_or_else(|| config.caption.title.clone());
    let caption = if options.show_date && config.caption.show_date {
        CaptionText::dated(title)
    } else {
        CaptionText { title, date: None }
    };
    let font = CaptionFont::discover(config.caption.font_path.as_deref());

    let strip = compose_layout(layout, &photos, &caption, font.as_ref()).await?;
    if !strip.caption_drawn {
        println!("No caption font found; layout saved without caption.");
    }

    tokio::fs::create_dir_all(&output).await?;
    let encoded = encode_png(&strip.image)?;
    let path = output.join(stamped_file_name("pixelpop-layout", encoded.extension()));
    tokio::fs::write(&path, &encoded.bytes).await?;
    let (width, height) = strip.dimensions();
    println!("Layout {layout} ({width}x{height}): {}", path.display());

    if options.export {
        let actions = super::share_actions(config, &upload, &output)?;
        let downloaded = actions.download(&strip.image).await?;
        if let Some(path) = downloaded.path {
            println!("Export: {}", path.display());
        }
    }

    Ok(())
}

async fn read_photo(path: &Path) -> anyhow::Result<EncodedPhoto> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    Ok(EncodedPhoto::new(bytes, mime_for(path)))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("noext")), "image/jpeg");
    }
}
