//! Run a capture session from the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use pixelpop_booth_model::BoothSettings;
use pixelpop_capture_engine::backend::{select_camera, CameraChoice};
use pixelpop_capture_engine::{
    BoothSession, CameraConstraints, CameraManager, CaptureOutcome, RenderSettings, SessionEvent,
    SkipReason,
};
use pixelpop_common::clock::{caption_date, stamped_file_name};
use pixelpop_common::config::AppConfig;
use pixelpop_render_engine::CaptionFont;
use pixelpop_share::HtmlFilePrintSink;
use tokio::sync::broadcast::error::RecvError;

use crate::UploadArgs;

pub struct BoothOptions {
    pub layout: Option<String>,
    pub border: Option<String>,
    pub filter: Option<String>,
    pub countdown: Option<u32>,
    pub camera: String,
    pub output: Option<PathBuf>,
    pub print: bool,
    pub keep_snapshots: bool,
}

pub async fn run(config: &AppConfig, options: BoothOptions, upload: UploadArgs) -> anyhow::Result<()> {
    let booth = &config.booth;
    let settings = BoothSettings::parse(
        options.layout.as_deref().unwrap_or(&booth.layout),
        options.border.as_deref().unwrap_or(&booth.border),
        options.filter.as_deref().unwrap_or(&booth.filter),
        options.countdown.unwrap_or(booth.countdown_secs),
    )?;
    let output = super::output_dir(config, options.output);

    println!("PixelPop booth");
    println!("  Layout: {} ({} photos)", settings.layout, settings.required_photos());
    println!("  Border: {}", settings.border);
    println!("  Filter: {}", settings.filter);
    println!("  Countdown: {}s", settings.countdown_secs);
    println!("  Output: {}", output.display());
    println!();

    let camera = select_camera(&parse_camera(&options.camera));
    let manager = CameraManager::new(
        camera,
        CameraConstraints {
            ideal_width: booth.camera_width,
            ideal_height: booth.camera_height,
            ..CameraConstraints::default()
        },
    );
    let session = BoothSession::new(manager, settings, render_settings(config));
    let printer = tokio::spawn(print_events(session.subscribe()));

    let cancel = tokio::spawn({
        let session = session.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!();
                println!("Cancelled.");
                session.reset();
            }
        }
    });

    let result = capture_all(&session).await;
    cancel.abort();

    let strip = match result {
        Ok(true) => session.final_strip(),
        Ok(false) => None,
        Err(e) => {
            session.leave_capture_page().await;
            printer.abort();
            return Err(e);
        }
    };
    let snapshots = session.photos();
    session.leave_capture_page().await;
    printer.abort();

    let Some(strip) = strip else {
        return Ok(());
    };

    if options.keep_snapshots {
        tokio::fs::create_dir_all(&output).await?;
        for (index, photo) in snapshots.iter().enumerate() {
            let name = stamped_file_name(&format!("pixelpop-snapshot-{}", index + 1), photo.extension());
            tokio::fs::write(output.join(name), &photo.bytes).await?;
        }
    }

    let actions = super::share_actions(config, &upload, &output)?;
    let downloaded = actions.download(&strip.image).await?;
    if let Some(path) = &downloaded.path {
        println!("Saved layout: {}", path.display());
    }

    if options.print {
        let sink = HtmlFilePrintSink::new(&output);
        let printed = actions.print(&strip.image, &sink).await?;
        if let Some(path) = printed.path {
            println!("Print document: {}", path.display());
        }
    }

    Ok(())
}

/// Capture until the layout is complete. Returns `false` when cancelled.
async fn capture_all(session: &BoothSession) -> anyhow::Result<bool> {
    session.enter_capture_page().await?;
    let required = session.settings().required_photos();

    loop {
        match session.capture_photo().await? {
            CaptureOutcome::Captured {
                completed: true, ..
            } => return Ok(true),
            CaptureOutcome::Captured { index, .. } => {
                tracing::debug!(index, required, "Waiting for next shot");
            }
            CaptureOutcome::Skipped(SkipReason::SessionComplete) => return Ok(true),
            CaptureOutcome::Skipped(SkipReason::CameraNotLive) => {
                anyhow::bail!("Camera stopped delivering frames")
            }
            CaptureOutcome::Skipped(SkipReason::InProgress) => {}
            CaptureOutcome::Cancelled => return Ok(false),
        }
    }
}

async fn print_events(mut events: tokio::sync::broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::CameraLoading) => println!("Starting camera..."),
            Ok(SessionEvent::CameraLive) => println!("Camera ready."),
            Ok(SessionEvent::CameraError(message)) => eprintln!("{message}"),
            Ok(SessionEvent::CountdownTick(n)) => println!("  {n}..."),
            Ok(SessionEvent::PhotoCaptured { index }) => println!("Snap! Photo {}", index + 1),
            Ok(SessionEvent::Completed) => println!("Layout ready."),
            Ok(SessionEvent::CountdownHidden | SessionEvent::Reset) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Event printer lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn render_settings(config: &AppConfig) -> RenderSettings {
    let font = CaptionFont::discover(config.caption.font_path.as_deref()).map(Arc::new);
    if font.is_none() {
        tracing::warn!("No caption font found; layouts will have no caption");
    }
    RenderSettings {
        snapshot_quality: config.booth.snapshot_quality,
        caption_title: config.caption.title.clone(),
        caption_date: config.caption.show_date.then_some(caption_date as fn() -> String),
        font,
    }
}

fn parse_camera(value: &str) -> CameraChoice {
    match value {
        "auto" => CameraChoice::Auto,
        "synthetic" | "test" => CameraChoice::Synthetic,
        device if device.starts_with("/dev/") => CameraChoice::Device(device.to_string()),
        path => CameraChoice::Still(PathBuf::from(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camera() {
        assert_eq!(parse_camera("auto"), CameraChoice::Auto);
        assert_eq!(parse_camera("synthetic"), CameraChoice::Synthetic);
        assert_eq!(
            parse_camera("/dev/video2"),
            CameraChoice::Device("/dev/video2".to_string())
        );
        assert_eq!(
            parse_camera("me.jpg"),
            CameraChoice::Still(PathBuf::from("me.jpg"))
        );
    }
}
