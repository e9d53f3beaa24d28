//! PixelPop CLI: run the photobooth and its supporting tools.
//!
//! Usage:
//!   pixelpop booth [OPTIONS]            Capture a layout from a camera
//!   pixelpop compose <PHOTOS>...        Assemble existing photos into a layout
//!   pixelpop frame <PHOTO> <FRAME>      Overlay a decorative frame on a photo
//!   pixelpop serve [OPTIONS]            Run the upload service
//!   pixelpop layouts                    List layouts, filters and borders

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use pixelpop_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "pixelpop",
    about = "Photobooth: countdown capture, filters, borders and printable strips",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON logs
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Upload options shared by commands that publish images.
#[derive(Args, Debug, Clone, Default)]
pub struct UploadArgs {
    /// Upload service base URL (overrides the config file)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Which link to share: view, download or raw
    #[arg(long)]
    pub share_mode: Option<String>,

    /// Do not upload or print a share link
    #[arg(long)]
    pub no_upload: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a capture session and download the finished layout
    Booth {
        /// Layout: single, twostrip, threestrip, fourstrip
        #[arg(short, long)]
        layout: Option<String>,

        /// Border: none, classic, modern, vintage
        #[arg(short, long)]
        border: Option<String>,

        /// Filter: none, sepia, vintage, grayscale, bright
        #[arg(short, long)]
        filter: Option<String>,

        /// Countdown before each shot, in seconds (0 = immediate)
        #[arg(short, long)]
        countdown: Option<u32>,

        /// Camera: auto, synthetic, a device node, or an image file
        #[arg(long, default_value = "auto")]
        camera: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a print document
        #[arg(long)]
        print: bool,

        /// Keep the individual snapshots next to the layout
        #[arg(long)]
        keep_snapshots: bool,

        #[command(flatten)]
        upload: UploadArgs,
    },

    /// Assemble photo files into a layout
    Compose {
        /// Photo files, in slot order
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// Layout: single, twostrip, threestrip, fourstrip
        #[arg(short, long)]
        layout: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Caption title
        #[arg(long)]
        title: Option<String>,

        /// Leave the date line out of the caption
        #[arg(long)]
        no_date: bool,

        /// Also export the mirrored download raster (and upload it)
        #[arg(long)]
        export: bool,

        #[command(flatten)]
        upload: UploadArgs,
    },

    /// Overlay a frame image on a photo
    Frame {
        /// Photo file
        photo: PathBuf,

        /// Frame image (PNG with transparency)
        frame: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Upload the framed image and print its share link
        #[arg(long)]
        upload: bool,

        /// Upload service base URL (overrides the config file)
        #[arg(long, requires = "upload")]
        api_base: Option<String>,

        /// Which link to share: view, download or raw
        #[arg(long, requires = "upload")]
        share_mode: Option<String>,
    },

    /// Run the upload service
    Serve {
        /// Port (the PORT environment variable still wins)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Directory for stored images
        #[arg(long)]
        images_dir: Option<PathBuf>,
    },

    /// List layouts, filters and borders
    Layouts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    pixelpop_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Booth {
            layout,
            border,
            filter,
            countdown,
            camera,
            output,
            print,
            keep_snapshots,
            upload,
        } => {
            commands::booth::run(
                &config,
                commands::booth::BoothOptions {
                    layout,
                    border,
                    filter,
                    countdown,
                    camera,
                    output,
                    print,
                    keep_snapshots,
                },
                upload,
            )
            .await
        }
        Commands::Compose {
            photos,
            layout,
            output,
            title,
            no_date,
            export,
            upload,
        } => {
            commands::compose::run(
                &config,
                commands::compose::ComposeOptions {
                    photos,
                    layout,
                    output,
                    title,
                    show_date: !no_date,
                    export,
                },
                upload,
            )
            .await
        }
        Commands::Frame {
            photo,
            frame,
            output,
            upload,
            api_base,
            share_mode,
        } => {
            let upload = upload.then_some(UploadArgs {
                api_base,
                share_mode,
                no_upload: false,
            });
            commands::frame::run(&config, photo, frame, output, upload).await
        }
        Commands::Serve {
            port,
            bind,
            images_dir,
        } => commands::serve::run(config, port, bind, images_dir).await,
        Commands::Layouts => commands::layouts::run(),
    }
}
