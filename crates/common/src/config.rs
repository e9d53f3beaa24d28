//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where downloads and print documents are written.
    pub output_dir: PathBuf,

    /// Default booth settings.
    #[serde(default)]
    pub booth: BoothDefaults,

    /// Caption drawn under the final layout.
    #[serde(default)]
    pub caption: CaptionConfig,

    /// Export raster settings.
    #[serde(default)]
    pub export: ExportDefaults,

    /// Upload service settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upload client settings.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default booth parameters.
///
/// Layout, border and filter are kept as identifiers here and parsed by the
/// booth model, so a bad value in the file surfaces as a parse error at the
/// point of use instead of discarding the whole config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoothDefaults {
    /// Layout identifier (`single`, `twostrip`, `threestrip`, `fourstrip`).
    pub layout: String,

    /// Border identifier (`none`, `classic`, `modern`, `vintage`).
    pub border: String,

    /// Filter identifier (`none`, `sepia`, `vintage`, `grayscale`, `bright`).
    pub filter: String,

    /// Countdown before each shot, in whole seconds. Zero captures immediately.
    pub countdown_secs: u32,

    /// JPEG quality for individual snapshots (1-100).
    pub snapshot_quality: u8,

    /// Preferred camera width.
    pub camera_width: u32,

    /// Preferred camera height.
    pub camera_height: u32,
}

/// Caption settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Title text.
    pub title: String,

    /// TrueType/OpenType font used for the caption. When unset, a list of
    /// common system font locations is searched.
    pub font_path: Option<PathBuf>,

    /// Whether to draw the date line under the title.
    pub show_date: bool,
}

/// Export raster settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDefaults {
    /// Integer upscale factor applied before mirroring.
    pub scale_factor: u32,

    /// JPEG quality of the exported raster (1-100).
    pub quality: u8,
}

/// Upload service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_address: String,

    /// Port to listen on. The `PORT` environment variable takes precedence.
    pub port: u16,

    /// Directory uploaded images are written to and served from.
    pub images_dir: PathBuf,

    /// Maximum accepted request body size.
    pub body_limit_bytes: usize,
}

/// Upload client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Base URL of the upload service. Uploads are skipped when unset.
    pub api_base: Option<String>,

    /// Which URL to share: `view`, `download` or `raw`.
    pub share_mode: String,

    /// Issue a HEAD request against the share URL before rendering it.
    pub verify_public_url: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "pixelpop=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            booth: BoothDefaults::default(),
            caption: CaptionConfig::default(),
            export: ExportDefaults::default(),
            server: ServerConfig::default(),
            upload: UploadConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BoothDefaults {
    fn default() -> Self {
        Self {
            layout: "single".to_string(),
            border: "none".to_string(),
            filter: "none".to_string(),
            countdown_secs: 3,
            snapshot_quality: 90,
            camera_width: 1280,
            camera_height: 720,
        }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            title: "PixelPop Studio".to_string(),
            font_path: None,
            show_date: true,
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            scale_factor: 2,
            quality: 100,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            images_dir: PathBuf::from("public").join("images"),
            body_limit_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            share_mode: "view".to_string(),
            verify_public_url: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ServerConfig {
    /// Port to listen on, honouring the `PORT` environment variable.
    pub fn effective_port(&self) -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(self.port)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("pixelpop").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_booth_behaviour() {
        let config = AppConfig::default();
        assert_eq!(config.booth.countdown_secs, 3);
        assert_eq!(config.booth.snapshot_quality, 90);
        assert_eq!(config.export.scale_factor, 2);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.body_limit_bytes, 50 * 1024 * 1024);
        assert_eq!(config.caption.title, "PixelPop Studio");
    }

    #[test]
    fn test_partial_config_fills_sections_with_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "output_dir": "/tmp/booth" }"#).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/booth"));
        assert_eq!(config.upload.share_mode, "view");
        assert!(config.upload.api_base.is_none());
    }
}
