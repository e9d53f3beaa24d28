//! Layout caption: a title and a date line centred near the bottom edge.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use pixelpop_booth_model::Rgba as Color;
use pixelpop_common::error::{PixelpopError, PixelpopResult};

pub const DEFAULT_TITLE: &str = "PixelPop Studio";

const TITLE_COLOR: Color = Color::rgb(0xff, 0x69, 0xb4);
const TITLE_SIZE_PX: f32 = 24.0;
const TITLE_BASELINE_FROM_BOTTOM: i32 = 30;

const DATE_COLOR: Color = Color::rgb(0x66, 0x66, 0x66);
const DATE_SIZE_PX: f32 = 16.0;
const DATE_BASELINE_FROM_BOTTOM: i32 = 10;

/// Fonts tried, in order, when none is configured.
const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Text drawn under the photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionText {
    pub title: String,
    /// Date line; omitted when `None`.
    pub date: Option<String>,
}

impl CaptionText {
    /// Title plus today's date.
    pub fn dated(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: Some(pixelpop_common::clock::caption_date()),
        }
    }
}

impl Default for CaptionText {
    fn default() -> Self {
        Self::dated(DEFAULT_TITLE)
    }
}

/// A loaded caption font.
pub struct CaptionFont {
    font: FontVec,
    path: PathBuf,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont").field("path", &self.path).finish()
    }
}

impl CaptionFont {
    /// Load a TrueType/OpenType font file.
    pub fn load(path: &Path) -> PixelpopResult<Self> {
        if !path.exists() {
            return Err(PixelpopError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|e| PixelpopError::render(format!("Invalid font {}: {e}", path.display())))?;
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    /// Use the configured font if it loads, otherwise the first system
    /// fallback that does.
    pub fn discover(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            match Self::load(path) {
                Ok(font) => return Some(font),
                Err(e) => tracing::warn!(error = %e, "Configured caption font unusable"),
            }
        }
        FALLBACK_FONTS
            .iter()
            .map(Path::new)
            .filter(|p| p.exists())
            .find_map(|p| Self::load(p).ok())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scale for a CSS-style font size (em height in pixels).
    fn scale_for(&self, size_px: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(size_px * self.font.height_unscaled() / units_per_em)
    }

    /// Draw `text` horizontally centred with its baseline at `baseline_y`.
    fn draw_centred(&self, canvas: &mut RgbaImage, text: &str, size_px: f32, color: Color, baseline_y: i32) {
        let scale = self.scale_for(size_px);
        let (text_width, _) = text_size(scale, &self.font, text);
        let ascent = self.font.as_scaled(scale).ascent().round() as i32;
        let x = (canvas.width() as i32 - text_width as i32) / 2;
        draw_text_mut(
            canvas,
            Rgba(color.to_array()),
            x,
            baseline_y - ascent,
            scale,
            &self.font,
            text,
        );
    }
}

/// Draw the caption onto a finished layout canvas.
pub fn draw_caption(canvas: &mut RgbaImage, caption: &CaptionText, font: &CaptionFont) {
    let height = canvas.height() as i32;
    font.draw_centred(
        canvas,
        &caption.title,
        TITLE_SIZE_PX,
        TITLE_COLOR,
        height - TITLE_BASELINE_FROM_BOTTOM,
    );
    if let Some(date) = &caption.date {
        font.draw_centred(
            canvas,
            date,
            DATE_SIZE_PX,
            DATE_COLOR,
            height - DATE_BASELINE_FROM_BOTTOM,
        );
    }
}
