//! Border descriptors.
//!
//! A border is one or more stroked rectangles. Each stroke is described the
//! way a 2D canvas strokes a rectangle: a centre-line rectangle plus a line
//! width painted half inside and half outside of it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::ParseDescriptorError;

/// Border styles offered by the booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Classic,
    Modern,
    Vintage,
}

/// One stroked rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStroke {
    /// Centre-line rectangle.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Total line width, centred on the rectangle edge.
    pub line_width: f32,
    pub color: Rgba,
}

/// Pixel area covered by a stroke: an outer rectangle minus an inner one.
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeBand {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub thickness: i32,
}

const CLASSIC_COLOR: Rgba = Rgba::rgb(0x34, 0x3a, 0x40);
const MODERN_COLOR: Rgba = Rgba::rgb(0xff, 0x69, 0xb4);
const VINTAGE_COLOR: Rgba = Rgba::rgb(0x8b, 0x45, 0x13);

impl BorderStyle {
    pub const ALL: [BorderStyle; 4] = [
        BorderStyle::None,
        BorderStyle::Classic,
        BorderStyle::Modern,
        BorderStyle::Vintage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Classic => "classic",
            BorderStyle::Modern => "modern",
            BorderStyle::Vintage => "vintage",
        }
    }

    /// Stroke color, `None` for no border.
    pub fn color(self) -> Option<Rgba> {
        match self {
            BorderStyle::None => None,
            BorderStyle::Classic => Some(CLASSIC_COLOR),
            BorderStyle::Modern => Some(MODERN_COLOR),
            BorderStyle::Vintage => Some(VINTAGE_COLOR),
        }
    }

    /// Strokes for a canvas of the given size, outermost first.
    pub fn strokes(self, canvas_width: u32, canvas_height: u32) -> Vec<BorderStroke> {
        let (w, h) = (canvas_width as f32, canvas_height as f32);
        let inset = |offset: f32, line_width: f32, color: Rgba| BorderStroke {
            x: offset,
            y: offset,
            width: w - 2.0 * offset,
            height: h - 2.0 * offset,
            line_width,
            color,
        };
        match self {
            BorderStyle::None => Vec::new(),
            BorderStyle::Classic => vec![inset(10.0, 20.0, CLASSIC_COLOR)],
            BorderStyle::Modern => vec![inset(7.5, 15.0, MODERN_COLOR)],
            BorderStyle::Vintage => vec![
                inset(12.5, 25.0, VINTAGE_COLOR),
                inset(22.5, 5.0, VINTAGE_COLOR),
            ],
        }
    }
}

impl BorderStroke {
    /// Pixel band painted by this stroke.
    pub fn band(&self) -> StrokeBand {
        let half = self.line_width / 2.0;
        StrokeBand {
            left: (self.x - half).round() as i32,
            top: (self.y - half).round() as i32,
            right: (self.x + self.width + half).round() as i32,
            bottom: (self.y + self.height + half).round() as i32,
            thickness: self.line_width.round() as i32,
        }
    }
}

impl StrokeBand {
    /// Whether pixel `(px, py)` is painted by the band.
    pub fn covers(&self, px: i32, py: i32) -> bool {
        let in_outer = px >= self.left && px < self.right && py >= self.top && py < self.bottom;
        let in_inner = px >= self.left + self.thickness
            && px < self.right - self.thickness
            && py >= self.top + self.thickness
            && py < self.bottom - self.thickness;
        in_outer && !in_inner
    }
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BorderStyle {
    type Err = ParseDescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(BorderStyle::None),
            "classic" => Ok(BorderStyle::Classic),
            "modern" => Ok(BorderStyle::Modern),
            "vintage" => Ok(BorderStyle::Vintage),
            _ => Err(ParseDescriptorError {
                kind: "border",
                value: s.to_string(),
                expected: "none, classic, modern, vintage",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_strokes() {
        assert!(BorderStyle::None.strokes(640, 480).is_empty());
        assert!(BorderStyle::None.color().is_none());
    }

    #[test]
    fn test_classic_band_touches_canvas_edge() {
        let strokes = BorderStyle::Classic.strokes(640, 480);
        assert_eq!(strokes.len(), 1);
        let band = strokes[0].band();
        assert_eq!(
            band,
            StrokeBand {
                left: 0,
                top: 0,
                right: 640,
                bottom: 480,
                thickness: 20
            }
        );
        assert!(band.covers(0, 0));
        assert!(band.covers(19, 240));
        assert!(!band.covers(20, 240));
        assert!(band.covers(639, 479));
    }

    #[test]
    fn test_modern_geometry() {
        let stroke = BorderStyle::Modern.strokes(100, 100)[0];
        assert_eq!(stroke.color, Rgba::from_hex("#ff69b4").unwrap());
        assert_eq!((stroke.x, stroke.width, stroke.line_width), (7.5, 85.0, 15.0));
        assert_eq!(stroke.band().thickness, 15);
    }

    #[test]
    fn test_vintage_draws_two_concentric_rectangles() {
        let strokes = BorderStyle::Vintage.strokes(200, 150);
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].line_width, 25.0);
        assert_eq!(strokes[1].line_width, 5.0);
        assert_eq!((strokes[1].x, strokes[1].width), (22.5, 155.0));
        let inner = strokes[1].band();
        assert_eq!((inner.left, inner.thickness), (20, 5));
        assert!(strokes.iter().all(|s| s.color == VINTAGE_COLOR));
    }
}
