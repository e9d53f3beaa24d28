//! Filter descriptors and their per-pixel transforms.
//!
//! Transforms operate on RGB only; alpha is never touched. Results are
//! computed in `f64`, rounded to the nearest integer with ties to even and
//! clamped to `[0, 255]`, matching how a browser canvas stores pixel data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseDescriptorError;

/// Photo filters offered by the booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    None,
    Sepia,
    /// Same matrix as sepia; kept as its own identifier for the UI.
    Vintage,
    Grayscale,
    Bright,
}

const SEPIA: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

const LUMA: [f64; 3] = [0.299, 0.587, 0.114];

const BRIGHT_GAIN: f64 = 1.3;

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::None,
        FilterKind::Sepia,
        FilterKind::Vintage,
        FilterKind::Grayscale,
        FilterKind::Bright,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Sepia => "sepia",
            FilterKind::Vintage => "vintage",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Bright => "bright",
        }
    }

    /// Whether this filter leaves pixels unchanged.
    pub fn is_identity(self) -> bool {
        self == FilterKind::None
    }

    /// Transform one RGB triple.
    pub fn apply_rgb(self, [r, g, b]: [u8; 3]) -> [u8; 3] {
        let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
        match self {
            FilterKind::None => [to_channel(r), to_channel(g), to_channel(b)],
            FilterKind::Sepia | FilterKind::Vintage => {
                let row = |m: [f64; 3]| to_channel(m[0] * r + m[1] * g + m[2] * b);
                [row(SEPIA[0]), row(SEPIA[1]), row(SEPIA[2])]
            }
            FilterKind::Grayscale => {
                let l = to_channel(LUMA[0] * r + LUMA[1] * g + LUMA[2] * b);
                [l, l, l]
            }
            FilterKind::Bright => [
                to_channel(r * BRIGHT_GAIN),
                to_channel(g * BRIGHT_GAIN),
                to_channel(b * BRIGHT_GAIN),
            ],
        }
    }

    /// Transform one RGBA pixel, preserving alpha.
    pub fn apply_rgba(self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        let [r, g, b] = self.apply_rgb([r, g, b]);
        [r, g, b, a]
    }

    /// Transform a packed RGBA buffer in place.
    pub fn apply_rgba_buffer(self, data: &mut [u8]) {
        if self.is_identity() {
            return;
        }
        for px in data.chunks_exact_mut(4) {
            let [r, g, b] = self.apply_rgb([px[0], px[1], px[2]]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    }
}

fn to_channel(v: f64) -> u8 {
    round_ties_even(v).clamp(0.0, 255.0) as u8
}

fn round_ties_even(v: f64) -> f64 {
    if (v - v.trunc()).abs() == 0.5 {
        2.0 * (v / 2.0).round()
    } else {
        v.round()
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = ParseDescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FilterKind::None),
            "sepia" => Ok(FilterKind::Sepia),
            "vintage" => Ok(FilterKind::Vintage),
            "grayscale" => Ok(FilterKind::Grayscale),
            "bright" => Ok(FilterKind::Bright),
            _ => Err(ParseDescriptorError {
                kind: "filter",
                value: s.to_string(),
                expected: "none, sepia, vintage, grayscale, bright",
            }),
        }
    }
}
