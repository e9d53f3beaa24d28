//! Layout descriptors.
//!
//! Every layout is a vertical strip of equally sized photo slots on a white
//! canvas. Slot geometry is derived from the slot index alone, so placement
//! does not depend on the order photos become available.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseDescriptorError;

/// The fixed set of layouts a session can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Single,
    TwoStrip,
    ThreeStrip,
    FourStrip,
}

/// Geometry of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSpec {
    pub kind: LayoutKind,
    /// Photos needed before the layout is assembled.
    pub photo_count: usize,
    /// Output canvas width in pixels.
    pub width: u32,
    /// Output canvas height in pixels.
    pub height: u32,
    /// Height of each photo slot.
    pub slot_height: u32,
    /// Margin around and between slots.
    pub margin: u32,
}

/// A slot rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

const STRIP_WIDTH: u32 = 300;
const SLOT_HEIGHT: u32 = 160;
const MARGIN: u32 = 20;

impl LayoutKind {
    /// All layouts, smallest first.
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Single,
        LayoutKind::TwoStrip,
        LayoutKind::ThreeStrip,
        LayoutKind::FourStrip,
    ];

    /// Identifier used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Single => "single",
            LayoutKind::TwoStrip => "twostrip",
            LayoutKind::ThreeStrip => "threestrip",
            LayoutKind::FourStrip => "fourstrip",
        }
    }

    /// Number of photos this layout needs.
    pub fn required_photos(self) -> usize {
        match self {
            LayoutKind::Single => 1,
            LayoutKind::TwoStrip => 2,
            LayoutKind::ThreeStrip => 3,
            LayoutKind::FourStrip => 4,
        }
    }

    /// Full geometry for this layout.
    pub fn spec(self) -> LayoutSpec {
        let height = match self {
            LayoutKind::Single => 200,
            LayoutKind::TwoStrip => 380,
            LayoutKind::ThreeStrip => 560,
            LayoutKind::FourStrip => 740,
        };
        LayoutSpec {
            kind: self,
            photo_count: self.required_photos(),
            width: STRIP_WIDTH,
            height,
            slot_height: SLOT_HEIGHT,
            margin: MARGIN,
        }
    }
}

impl LayoutSpec {
    /// Rectangle of slot `index`, or `None` past the last slot.
    pub fn slot(&self, index: usize) -> Option<SlotRect> {
        if index >= self.photo_count {
            return None;
        }
        let step = self.slot_height + self.margin;
        Some(SlotRect {
            x: self.margin,
            y: self.margin + index as u32 * step,
            width: self.width - 2 * self.margin,
            height: self.slot_height,
        })
    }

    /// All slot rectangles in index order.
    pub fn slots(&self) -> Vec<SlotRect> {
        (0..self.photo_count).filter_map(|i| self.slot(i)).collect()
    }
}

impl SlotRect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether `(px, py)` lies inside this slot.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = ParseDescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(LayoutKind::Single),
            "twostrip" => Ok(LayoutKind::TwoStrip),
            "threestrip" => Ok(LayoutKind::ThreeStrip),
            "fourstrip" => Ok(LayoutKind::FourStrip),
            _ => Err(ParseDescriptorError {
                kind: "layout",
                value: s.to_string(),
                expected: "single, twostrip, threestrip, fourstrip",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_table() {
        let expected = [
            (LayoutKind::Single, 1, 300, 200),
            (LayoutKind::TwoStrip, 2, 300, 380),
            (LayoutKind::ThreeStrip, 3, 300, 560),
            (LayoutKind::FourStrip, 4, 300, 740),
        ];
        for (kind, count, w, h) in expected {
            let spec = kind.spec();
            assert_eq!(spec.photo_count, count, "{kind}");
            assert_eq!(spec.slots().len(), count, "{kind}");
            assert_eq!((spec.width, spec.height), (w, h), "{kind}");
            assert_eq!(spec.slot_height, 160);
            assert_eq!(spec.margin, 20);
        }
    }

    #[test]
    fn test_slot_positions() {
        let spec = LayoutKind::FourStrip.spec();
        let ys: Vec<u32> = spec.slots().iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![20, 200, 380, 560]);
        assert_eq!(spec.slot(0).unwrap().width, 260);
        assert!(spec.slot(4).is_none());
    }

    #[test]
    fn test_last_slot_leaves_bottom_margin() {
        for kind in LayoutKind::ALL {
            let spec = kind.spec();
            let last = spec.slot(spec.photo_count - 1).unwrap();
            assert_eq!(last.bottom() + spec.margin, spec.height, "{kind}");
        }
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!("twostrip".parse::<LayoutKind>(), Ok(LayoutKind::TwoStrip));
        assert_eq!(" FourStrip ".parse::<LayoutKind>(), Ok(LayoutKind::FourStrip));
        let err = "collage".parse::<LayoutKind>().unwrap_err();
        assert!(err.to_string().contains("collage"));
    }

    #[test]
    fn test_layout_serde_identifiers() {
        let json = serde_json::to_string(&LayoutKind::ThreeStrip).unwrap();
        assert_eq!(json, "\"threestrip\"");
        let kind: LayoutKind = serde_json::from_str("\"single\"").unwrap();
        assert_eq!(kind, LayoutKind::Single);
    }
}
