//! Per-session booth settings.

use serde::{Deserialize, Serialize};

use crate::{BorderStyle, FilterKind, LayoutKind, ParseDescriptorError};

/// Default countdown before each shot.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

/// The choices a guest makes before shooting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothSettings {
    pub layout: LayoutKind,
    pub border: BorderStyle,
    pub filter: FilterKind,
    pub countdown_secs: u32,
}

impl Default for BoothSettings {
    fn default() -> Self {
        Self {
            layout: LayoutKind::default(),
            border: BorderStyle::default(),
            filter: FilterKind::default(),
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
        }
    }
}

impl BoothSettings {
    /// Build settings from textual identifiers.
    pub fn parse(
        layout: &str,
        border: &str,
        filter: &str,
        countdown_secs: u32,
    ) -> Result<Self, ParseDescriptorError> {
        Ok(Self {
            layout: layout.parse()?,
            border: border.parse()?,
            filter: filter.parse()?,
            countdown_secs,
        })
    }

    /// Photos needed to complete the chosen layout.
    pub fn required_photos(&self) -> usize {
        self.layout.required_photos()
    }
}
