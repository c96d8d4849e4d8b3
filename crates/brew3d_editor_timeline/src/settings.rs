// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline settings.
//!
//! Defaults a new timeline starts from, stored as RON next to the project.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "timeline.ron";

/// Defaults for new timelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Settings format version
    pub version: u32,
    /// Initial timeline length in seconds
    pub duration_seconds: f32,
    /// Initial frame rate
    pub fps: f32,
    /// Initial zoom
    pub zoom: f32,
    /// Timeline panel height in pixels
    pub timeline_height: f32,
    /// Inspector panel width in pixels
    pub inspector_width: f32,
    /// Maximum undo steps kept
    pub history_depth: usize,
    /// Snap times to frames and markers
    pub snap_enabled: bool,
    /// Wrap playback at the end
    pub looping: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            duration_seconds: 60.0,
            fps: 24.0,
            zoom: 1.0,
            timeline_height: 200.0,
            inspector_width: 300.0,
            history_depth: crate::history::MAX_HISTORY,
            snap_enabled: true,
            looping: false,
        }
    }
}

impl TimelineSettings {
    /// Parse settings from a RON string
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Serialize settings to a pretty RON string
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        ron::ser::to_string_pretty(self, config)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        // Version check
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Timeline settings version {} is newer than supported version {}",
                    settings.version, SETTINGS_FORMAT_VERSION
                ),
            ));
        }

        tracing::info!("Loaded timeline settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = self.to_ron().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)?;
        tracing::info!("Saved timeline settings to {:?}", path);
        Ok(())
    }
}
