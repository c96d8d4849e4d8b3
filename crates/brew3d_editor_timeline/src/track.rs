// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions for the timeline.

use crate::ids::{ItemId, ObjectId, TrackId};
use crate::keyframe::TrackItem;
use serde::{Deserialize, Serialize};

/// Type of track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    /// Object movement keyframes
    Movement,
    /// Camera moves
    Camera,
    /// Audio clips
    Audio,
    /// Video and overlay clips
    Video,
    /// Special effects
    Effect,
}

impl TrackType {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Movement => "Movement",
            Self::Camera => "Camera",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::Effect => "Effect",
        }
    }

    /// Get the track color
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Movement => [100, 150, 255],
            Self::Camera => [255, 100, 150],
            Self::Audio => [200, 100, 255],
            Self::Video => [150, 255, 100],
            Self::Effect => [255, 200, 100],
        }
    }
}

/// A track on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track type
    #[serde(rename = "type")]
    pub track_type: TrackType,
    /// Label shown in the track header
    pub label: String,
    /// Items in insertion order
    #[serde(default)]
    pub items: Vec<TrackItem>,
}

impl Track {
    /// Create a new empty track
    pub fn new(id: impl Into<TrackId>, track_type: TrackType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            track_type,
            label: label.into(),
            items: Vec::new(),
        }
    }

    /// The fixed set of tracks every timeline starts with
    pub fn default_set() -> Vec<Track> {
        vec![
            Track::new("track-move", TrackType::Movement, "Character Movement"),
            Track::new("track-camera", TrackType::Camera, "Camera Movement"),
            Track::new("track-audio", TrackType::Audio, "Audio"),
            Track::new("track-video", TrackType::Video, "Video/Overlay"),
            Track::new("track-fx", TrackType::Effect, "Special Effects"),
        ]
    }

    /// Get item by ID
    pub fn item(&self, item_id: &ItemId) -> Option<&TrackItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    /// Get mutable item by ID
    pub fn item_mut(&mut self, item_id: &ItemId) -> Option<&mut TrackItem> {
        self.items.iter_mut().find(|i| &i.id == item_id)
    }

    /// Remove every item with the given ID, returning how many were removed
    pub fn remove_item(&mut self, item_id: &ItemId) -> usize {
        let before = self.items.len();
        self.items.retain(|i| &i.id != item_id);
        before - self.items.len()
    }

    /// Keyframes for one object, sorted by time
    pub fn keyframes_for(&self, object_id: &ObjectId) -> Vec<&TrackItem> {
        let mut keyframes: Vec<&TrackItem> = self
            .items
            .iter()
            .filter(|i| i.is_keyframe_for(object_id))
            .collect();
        keyframes.sort_by(|a, b| a.time.unwrap_or(0.0).total_cmp(&b.time.unwrap_or(0.0)));
        keyframes
    }

    /// Items overlapping a time range
    pub fn items_in_range(&self, start: f32, end: f32) -> Vec<&TrackItem> {
        self.items
            .iter()
            .filter(|i| i.span().is_some_and(|(s, e)| s <= end && e >= start))
            .collect()
    }

    /// Latest time covered by any item
    pub fn duration(&self) -> f32 {
        self.items
            .iter()
            .filter_map(TrackItem::span)
            .map(|(_, end)| end)
            .fold(0.0, f32::max)
    }

    /// Get item count
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Get the track color
    pub fn color(&self) -> [u8; 3] {
        self.track_type.color()
    }
}
