// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track items: movement keyframes and media clips.

use crate::easing::Easing;
use crate::ids::{ItemId, ObjectId};
use crate::track::TrackType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 3D vector (position, euler rotation or scale)
pub type Vec3 = [f32; 3];

/// An item on a track.
///
/// Movement keyframes use `object_id` + `time`; clips on the other tracks use
/// `start_time`/`end_time`. Fields the timeline does not interpret (clip
/// asset name, volume, loop flag, ...) are kept in `extra` so saved data
/// round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackItem {
    /// Unique item ID
    pub id: ItemId,
    /// Kind of item, matching the owning track's type
    #[serde(rename = "type")]
    pub kind: TrackType,
    /// Scene object this keyframe animates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    /// Keyframe time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f32>,
    /// Clip start in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f32>,
    /// Clip end in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f32>,
    /// Keyframed position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    /// Keyframed rotation (euler, radians)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    /// Keyframed scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    /// Easing towards the next keyframe
    #[serde(default)]
    pub easing: Easing,
    /// Label shown on the timeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether the item is enabled
    #[serde(default = "default_active")]
    pub active: bool,
    /// Uninterpreted fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_active() -> bool {
    true
}

impl TrackItem {
    /// Create a movement keyframe for an object at a time
    pub fn keyframe(object_id: ObjectId, time: f32) -> Self {
        Self {
            id: ItemId::generate("kf"),
            kind: TrackType::Movement,
            object_id: Some(object_id),
            time: Some(time),
            start_time: None,
            end_time: None,
            position: None,
            rotation: None,
            scale: None,
            easing: Easing::Linear,
            label: None,
            active: true,
            extra: Map::new(),
        }
    }

    /// Create a clip spanning `[start, end]` seconds
    pub fn clip(id: ItemId, kind: TrackType, start: f32, end: f32) -> Self {
        Self {
            id,
            kind,
            object_id: None,
            time: None,
            start_time: Some(start),
            end_time: Some(end),
            position: None,
            rotation: None,
            scale: None,
            easing: Easing::Linear,
            label: None,
            active: true,
            extra: Map::new(),
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set an uninterpreted field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether this is a keyframe for the given object
    pub fn is_keyframe_for(&self, object_id: &ObjectId) -> bool {
        self.time.is_some() && self.object_id.as_ref() == Some(object_id)
    }

    /// Time span covered by this item. Keyframes are zero-length.
    pub fn span(&self) -> Option<(f32, f32)> {
        match (self.start_time, self.end_time, self.time) {
            (Some(start), Some(end), _) => Some((start, end)),
            (Some(start), None, _) => Some((start, start)),
            (None, _, Some(time)) => Some((time, time)),
            _ => None,
        }
    }

    /// Shallow-merge a patch: present fields override, absent fields stay.
    pub fn merge(&mut self, patch: &ItemPatch) {
        if let Some(object_id) = &patch.object_id {
            self.object_id = Some(object_id.clone());
        }
        if let Some(time) = patch.time {
            self.time = Some(time);
        }
        if let Some(start) = patch.start_time {
            self.start_time = Some(start);
        }
        if let Some(end) = patch.end_time {
            self.end_time = Some(end);
        }
        if let Some(position) = patch.position {
            self.position = Some(position);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = Some(rotation);
        }
        if let Some(scale) = patch.scale {
            self.scale = Some(scale);
        }
        if let Some(easing) = patch.easing {
            self.easing = easing;
        }
        if let Some(label) = &patch.label {
            self.label = Some(label.clone());
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        for (key, value) in &patch.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Partial update for a [`TrackItem`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    /// New target object
    pub object_id: Option<ObjectId>,
    /// New keyframe time
    pub time: Option<f32>,
    /// New clip start
    pub start_time: Option<f32>,
    /// New clip end
    pub end_time: Option<f32>,
    /// New position
    pub position: Option<Vec3>,
    /// New rotation
    pub rotation: Option<Vec3>,
    /// New scale
    pub scale: Option<Vec3>,
    /// New easing
    pub easing: Option<Easing>,
    /// New label
    pub label: Option<String>,
    /// New enabled flag
    pub active: Option<bool>,
    /// Uninterpreted fields to overwrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemPatch {
    /// Patch carrying a full pose
    pub fn pose(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position: Some(position),
            rotation: Some(rotation),
            scale: Some(scale),
            ..Self::default()
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Set easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set time
    pub fn with_time(mut self, time: f32) -> Self {
        self.time = Some(time);
        self
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3 component-wise
    pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }
}
