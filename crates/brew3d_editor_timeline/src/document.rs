// SPDX-License-Identifier: MIT OR Apache-2.0
//! Saved animation documents.
//!
//! This is the JSON shape the editor's save/load API exchanges:
//! - Timeline content (tracks, markers, duration, fps)
//! - Scene objects the movement keyframes refer to
//! - Preview export payload derived from it
//! - Per-frame baking of object transforms

use crate::easing::Easing;
use crate::ids::{ObjectId, TrackId};
use crate::keyframe::Vec3;
use crate::marker::Marker;
use crate::sampler::{self, ObjectTransform, SceneObject};
use crate::store::{TimelineStore, FPS_RANGE, MIN_DURATION};
use crate::track::{Track, TrackType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;
use thiserror::Error;

/// Errors reading or writing documents
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON was malformed or had the wrong shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_duration() -> f32 {
    60.0
}

fn default_fps() -> f32 {
    24.0
}

/// A saved animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDocument {
    /// Owning project
    #[serde(default)]
    pub project_id: String,
    /// Animation ID
    #[serde(default)]
    pub animation_id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Duration in seconds
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Frame rate
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Tracks and their items
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Markers
    #[serde(default)]
    pub markers: Vec<Marker>,
    /// Scene objects
    #[serde(default)]
    pub scene_objects: Vec<SceneObject>,
}

impl AnimationDocument {
    /// Parse from JSON
    pub fn from_json(s: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        tracing::info!(
            "Loaded animation '{}' ({} tracks, {} objects) from {:?}",
            document.name,
            document.tracks.len(),
            document.scene_objects.len(),
            path
        );
        Ok(document)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Saved animation '{}' to {:?}", self.name, path);
        Ok(())
    }

    /// Payload for the preview renderer
    pub fn preview_export(&self) -> PreviewExport {
        PreviewExport {
            animation_id: self.animation_id.clone(),
            project_id: self.project_id.clone(),
            name: self.name.clone(),
            duration: self.duration,
            fps: self.fps,
            tracks: self
                .tracks
                .iter()
                .map(|track| PreviewTrack {
                    track_type: track.track_type,
                    target_id: track.id.clone(),
                    keyframes: track
                        .items
                        .iter()
                        .map(|item| PreviewKeyframe {
                            time: item.time,
                            position: item.position.unwrap_or([0.0; 3]),
                            rotation: item.rotation.unwrap_or([0.0; 3]),
                            scale: item.scale.unwrap_or([1.0; 3]),
                            easing: item.easing,
                        })
                        .collect(),
                })
                .collect(),
            markers: self.markers.clone(),
        }
    }

    /// Sample every scene object on every frame.
    ///
    /// `fps` overrides the document frame rate. Both rate and duration are
    /// clamped the way the timeline clamps them. Frames are produced lazily,
    /// so any duration can be baked in constant memory.
    pub fn bake(&self, fps: Option<f32>) -> BakedFrames<'_> {
        let fps = fps.unwrap_or(self.fps);
        let fps = if fps.is_nan() { FPS_RANGE.0 } else { fps.clamp(FPS_RANGE.0, FPS_RANGE.1) };
        let duration = if self.duration.is_nan() { MIN_DURATION } else { self.duration.max(MIN_DURATION) };
        // Saturates at u32::MAX for absurd durations
        let last_frame = (duration * fps).round() as u32;

        BakedFrames {
            document: self,
            fps,
            duration,
            last_frame,
        }
    }
}

/// Lazy per-frame bake of a document, serialized as a sequence of
/// [`BakedFrame`]s
#[derive(Debug, Clone, Copy)]
pub struct BakedFrames<'a> {
    document: &'a AnimationDocument,
    fps: f32,
    duration: f32,
    last_frame: u32,
}

impl<'a> BakedFrames<'a> {
    /// Number of frames, including frame zero
    pub fn len(&self) -> usize {
        (self.last_frame as usize).saturating_add(1)
    }

    /// Always false: frame zero is always baked
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the final frame
    pub fn last_frame(&self) -> u32 {
        self.last_frame
    }

    /// Frame rate the frames are sampled at
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Sample a single frame
    pub fn frame(&self, frame: u32) -> Option<BakedFrame> {
        if frame > self.last_frame {
            return None;
        }
        let time = (frame as f32 / self.fps).min(self.duration);
        Some(BakedFrame {
            frame,
            time,
            transforms: sampler::sample_scene(&self.document.scene_objects, &self.document.tracks, time),
        })
    }

    /// Iterate frames in order
    pub fn iter(&self) -> impl Iterator<Item = BakedFrame> + 'a {
        let frames = *self;
        (0..=frames.last_frame).filter_map(move |frame| frames.frame(frame))
    }
}

impl Serialize for BakedFrames<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Preview export payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewExport {
    /// Animation ID
    pub animation_id: String,
    /// Owning project
    pub project_id: String,
    /// Display name
    pub name: String,
    /// Duration in seconds
    pub duration: f32,
    /// Frame rate
    pub fps: f32,
    /// Flattened tracks
    pub tracks: Vec<PreviewTrack>,
    /// Markers
    pub markers: Vec<Marker>,
}

/// Track in a preview export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTrack {
    /// Track type
    #[serde(rename = "type")]
    pub track_type: TrackType,
    /// Source track
    pub target_id: TrackId,
    /// Items with pose defaults filled in
    pub keyframes: Vec<PreviewKeyframe>,
}

/// Keyframe in a preview export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewKeyframe {
    /// Keyframe time, absent for clips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f32>,
    /// Position
    pub position: Vec3,
    /// Rotation
    pub rotation: Vec3,
    /// Scale
    pub scale: Vec3,
    /// Easing
    pub easing: Easing,
}

/// Object transforms on one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedFrame {
    /// Frame index
    pub frame: u32,
    /// Frame time in seconds
    pub time: f32,
    /// Transform per object, in scene order
    pub transforms: IndexMap<ObjectId, ObjectTransform>,
}

impl TimelineStore {
    /// Build a document from the current timeline
    pub fn to_document(
        &self,
        project_id: impl Into<String>,
        animation_id: impl Into<String>,
        name: impl Into<String>,
        scene_objects: Vec<SceneObject>,
    ) -> AnimationDocument {
        AnimationDocument {
            project_id: project_id.into(),
            animation_id: animation_id.into(),
            name: name.into(),
            duration: self.playback().duration_seconds,
            fps: self.playback().fps,
            tracks: self.tracks().to_vec(),
            markers: self.markers().to_vec(),
            scene_objects,
        }
    }

    /// Replace the timeline with a loaded document, returning its scene
    /// objects. History is cleared; a document without tracks gets the
    /// default track set.
    pub fn load_document(&mut self, document: AnimationDocument) -> Vec<SceneObject> {
        let tracks = if document.tracks.is_empty() {
            Track::default_set()
        } else {
            document.tracks
        };
        tracing::debug!("Loading animation '{}' into timeline", document.name);
        self.replace_content(tracks, document.markers, document.duration, document.fps);
        document.scene_objects
    }
}
