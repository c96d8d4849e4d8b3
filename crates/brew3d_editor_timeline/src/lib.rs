// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation timeline for the Brew3D editor.
//!
//! This crate provides the animation core behind the editor's timeline tab:
//! - Fixed set of typed tracks (movement, camera, audio, video, effects)
//! - Movement keyframes and media clips
//! - Timeline markers
//! - Linear undo/redo history
//! - Per-object transform sampling with easing
//!
//! ## Architecture
//!
//! The timeline is built on:
//! - [`TimelineStore`]: the single owner of tracks, markers, playback and history
//! - [`sampler`]: pure functions computing object transforms at a playhead time
//! - [`Easing`]: closed set of easing curves applied per keyframe segment
//! - [`AnimationDocument`]: the saved-animation shape used for persistence

pub mod ids;
pub mod easing;
pub mod keyframe;
pub mod track;
pub mod marker;
pub mod sampler;
pub mod history;
pub mod store;
pub mod document;
pub mod settings;

pub use ids::{ItemId, MarkerId, ObjectId, TrackId};
pub use easing::Easing;
pub use keyframe::{Interpolation, ItemPatch, TrackItem, Vec3};
pub use track::{Track, TrackType};
pub use marker::{Marker, MarkerPatch};
pub use sampler::{ObjectTransform, SceneObject};
pub use history::{History, HistoryEntry, HistoryStats, TimelineSnapshot};
pub use store::{format_time, PanelLayout, PlaybackState, StepDirection, TimelineStore};
pub use document::{AnimationDocument, BakedFrame, BakedFrames, DocumentError, PreviewExport};
pub use settings::TimelineSettings;
