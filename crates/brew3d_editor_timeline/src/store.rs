// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline store.
//!
//! [`TimelineStore`] is the single source of truth for the animation timeline:
//! tracks, markers, playback parameters, panel sizes and undo history. Every
//! mutation is a named method that runs to completion. Out-of-range values are
//! clamped and unknown ids are ignored, so no operation here can fail.
//!
//! Snapshots for undo are taken when [`TimelineStore::save_state`] is called.
//! [`TimelineStore::edit`] and [`TimelineStore::edit_coalesced`] wrap an edit
//! and its snapshot in one call.

use crate::easing::Easing;
use crate::history::{History, TimelineSnapshot};
use crate::ids::{ItemId, MarkerId, ObjectId, TrackId};
use crate::keyframe::{ItemPatch, TrackItem, Vec3};
use crate::marker::{self, Marker, MarkerPatch};
use crate::settings::TimelineSettings;
use crate::track::{Track, TrackType};
use serde::{Deserialize, Serialize};

/// Keyframes for the same object closer than this are merged
pub const KEYFRAME_MERGE_WINDOW: f32 = 0.1;

/// Minimum timeline duration in seconds
pub const MIN_DURATION: f32 = 1.0;
/// Frame rate range
pub const FPS_RANGE: (f32, f32) = (1.0, 120.0);
/// Zoom range
pub const ZOOM_RANGE: (f32, f32) = (0.1, 10.0);
/// Timeline panel height range in pixels
pub const TIMELINE_HEIGHT_RANGE: (f32, f32) = (100.0, 400.0);
/// Inspector panel width range in pixels
pub const INSPECTOR_WIDTH_RANGE: (f32, f32) = (200.0, 600.0);

fn clamp_range(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

fn floor_at(value: f32, min: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.max(min)
    }
}

/// Playback parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Whether the playhead is advancing
    pub is_playing: bool,
    /// Playhead position, within `[0, duration_seconds]`
    pub playhead_seconds: f32,
    /// Timeline length, at least [`MIN_DURATION`]
    pub duration_seconds: f32,
    /// Frame rate, within [`FPS_RANGE`]
    pub fps: f32,
    /// Horizontal zoom, within [`ZOOM_RANGE`]
    pub zoom: f32,
    /// Wrap to the start when playback reaches the end
    pub looping: bool,
}

/// Editor panel sizes owned by the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    /// Timeline panel height in pixels
    pub timeline_height: f32,
    /// Inspector panel width in pixels
    pub inspector_width: f32,
}

/// Direction for frame stepping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// One frame back
    Backward,
    /// One frame forward
    Forward,
}

/// Timeline state container
#[derive(Debug, Clone)]
pub struct TimelineStore {
    playback: PlaybackState,
    layout: PanelLayout,
    tracks: Vec<Track>,
    markers: Vec<Marker>,
    selected_item: Option<ItemId>,
    snap_enabled: bool,
    history: History,
}

impl TimelineStore {
    /// Create a store with default settings
    pub fn new() -> Self {
        Self::with_settings(&TimelineSettings::default())
    }

    /// Create a store from settings. Values are clamped like their setters.
    pub fn with_settings(settings: &TimelineSettings) -> Self {
        let duration_seconds = floor_at(settings.duration_seconds, MIN_DURATION);
        Self {
            playback: PlaybackState {
                is_playing: false,
                playhead_seconds: 0.0,
                duration_seconds,
                fps: clamp_range(settings.fps, FPS_RANGE),
                zoom: clamp_range(settings.zoom, ZOOM_RANGE),
                looping: settings.looping,
            },
            layout: PanelLayout {
                timeline_height: clamp_range(settings.timeline_height, TIMELINE_HEIGHT_RANGE),
                inspector_width: clamp_range(settings.inspector_width, INSPECTOR_WIDTH_RANGE),
            },
            tracks: Track::default_set(),
            markers: Vec::new(),
            selected_item: None,
            snap_enabled: settings.snap_enabled,
            history: History::with_max_depth(settings.history_depth),
        }
    }

    // Accessors

    /// Playback parameters
    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Panel sizes
    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// All tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track by ID
    pub fn track(&self, track_id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == track_id)
    }

    /// First track of a type
    pub fn track_of_type(&self, track_type: TrackType) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_type == track_type)
    }

    /// Markers, sorted by time
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Item by ID on any track
    pub fn item(&self, item_id: &ItemId) -> Option<&TrackItem> {
        self.tracks.iter().find_map(|t| t.item(item_id))
    }

    /// Selected item
    pub fn selected_item(&self) -> Option<&ItemId> {
        self.selected_item.as_ref()
    }

    /// Undo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether snapping is enabled
    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    // Playback

    /// Move the playhead, clamped to `[0, duration]`
    pub fn set_playhead(&mut self, seconds: f32) {
        self.playback.playhead_seconds = clamp_range(seconds, (0.0, self.playback.duration_seconds));
    }

    /// Start or stop playback
    pub fn set_playing(&mut self, playing: bool) {
        self.playback.is_playing = playing;
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        self.playback.is_playing = !self.playback.is_playing;
    }

    /// Set whether playback wraps at the end
    pub fn set_looping(&mut self, looping: bool) {
        self.playback.looping = looping;
    }

    /// Set the duration (at least one second), pulling the playhead in
    pub fn set_duration(&mut self, seconds: f32) {
        self.playback.duration_seconds = floor_at(seconds, MIN_DURATION);
        if self.playback.playhead_seconds > self.playback.duration_seconds {
            self.playback.playhead_seconds = self.playback.duration_seconds;
        }
    }

    /// Set the frame rate, clamped to [`FPS_RANGE`]
    pub fn set_fps(&mut self, fps: f32) {
        self.playback.fps = clamp_range(fps, FPS_RANGE);
    }

    /// Seek one frame backward or forward
    pub fn step_frame(&mut self, direction: StepDirection) {
        let frame = 1.0 / self.playback.fps;
        let target = match direction {
            StepDirection::Backward => self.playback.playhead_seconds - frame,
            StepDirection::Forward => self.playback.playhead_seconds + frame,
        };
        self.set_playhead(target);
    }

    /// Advance playback by a clock delta.
    ///
    /// Does nothing while paused. At the end the playhead wraps when looping,
    /// otherwise it stops on the last instant.
    pub fn tick(&mut self, delta_seconds: f32) {
        if !self.playback.is_playing || delta_seconds.is_nan() || delta_seconds <= 0.0 {
            return;
        }

        let duration = self.playback.duration_seconds;
        let next = self.playback.playhead_seconds + delta_seconds;
        if next < duration {
            self.playback.playhead_seconds = next;
        } else if self.playback.looping {
            self.playback.playhead_seconds = next % duration;
        } else {
            self.playback.playhead_seconds = duration;
            self.playback.is_playing = false;
            tracing::trace!("Playback reached end at {duration}s");
        }
    }

    /// Frame index of the playhead
    pub fn current_frame(&self) -> u32 {
        (self.playback.playhead_seconds * self.playback.fps).round() as u32
    }

    /// Number of frames in the timeline
    pub fn total_frames(&self) -> u32 {
        (self.playback.duration_seconds * self.playback.fps).round() as u32
    }

    // Keyframes and clips

    /// Add a keyframe, or merge into an existing one.
    ///
    /// Only applies to a movement track. When the object already has a
    /// keyframe within [`KEYFRAME_MERGE_WINDOW`] of `time`, `data` is merged
    /// into it; otherwise a new active keyframe is appended. Returns the ID
    /// of the keyframe written.
    pub fn add_keyframe(
        &mut self,
        track_id: &TrackId,
        object_id: &ObjectId,
        time: f32,
        data: &ItemPatch,
    ) -> Option<ItemId> {
        let Some(track) = self
            .tracks
            .iter_mut()
            .find(|t| &t.id == track_id && t.track_type == TrackType::Movement)
        else {
            tracing::debug!("add_keyframe: no movement track {track_id}");
            return None;
        };

        let existing = track.items.iter_mut().find(|item| {
            item.object_id.as_ref() == Some(object_id)
                && item.time.is_some_and(|t| (t - time).abs() < KEYFRAME_MERGE_WINDOW)
        });

        if let Some(item) = existing {
            item.merge(data);
            tracing::trace!("Updated keyframe {} for {object_id}", item.id);
            return Some(item.id.clone());
        }

        let mut keyframe = TrackItem::keyframe(object_id.clone(), time);
        keyframe.merge(data);
        keyframe.active = true;
        let id = keyframe.id.clone();
        tracing::trace!("Added keyframe {id} for {object_id} at {time}s");
        track.items.push(keyframe);
        Some(id)
    }

    /// Record the current pose of an object at the playhead.
    ///
    /// Missing components default to the origin and unit scale.
    pub fn record_keyframe(
        &mut self,
        object_id: &ObjectId,
        position: Option<Vec3>,
        rotation: Option<Vec3>,
        scale: Option<Vec3>,
    ) -> Option<ItemId> {
        let track_id = self.track_of_type(TrackType::Movement)?.id.clone();
        let time = self.playback.playhead_seconds;
        let data = ItemPatch {
            easing: Some(Easing::Linear),
            label: Some(format!("Keyframe {}s", time.round())),
            ..ItemPatch::pose(
                position.unwrap_or([0.0; 3]),
                rotation.unwrap_or([0.0; 3]),
                scale.unwrap_or([1.0; 3]),
            )
        };
        self.add_keyframe(&track_id, object_id, time, &data)
    }

    /// Merge updates into a keyframe. Unknown ids are ignored.
    pub fn update_keyframe(&mut self, keyframe_id: &ItemId, updates: &ItemPatch) -> bool {
        self.update_item(keyframe_id, updates)
    }

    /// Remove a keyframe from every track
    pub fn delete_keyframe(&mut self, keyframe_id: &ItemId) -> bool {
        self.delete_item(keyframe_id)
    }

    /// Append a clip verbatim to a track. Unknown tracks are ignored.
    pub fn add_clip(&mut self, track_id: &TrackId, clip: TrackItem) -> bool {
        let Some(track) = self.tracks.iter_mut().find(|t| &t.id == track_id) else {
            tracing::debug!("add_clip: unknown track {track_id}");
            return false;
        };
        tracing::trace!("Added clip {} to {track_id}", clip.id);
        track.items.push(clip);
        true
    }

    /// Merge updates into a clip. Unknown ids are ignored.
    pub fn update_clip(&mut self, clip_id: &ItemId, updates: &ItemPatch) -> bool {
        self.update_item(clip_id, updates)
    }

    /// Remove a clip from every track
    pub fn delete_clip(&mut self, clip_id: &ItemId) -> bool {
        self.delete_item(clip_id)
    }

    fn update_item(&mut self, item_id: &ItemId, updates: &ItemPatch) -> bool {
        let mut found = false;
        for item in self.tracks.iter_mut().flat_map(|t| t.items.iter_mut()) {
            if &item.id == item_id {
                item.merge(updates);
                found = true;
            }
        }
        if !found {
            tracing::debug!("Ignoring update for unknown item {item_id}");
        }
        found
    }

    fn delete_item(&mut self, item_id: &ItemId) -> bool {
        let removed: usize = self.tracks.iter_mut().map(|t| t.remove_item(item_id)).sum();
        if removed == 0 {
            tracing::debug!("Ignoring delete for unknown item {item_id}");
            return false;
        }
        if self.selected_item.as_ref() == Some(item_id) {
            self.selected_item = None;
        }
        true
    }

    /// Select an item, or clear the selection
    pub fn set_selected_item(&mut self, item_id: Option<ItemId>) {
        self.selected_item = item_id;
    }

    // Markers

    /// Add a marker, labeled `Marker N` when no label is given
    pub fn add_marker(&mut self, time: f32, label: Option<String>) -> MarkerId {
        let label = label.unwrap_or_else(|| format!("Marker {}", self.markers.len() + 1));
        let marker = Marker::new(time, label);
        let id = marker.id.clone();
        self.markers.push(marker);
        marker::sort_markers(&mut self.markers);
        id
    }

    /// Merge updates into a marker. Unknown ids are ignored.
    pub fn update_marker(&mut self, marker_id: &MarkerId, updates: &MarkerPatch) -> bool {
        let Some(marker) = self.markers.iter_mut().find(|m| &m.id == marker_id) else {
            tracing::debug!("Ignoring update for unknown marker {marker_id}");
            return false;
        };
        marker.merge(updates);
        if updates.time.is_some() {
            marker::sort_markers(&mut self.markers);
        }
        true
    }

    /// Remove a marker
    pub fn delete_marker(&mut self, marker_id: &MarkerId) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| &m.id != marker_id);
        let removed = self.markers.len() != before;
        if !removed {
            tracing::debug!("Ignoring delete for unknown marker {marker_id}");
        }
        removed
    }

    // View

    /// Set timeline zoom, clamped to [`ZOOM_RANGE`]
    pub fn set_zoom(&mut self, zoom: f32) {
        self.playback.zoom = clamp_range(zoom, ZOOM_RANGE);
    }

    /// Set timeline panel height, clamped to [`TIMELINE_HEIGHT_RANGE`]
    pub fn set_timeline_height(&mut self, height: f32) {
        self.layout.timeline_height = clamp_range(height, TIMELINE_HEIGHT_RANGE);
    }

    /// Set inspector width, clamped to [`INSPECTOR_WIDTH_RANGE`]
    pub fn set_inspector_width(&mut self, width: f32) {
        self.layout.inspector_width = clamp_range(width, INSPECTOR_WIDTH_RANGE);
    }

    /// Enable or disable snapping
    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    /// Snap a time to the nearest frame, or to a marker that is closer.
    ///
    /// Returns `time` unchanged while snapping is disabled.
    pub fn snap_time(&self, time: f32) -> f32 {
        if !self.snap_enabled {
            return time;
        }

        let fps = self.playback.fps;
        let frame_time = (time * fps).round() / fps;
        match marker::nearest_marker(&self.markers, time) {
            Some(m) if (m.time - time).abs() < (frame_time - time).abs() => m.time,
            _ => frame_time,
        }
    }

    // History

    /// Capture the undoable part of the state
    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            tracks: self.tracks.clone(),
            markers: self.markers.clone(),
            playhead_seconds: self.playback.playhead_seconds,
            duration_seconds: self.playback.duration_seconds,
            fps: self.playback.fps,
        }
    }

    /// Replace the undoable part of the state
    pub fn restore(&mut self, snapshot: &TimelineSnapshot) {
        self.tracks = snapshot.tracks.clone();
        self.markers = snapshot.markers.clone();
        self.playback.playhead_seconds = snapshot.playhead_seconds;
        self.playback.duration_seconds = snapshot.duration_seconds;
        self.playback.fps = snapshot.fps;
    }

    /// Push the current state onto the history, discarding any redo steps
    pub fn save_state(&mut self) {
        let snapshot = self.snapshot();
        self.history.save(snapshot, None);
    }

    /// Restore the previous history entry. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(&snapshot);
        true
    }

    /// Restore the next history entry. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(&snapshot);
        true
    }

    /// Apply an edit and record it as one history step
    pub fn edit<R>(&mut self, label: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        let result = f(self);
        let snapshot = self.snapshot();
        self.history.save(snapshot, Some(label.to_string()));
        result
    }

    /// Apply an edit, folding it into the previous step when that step used
    /// the same key (drags, typing)
    pub fn edit_coalesced<R>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        let result = f(self);
        let snapshot = self.snapshot();
        self.history.save_coalesced(key, snapshot, None);
        result
    }

    /// Replace timeline content, e.g. after loading a saved animation.
    /// History and selection are reset.
    pub(crate) fn replace_content(
        &mut self,
        tracks: Vec<Track>,
        mut markers: Vec<Marker>,
        duration_seconds: f32,
        fps: f32,
    ) {
        marker::sort_markers(&mut markers);
        self.tracks = tracks;
        self.markers = markers;
        self.set_duration(duration_seconds);
        self.set_fps(fps);
        self.set_playhead(self.playback.playhead_seconds);
        self.selected_item = None;
        self.history.clear();
    }
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as `MM:SS`, truncating fractions
pub fn format_time(seconds: f32) -> String {
    let total = if seconds.is_nan() { 0 } else { seconds.max(0.0).floor() as u64 };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_track() -> TrackId {
        TrackId::from("track-move")
    }

    #[test]
    fn test_defaults() {
        let store = TimelineStore::new();
        assert_eq!(store.playback().duration_seconds, 60.0);
        assert_eq!(store.playback().fps, 24.0);
        assert_eq!(store.playback().zoom, 1.0);
        assert_eq!(store.layout().timeline_height, 200.0);
        assert_eq!(store.layout().inspector_width, 300.0);
        assert_eq!(store.tracks().len(), 5);
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_clamping() {
        let mut store = TimelineStore::new();

        store.set_duration(0.2);
        assert_eq!(store.playback().duration_seconds, 1.0);
        store.set_duration(f32::NAN);
        assert_eq!(store.playback().duration_seconds, 1.0);

        store.set_fps(500.0);
        assert_eq!(store.playback().fps, 120.0);
        store.set_fps(0.0);
        assert_eq!(store.playback().fps, 1.0);

        store.set_zoom(0.0);
        assert_eq!(store.playback().zoom, 0.1);
        store.set_zoom(42.0);
        assert_eq!(store.playback().zoom, 10.0);

        store.set_timeline_height(50.0);
        assert_eq!(store.layout().timeline_height, 100.0);
        store.set_inspector_width(900.0);
        assert_eq!(store.layout().inspector_width, 600.0);
    }

    #[test]
    fn test_playhead_clamps_to_duration() {
        let mut store = TimelineStore::new();
        store.set_playhead(-3.0);
        assert_eq!(store.playback().playhead_seconds, 0.0);
        store.set_playhead(90.0);
        assert_eq!(store.playback().playhead_seconds, 60.0);

        store.set_duration(10.0);
        assert_eq!(store.playback().playhead_seconds, 10.0);
    }

    #[test]
    fn test_add_keyframe_merges_within_window() {
        let mut store = TimelineStore::new();
        let cube = ObjectId::from("cube");

        let first = store.add_keyframe(
            &move_track(),
            &cube,
            1.0,
            &ItemPatch::pose([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0; 3]),
        );
        let second = store.add_keyframe(
            &move_track(),
            &cube,
            1.05,
            &ItemPatch::default().with_position([5.0, 0.0, 0.0]),
        );
        assert_eq!(first, second);

        let track = store.track(&move_track()).unwrap();
        assert_eq!(track.items.len(), 1);
        let kf = &track.items[0];
        assert_eq!(kf.position, Some([5.0, 0.0, 0.0]));
        assert_eq!(kf.rotation, Some([0.0, 1.0, 0.0]));
        assert_eq!(kf.time, Some(1.0));

        // Outside the window, or another object, adds a new keyframe
        store.add_keyframe(&move_track(), &cube, 1.2, &ItemPatch::default());
        store.add_keyframe(&move_track(), &ObjectId::from("sphere"), 1.0, &ItemPatch::default());
        assert_eq!(store.track(&move_track()).unwrap().items.len(), 3);
    }

    #[test]
    fn test_add_keyframe_ignores_non_movement_tracks() {
        let mut store = TimelineStore::new();
        let cube = ObjectId::from("cube");
        assert!(store
            .add_keyframe(&TrackId::from("track-audio"), &cube, 1.0, &ItemPatch::default())
            .is_none());
        assert!(store
            .add_keyframe(&TrackId::from("nope"), &cube, 1.0, &ItemPatch::default())
            .is_none());
        assert!(store.tracks().iter().all(|t| t.items.is_empty()));
    }

    #[test]
    fn test_record_keyframe_at_playhead() {
        let mut store = TimelineStore::new();
        store.set_playhead(2.6);
        let id = store
            .record_keyframe(&ObjectId::from("cube"), Some([1.0, 2.0, 3.0]), None, None)
            .unwrap();

        let kf = store.item(&id).unwrap();
        assert_eq!(kf.time, Some(2.6));
        assert_eq!(kf.rotation, Some([0.0; 3]));
        assert_eq!(kf.scale, Some([1.0; 3]));
        assert_eq!(kf.label.as_deref(), Some("Keyframe 3s"));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut store = TimelineStore::new();
        let before = store.snapshot();

        assert!(!store.update_keyframe(&ItemId::from("ghost"), &ItemPatch::default().with_time(3.0)));
        assert!(!store.delete_clip(&ItemId::from("ghost")));
        assert!(!store.add_clip(&TrackId::from("ghost"), TrackItem::clip(ItemId::from("c"), TrackType::Audio, 0.0, 1.0)));
        assert!(!store.update_marker(&MarkerId::from("ghost"), &MarkerPatch::default()));
        assert!(!store.delete_marker(&MarkerId::from("ghost")));

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_clip_lifecycle() {
        let mut store = TimelineStore::new();
        let audio = TrackId::from("track-audio");
        let clip = TrackItem::clip(ItemId::from("audio-1"), TrackType::Audio, 0.0, 10.0)
            .with_extra("clip", "theme.mp3");
        assert!(store.add_clip(&audio, clip));
        store.set_selected_item(Some(ItemId::from("audio-1")));

        let patch = ItemPatch {
            end_time: Some(12.0),
            ..ItemPatch::default()
        };
        assert!(store.update_clip(&ItemId::from("audio-1"), &patch));
        assert_eq!(store.item(&ItemId::from("audio-1")).and_then(|c| c.end_time), Some(12.0));

        assert!(store.delete_clip(&ItemId::from("audio-1")));
        assert!(store.track(&audio).unwrap().items.is_empty());
        assert!(store.selected_item().is_none());
    }

    #[test]
    fn test_markers_sorted_and_numbered() {
        let mut store = TimelineStore::new();
        store.add_marker(5.0, None);
        store.add_marker(1.0, None);
        let named = store.add_marker(3.0, Some("Drop".into()));

        let labels: Vec<_> = store.markers().iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["Marker 2", "Drop", "Marker 1"]);

        store.update_marker(&named, &MarkerPatch { time: None, label: Some("Beat".into()) });
        assert_eq!(store.markers()[1].label, "Beat");
        assert!(store.delete_marker(&named));
        assert_eq!(store.markers().len(), 2);
    }

    #[test]
    fn test_moving_a_marker_keeps_order() {
        let mut store = TimelineStore::new();
        let first = store.add_marker(1.0, None);
        store.add_marker(5.0, None);

        assert!(store.update_marker(&first, &MarkerPatch { time: Some(9.0), label: None }));
        let times: Vec<f32> = store.markers().iter().map(|m| m.time).collect();
        assert_eq!(times, [5.0, 9.0]);
        assert_eq!(store.markers()[1].id, first);
    }

    #[test]
    fn test_undo_redo() {
        let mut store = TimelineStore::new();
        store.save_state();
        let saved = store.snapshot();

        store.add_marker(2.0, None);
        store.set_fps(30.0);
        store.save_state();

        assert!(store.undo());
        assert_eq!(store.snapshot(), saved);
        assert!(!store.undo());

        assert!(store.redo());
        assert_eq!(store.playback().fps, 30.0);
        assert_eq!(store.markers().len(), 1);
        assert!(!store.redo());
    }

    #[test]
    fn test_edit_helpers_record_history() {
        let mut store = TimelineStore::new();
        store.save_state();
        store.edit("Add marker", |s| s.add_marker(1.0, None));
        assert_eq!(store.history().undo_label(), Some("Add marker"));

        store.edit_coalesced("zoom", |s| s.set_playhead(1.0));
        store.edit_coalesced("zoom", |s| s.set_playhead(2.0));
        assert_eq!(store.history().len(), 3);

        assert!(store.undo());
        assert_eq!(store.playback().playhead_seconds, 0.0);
        assert_eq!(store.markers().len(), 1);
    }

    #[test]
    fn test_tick() {
        let mut store = TimelineStore::new();
        store.set_duration(2.0);
        store.tick(0.5);
        assert_eq!(store.playback().playhead_seconds, 0.0);

        store.set_playing(true);
        store.tick(0.5);
        assert_eq!(store.playback().playhead_seconds, 0.5);
        store.tick(5.0);
        assert_eq!(store.playback().playhead_seconds, 2.0);
        assert!(!store.playback().is_playing);

        store.set_looping(true);
        store.set_playhead(1.5);
        store.toggle_playback();
        store.tick(1.0);
        assert!((store.playback().playhead_seconds - 0.5).abs() < 1e-5);
        assert!(store.playback().is_playing);
    }

    #[test]
    fn test_step_frame_and_frames() {
        let mut store = TimelineStore::new();
        store.set_fps(10.0);
        store.step_frame(StepDirection::Backward);
        assert_eq!(store.playback().playhead_seconds, 0.0);
        store.step_frame(StepDirection::Forward);
        store.step_frame(StepDirection::Forward);
        assert!((store.playback().playhead_seconds - 0.2).abs() < 1e-5);
        assert_eq!(store.current_frame(), 2);
        assert_eq!(store.total_frames(), 600);
    }

    #[test]
    fn test_snap_time() {
        let mut store = TimelineStore::new();
        store.set_fps(10.0);
        assert!((store.snap_time(0.33) - 0.3).abs() < 1e-5);

        store.add_marker(0.34, None);
        assert!((store.snap_time(0.33) - 0.34).abs() < 1e-5);

        store.set_snap_enabled(false);
        assert_eq!(store.snap_time(0.33), 0.33);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(125.0), "02:05");
        assert_eq!(format_time(-4.0), "00:00");
    }
}
