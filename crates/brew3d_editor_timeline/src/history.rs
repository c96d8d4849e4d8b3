// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history of timeline snapshots.
//!
//! History is a single linear list with a cursor. Saving a new snapshot
//! discards anything after the cursor; undo and redo only move the cursor
//! and hand back the snapshot to restore.

use crate::marker::Marker;
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum undo history depth
pub const MAX_HISTORY: usize = 100;

/// Timeline state captured by a history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    /// Tracks and their items
    pub tracks: Vec<Track>,
    /// Markers
    pub markers: Vec<Marker>,
    /// Playhead position
    pub playhead_seconds: f32,
    /// Timeline duration
    pub duration_seconds: f32,
    /// Frame rate
    pub fps: f32,
}

/// One step in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Captured state
    pub snapshot: TimelineSnapshot,
    /// Human-readable description
    pub label: Option<String>,
    /// Entries saved back to back with the same key collapse into one
    pub coalesce_key: Option<String>,
}

/// History statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Steps available to undo
    pub undo_count: usize,
    /// Steps available to redo
    pub redo_count: usize,
    /// Total entries held
    pub entries: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
#[derive(Debug, Clone)]
pub struct History {
    /// Saved entries, oldest first
    entries: VecDeque<HistoryEntry>,
    /// Cursor into `entries`; `None` until the first save
    index: Option<usize>,
    /// Maximum history depth
    max_depth: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth (at least one entry)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: None,
            max_depth: max_depth.max(1),
        }
    }

    /// Save a snapshot after the cursor, discarding any redo branch
    pub fn save(&mut self, snapshot: TimelineSnapshot, label: Option<String>) {
        self.push(HistoryEntry {
            snapshot,
            label,
            coalesce_key: None,
        });
    }

    /// Save a snapshot, replacing the current entry when it was saved with
    /// the same key and nothing follows it
    pub fn save_coalesced(&mut self, key: &str, snapshot: TimelineSnapshot, label: Option<String>) {
        if let Some(index) = self.index {
            let is_newest = index + 1 == self.entries.len();
            if let Some(entry) = self.entries.get_mut(index) {
                if is_newest && entry.coalesce_key.as_deref() == Some(key) {
                    entry.snapshot = snapshot;
                    if label.is_some() {
                        entry.label = label;
                    }
                    return;
                }
            }
        }

        self.push(HistoryEntry {
            snapshot,
            label,
            coalesce_key: Some(key.to_string()),
        });
    }

    fn push(&mut self, entry: HistoryEntry) {
        // Clear redo branch
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);

        self.entries.push_back(entry);

        // Enforce history limit
        while self.entries.len() > self.max_depth {
            self.entries.pop_front();
        }

        self.index = Some(self.entries.len() - 1);
    }

    /// Step back, returning the snapshot to restore
    pub fn undo(&mut self) -> Option<&TimelineSnapshot> {
        let index = self.index.filter(|&i| i > 0)? - 1;
        self.index = Some(index);
        self.entries.get(index).map(|e| &e.snapshot)
    }

    /// Step forward, returning the snapshot to restore
    pub fn redo(&mut self) -> Option<&TimelineSnapshot> {
        let index = self.index.filter(|&i| i + 1 < self.entries.len())? + 1;
        self.index = Some(index);
        self.entries.get(index).map(|e| &e.snapshot)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Cursor position, `None` when nothing has been saved
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been saved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a position
    pub fn entry(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        let position = self.index.map_or(0, |i| i + 1);
        HistoryStats {
            undo_count: position.saturating_sub(1),
            redo_count: self.entries.len() - position,
            entries: self.entries.len(),
            max_depth: self.max_depth,
        }
    }

    /// Get description of the step undo would revert
    pub fn undo_label(&self) -> Option<&str> {
        let index = self.index.filter(|&i| i > 0)?;
        self.entries.get(index)?.label.as_deref()
    }

    /// Get description of the step redo would reapply
    pub fn redo_label(&self) -> Option<&str> {
        let index = self.index.map_or(0, |i| i + 1);
        self.entries.get(index)?.label.as_deref()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(fps: f32) -> TimelineSnapshot {
        TimelineSnapshot {
            tracks: Vec::new(),
            markers: Vec::new(),
            playhead_seconds: 0.0,
            duration_seconds: 60.0,
            fps,
        }
    }

    #[test]
    fn test_undo_redo_walks_the_cursor() {
        let mut history = History::new();
        assert!(history.undo().is_none());

        history.save(snapshot(24.0), None);
        assert!(!history.can_undo());
        history.save(snapshot(30.0), Some("Set FPS".into()));
        assert_eq!(history.undo_label(), Some("Set FPS"));

        assert_eq!(history.undo().map(|s| s.fps), Some(24.0));
        assert_eq!(history.index(), Some(0));
        assert!(history.undo().is_none());
        assert_eq!(history.redo_label(), Some("Set FPS"));
        assert_eq!(history.redo().map(|s| s.fps), Some(30.0));
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_save_discards_redo_branch() {
        let mut history = History::new();
        history.save(snapshot(1.0), None);
        history.save(snapshot(2.0), None);
        history.save(snapshot(3.0), None);
        history.undo();
        history.undo();

        history.save(snapshot(4.0), None);
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), Some(1));
        assert!(!history.can_redo());
        assert_eq!(history.undo().map(|s| s.fps), Some(1.0));
    }

    #[test]
    fn test_depth_limit_drops_oldest() {
        let mut history = History::with_max_depth(3);
        for fps in 1..=5 {
            history.save(snapshot(fps as f32), None);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), Some(2));
        assert_eq!(history.entry(0).map(|e| e.snapshot.fps), Some(3.0));
        assert_eq!(history.stats().undo_count, 2);
    }

    #[test]
    fn test_coalesced_saves_collapse() {
        let mut history = History::new();
        history.save(snapshot(1.0), None);
        history.save_coalesced("drag", snapshot(2.0), None);
        history.save_coalesced("drag", snapshot(3.0), None);
        assert_eq!(history.len(), 2);
        assert_eq!(history.entry(1).map(|e| e.snapshot.fps), Some(3.0));

        // A different key starts a new step
        history.save_coalesced("type", snapshot(4.0), None);
        assert_eq!(history.len(), 3);

        // After undo the same key no longer collapses into a stale entry
        history.undo();
        history.save_coalesced("drag", snapshot(5.0), None);
        assert_eq!(history.len(), 3);
        assert_eq!(history.entry(2).map(|e| e.snapshot.fps), Some(5.0));
    }

    #[test]
    fn test_stats() {
        let mut history = History::with_max_depth(10);
        assert_eq!(history.stats(), HistoryStats { max_depth: 10, ..HistoryStats::default() });
        history.save(snapshot(1.0), None);
        history.save(snapshot(2.0), None);
        history.undo();
        let stats = history.stats();
        assert_eq!(stats.undo_count, 0);
        assert_eq!(stats.redo_count, 1);
        assert_eq!(stats.entries, 2);
    }
}
