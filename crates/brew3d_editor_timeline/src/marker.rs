// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline markers.

use crate::ids::MarkerId;
use serde::{Deserialize, Serialize};

/// A labeled point in time, independent of any track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique marker ID
    pub id: MarkerId,
    /// Time position in seconds
    pub time: f32,
    /// Label
    pub label: String,
}

impl Marker {
    /// Create a marker with a generated ID
    pub fn new(time: f32, label: impl Into<String>) -> Self {
        Self {
            id: MarkerId::generate(),
            time,
            label: label.into(),
        }
    }

    /// Apply a partial update
    pub fn merge(&mut self, patch: &MarkerPatch) {
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
    }
}

/// Partial update for a [`Marker`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerPatch {
    /// New time
    pub time: Option<f32>,
    /// New label
    pub label: Option<String>,
}

/// Sort markers ascending by time. Equal times keep their insertion order.
pub fn sort_markers(markers: &mut [Marker]) {
    markers.sort_by(|a, b| a.time.total_cmp(&b.time));
}

/// Marker nearest to a time
pub fn nearest_marker(markers: &[Marker], time: f32) -> Option<&Marker> {
    markers
        .iter()
        .min_by(|a, b| (a.time - time).abs().total_cmp(&(b.time - time).abs()))
}
