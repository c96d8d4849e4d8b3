// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transform sampling.
//!
//! Computes where a scene object is at a given playhead time from its
//! movement keyframes. Everything here is a pure function over borrowed
//! timeline data; missing data always degrades to the object's base pose.

use crate::ids::{ItemId, ObjectId};
use crate::keyframe::{Interpolation, TrackItem, Vec3};
use crate::track::{Track, TrackType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keyframes closer than this to the query time are returned as-is
pub const EXACT_HIT_EPSILON: f32 = 0.01;

/// A scene object as supplied by the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object ID
    pub id: ObjectId,
    /// Base position
    #[serde(default)]
    pub position: Vec3,
    /// Base rotation (euler, radians)
    #[serde(default)]
    pub rotation: Vec3,
    /// Base dimensions, animated as scale
    #[serde(default = "unit_scale")]
    pub dimensions: Vec3,
    /// Fields owned by the viewport (primitive type, material, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn unit_scale() -> Vec3 {
    [1.0, 1.0, 1.0]
}

impl SceneObject {
    /// Create an object at the origin with unit dimensions
    pub fn new(id: impl Into<ObjectId>) -> Self {
        Self {
            id: id.into(),
            position: [0.0; 3],
            rotation: [0.0; 3],
            dimensions: unit_scale(),
            extra: Map::new(),
        }
    }

    /// Set the base position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Base transform of this object
    pub fn base_transform(&self) -> ObjectTransform {
        ObjectTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.dimensions,
        }
    }
}

/// Effective transform of an object at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectTransform {
    /// Position
    pub position: Vec3,
    /// Rotation (euler, radians)
    pub rotation: Vec3,
    /// Scale
    pub scale: Vec3,
}

impl ObjectTransform {
    /// Pose stored on a keyframe, with missing components taken from `base`
    pub fn from_keyframe(keyframe: &TrackItem, base: &ObjectTransform) -> Self {
        Self {
            position: keyframe.position.unwrap_or(base.position),
            rotation: keyframe.rotation.unwrap_or(base.rotation),
            scale: keyframe.scale.unwrap_or(base.scale),
        }
    }

    /// Component-wise interpolation
    pub fn lerp(&self, other: &ObjectTransform, t: f32) -> Self {
        Self {
            position: Interpolation::lerp_vec3(self.position, other.position, t),
            rotation: Interpolation::lerp_vec3(self.rotation, other.rotation, t),
            scale: Interpolation::lerp_vec3(self.scale, other.scale, t),
        }
    }
}

/// Find the keyframe pair enclosing `time`.
///
/// `before` is the last keyframe at or before `time`; `after` is the first
/// keyframe at or after it. Both are the same keyframe on an exact match.
fn find_keyframes<'a>(
    keyframes: &[&'a TrackItem],
    time: f32,
) -> (Option<&'a TrackItem>, Option<&'a TrackItem>) {
    let mut before = None;
    let mut after = None;

    for kf in keyframes {
        let Some(kf_time) = kf.time else {
            continue;
        };
        if kf_time <= time {
            before = Some(*kf);
        }
        if kf_time >= time {
            after = Some(*kf);
            break;
        }
    }

    (before, after)
}

/// Sample an object against a set of keyframes.
///
/// Keyframes for other objects and items without a time are ignored, and
/// the input does not need to be sorted. Before the first keyframe the base
/// pose is returned; after the last keyframe its pose is held.
pub fn sample_object(object: &SceneObject, keyframes: &[TrackItem], time: f32) -> ObjectTransform {
    let mut own: Vec<&TrackItem> = keyframes
        .iter()
        .filter(|k| k.is_keyframe_for(&object.id))
        .collect();
    own.sort_by(|a, b| a.time.unwrap_or(0.0).total_cmp(&b.time.unwrap_or(0.0)));
    sample_sorted(object, &own, time)
}

fn sample_sorted(object: &SceneObject, keyframes: &[&TrackItem], time: f32) -> ObjectTransform {
    let base = object.base_transform();
    if keyframes.is_empty() {
        return base;
    }

    let (before, after) = find_keyframes(keyframes, time);

    // TODO: product review on whether the pose before the first keyframe
    // should snap to that keyframe instead of the base pose
    let Some(a) = before else {
        return base;
    };

    let t0 = a.time.unwrap_or(0.0);
    let start = ObjectTransform::from_keyframe(a, &base);
    if (t0 - time).abs() < EXACT_HIT_EPSILON {
        return start;
    }

    match after {
        Some(b) if b.id != a.id => {
            let span = b.time.unwrap_or(0.0) - t0;
            if span <= 0.0 {
                return start;
            }
            let eased = a.easing.apply((time - t0) / span);
            start.lerp(&ObjectTransform::from_keyframe(b, &base), eased)
        }
        // Past the last keyframe: hold its pose
        _ => start,
    }
}

/// Sample an object against one track
pub fn sample_track(object: &SceneObject, track: &Track, time: f32) -> ObjectTransform {
    sample_sorted(object, &track.keyframes_for(&object.id), time)
}

/// First movement track in a track list
pub fn movement_track(tracks: &[Track]) -> Option<&Track> {
    tracks.iter().find(|t| t.track_type == TrackType::Movement)
}

/// Sample every scene object, in scene order.
///
/// Objects are driven by the first movement track; without one every
/// object keeps its base pose.
pub fn sample_scene(
    objects: &[SceneObject],
    tracks: &[Track],
    time: f32,
) -> IndexMap<ObjectId, ObjectTransform> {
    let track = movement_track(tracks);
    objects
        .iter()
        .map(|object| {
            let transform = match track {
                Some(track) => sample_track(object, track, time),
                None => object.base_transform(),
            };
            (object.id.clone(), transform)
        })
        .collect()
}

/// Ghost poses for onion skinning.
///
/// Returns the object's keyframes strictly before `time`, excluding its final
/// keyframe, each resolved against the base pose.
pub fn onion_skin(object: &SceneObject, track: &Track, time: f32) -> Vec<(ItemId, ObjectTransform)> {
    let base = object.base_transform();
    let keyframes = track.keyframes_for(&object.id);
    let last = keyframes.len().saturating_sub(1);

    keyframes
        .iter()
        .enumerate()
        .filter(|(index, kf)| *index != last && kf.time.is_some_and(|t| t < time))
        .map(|(_, kf)| (kf.id.clone(), ObjectTransform::from_keyframe(kf, &base)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    fn keyframe(object: &str, time: f32, position: Vec3) -> TrackItem {
        let mut kf = TrackItem::keyframe(ObjectId::from(object), time);
        kf.position = Some(position);
        kf
    }

    fn assert_vec3(actual: Vec3, expected: Vec3) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-5,
                "{actual:?} != {expected:?}"
            );
        }
    }

    fn two_keys() -> Vec<TrackItem> {
        vec![keyframe("cube", 0.0, [0.0, 0.0, 0.0]), keyframe("cube", 2.0, [2.0, 0.0, 0.0])]
    }

    #[test]
    fn test_no_keyframes_returns_base() {
        let cube = SceneObject::new("cube").with_position([5.0, 1.0, 0.0]);
        let others = vec![keyframe("sphere", 1.0, [9.0, 9.0, 9.0])];
        assert_eq!(sample_object(&cube, &others, 1.0), cube.base_transform());
    }

    #[test]
    fn test_exact_hit_returns_keyframe() {
        let cube = SceneObject::new("cube");
        let t = sample_object(&cube, &two_keys(), 2.0);
        assert_vec3(t.position, [2.0, 0.0, 0.0]);

        // Just past a middle keyframe snaps to it instead of interpolating
        let mut keys = two_keys();
        keys.push(keyframe("cube", 4.0, [4.0, 0.0, 0.0]));
        let near = sample_object(&cube, &keys, 2.005);
        assert_vec3(near.position, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_linear_midpoint() {
        let cube = SceneObject::new("cube");
        let t = sample_object(&cube, &two_keys(), 1.0);
        assert_vec3(t.position, [1.0, 0.0, 0.0]);
        // Missing rotation/scale fall back to the base pose on both ends
        assert_vec3(t.rotation, [0.0, 0.0, 0.0]);
        assert_vec3(t.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_easing_of_earlier_keyframe_applies() {
        let cube = SceneObject::new("cube");
        let mut keys = two_keys();
        keys[0].easing = Easing::EaseIn;
        keys[1].easing = Easing::EaseOut;
        let t = sample_object(&cube, &keys, 1.0);
        assert_vec3(t.position, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_unsorted_input() {
        let cube = SceneObject::new("cube");
        let mut keys = two_keys();
        keys.reverse();
        let t = sample_object(&cube, &keys, 0.5);
        assert_vec3(t.position, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_holds_last_pose_after_end() {
        let cube = SceneObject::new("cube");
        let t = sample_object(&cube, &two_keys(), 10.0);
        assert_vec3(t.position, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_base_pose_before_first_keyframe() {
        let cube = SceneObject::new("cube").with_position([-3.0, 0.0, 0.0]);
        let keys = vec![keyframe("cube", 1.0, [1.0, 0.0, 0.0]), keyframe("cube", 2.0, [2.0, 0.0, 0.0])];
        let t = sample_object(&cube, &keys, 0.5);
        assert_vec3(t.position, [-3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sample_scene_uses_movement_track() {
        let mut tracks = Track::default_set();
        tracks[0].items = two_keys();
        let objects = vec![SceneObject::new("cube"), SceneObject::new("sphere").with_position([0.0, 4.0, 0.0])];

        let sampled = sample_scene(&objects, &tracks, 1.0);
        assert_eq!(sampled.len(), 2);
        assert_vec3(sampled[&ObjectId::from("cube")].position, [1.0, 0.0, 0.0]);
        assert_vec3(sampled[&ObjectId::from("sphere")].position, [0.0, 4.0, 0.0]);
        assert_eq!(sampled.get_index(0).map(|(id, _)| id.as_str()), Some("cube"));
    }

    #[test]
    fn test_onion_skin_skips_last_and_future_keyframes() {
        let mut track = Track::new("track-move", TrackType::Movement, "Move");
        track.items = vec![
            keyframe("cube", 0.0, [0.0, 0.0, 0.0]),
            keyframe("cube", 1.0, [1.0, 0.0, 0.0]),
            keyframe("cube", 2.0, [2.0, 0.0, 0.0]),
        ];
        let cube = SceneObject::new("cube");

        assert_eq!(onion_skin(&cube, &track, 1.5).len(), 2);
        assert_eq!(onion_skin(&cube, &track, 5.0).len(), 2);
        assert_eq!(onion_skin(&cube, &track, 0.0).len(), 0);
    }
}
