// SPDX-License-Identifier: MIT OR Apache-2.0
//! Identifiers for timeline entities.
//!
//! Saved animations carry free-form string ids (`track-move`, `kf-…`,
//! `audio-…`), so every id is a transparent string newtype.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an id from any string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a track
    TrackId
);
string_id!(
    /// Unique identifier for a track item (keyframe or clip)
    ItemId
);
string_id!(
    /// Unique identifier for a timeline marker
    MarkerId
);
string_id!(
    /// Identifier of a scene object targeted by movement keyframes
    ObjectId
);

fn generated(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

impl ItemId {
    /// Generate a fresh id with the given prefix, e.g. `kf-3f2a…`
    pub fn generate(prefix: &str) -> Self {
        Self(generated(prefix))
    }
}

impl MarkerId {
    /// Generate a fresh marker id
    pub fn generate() -> Self {
        Self(generated("marker"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let a = ItemId::generate("kf");
        let b = ItemId::generate("kf");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("kf-"));
        assert!(MarkerId::generate().as_str().starts_with("marker-"));
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = TrackId::from("track-move");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"track-move\"");
        let back: TrackId = serde_json::from_str("\"track-fx\"").unwrap();
        assert_eq!(back.as_str(), "track-fx");
    }
}
