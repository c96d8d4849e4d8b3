// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves applied between keyframes.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

/// Easing curve used from a keyframe to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Easing {
    /// No easing
    #[default]
    Linear,
    /// Quadratic ease in
    EaseIn,
    /// Quadratic ease out
    EaseOut,
    /// Quadratic ease in, then out
    EaseInOut,
    /// Bounce out
    Bounce,
    /// Elastic out, overshoots 1 before settling
    Elastic,
}

impl Easing {
    /// Persisted name of this curve
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Bounce => "bounce",
            Self::Elastic => "elastic",
        }
    }

    /// Display name for inspector dropdowns
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::EaseIn => "Ease In",
            Self::EaseOut => "Ease Out",
            Self::EaseInOut => "Ease In Out",
            Self::Bounce => "Bounce",
            Self::Elastic => "Elastic",
        }
    }

    /// Parse a persisted name. Unrecognized names fall back to [`Easing::Linear`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" => Self::EaseInOut,
            "bounce" => Self::Bounce,
            "elastic" => Self::Elastic,
            _ => Self::Linear,
        }
    }

    /// All easing curves
    pub fn all() -> &'static [Easing] {
        &[
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::Bounce,
            Easing::Elastic,
        ]
    }

    /// Remap a linear progress fraction `t` in `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Self::Bounce => bounce_out(t),
            Self::Elastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                2f32.powf(-10.0 * t) * ((t - 0.1) * (2.0 * PI) / 0.4).sin() + 1.0
            }
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Easing {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Option<String>> for Easing {
    fn from(name: Option<String>) -> Self {
        name.map(Self::from).unwrap_or_default()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}
