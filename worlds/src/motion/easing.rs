//! Timing curves for finite actions. The set mirrors the four timing modes a
//! scene-graph action runtime typically offers; the quadratic shapes follow
//! [Robert Penner](http://robertpenner.com/easing/).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,

    #[doc(alias = "EaseInQuad")]
    EaseIn,

    #[doc(alias = "EaseOutQuad")]
    EaseOut,

    #[doc(alias = "EaseInOutQuad")]
    EaseInOut,
}

impl Easing {
    pub const FUNCTION_NAMES: &[&str] =
        &["linear", "ease_in", "ease_out", "ease_in_out"];

    /// Maps normalized progress `t` onto the curve. Input is clamped to
    /// `[0, 1]` so the endpoints are always exact.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => linear(t),
            Self::EaseIn => ease_in_quad(t),
            Self::EaseOut => ease_out_quad(t),
            Self::EaseInOut => ease_in_out_quad(t),
        }
    }
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "linear" => Ok(Self::Linear),
            "ease_in" => Ok(Self::EaseIn),
            "ease_out" => Ok(Self::EaseOut),
            "ease_in_out" => Ok(Self::EaseInOut),
            _ => Err(format!("Unknown easing function: {}", name)),
        }
    }
}

impl Display for Easing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease_in",
            Self::EaseOut => "ease_out",
            Self::EaseInOut => "ease_in_out",
        };

        write!(f, "{}", s)
    }
}

pub fn linear(t: f32) -> f32 {
    t
}

pub fn ease_in_quad(t: f32) -> f32 {
    t * t
}

pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
