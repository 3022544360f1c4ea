//! YAML configuration. Every section defaults, so an empty file (or no file)
//! reproduces the original piece.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::error::Result;
use crate::core::util::ensure_finite_positive;
use crate::io::audio::TrackResource;
use crate::motion::PlanSettings;
use crate::scene::{Color, LayoutParams, TextureHandle};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldsConfig {
    pub layout: LayoutConfig,
    pub motion: PlanSettings,
    pub presentation: PresentationConfig,
    pub audio: AudioConfig,
    /// Seed for motion jitter. Absent means a fresh draw every run.
    pub seed: Option<u64>,
}

impl WorldsConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yml::from_str::<Self>(yaml)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.params().validate()?;
        self.motion.validate()?;
        ensure_finite_positive("fade_in", self.presentation.fade_in)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub element_count: u32,
    pub band_count: u32,
    pub sphere_radius: f32,
    /// Height of the top and bottom rings. Defaults to `sphere_radius`.
    pub vertical_scale: Option<f32>,
    pub element_size: f32,
    pub backdrop_edge: f32,
    pub backdrop_texture: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            element_count: 32,
            band_count: 32,
            sphere_radius: 50.0,
            vertical_scale: None,
            element_size: 1.0,
            backdrop_edge: 1000.0,
            backdrop_texture: None,
        }
    }
}

impl LayoutConfig {
    pub fn params(&self) -> LayoutParams {
        LayoutParams {
            element_count: self.element_count,
            band_count: self.band_count,
            sphere_radius: self.sphere_radius,
            vertical_scale: self.vertical_scale.unwrap_or(self.sphere_radius),
            element_size: self.element_size,
            backdrop_edge: self.backdrop_edge,
            backdrop_texture: self.backdrop_texture.clone().map(TextureHandle),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub fade_in: f32,
    pub background: Color,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            fade_in: 1.0,
            background: Color::BLACK,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioConfig {
    pub track: PathBuf,
    pub duration: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            track: PathBuf::from("track.m4a"),
            duration: 160.0,
        }
    }
}

impl AudioConfig {
    pub fn track_resource(&self) -> TrackResource {
        TrackResource::new(self.track.clone(), self.duration)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::core::error::WorldsError;
    use crate::motion::SpinJitter;

    #[test]
    fn empty_document_is_default() {
        let config = WorldsConfig::from_yaml("").unwrap();
        assert_eq!(config, WorldsConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let yaml = r#"
layout:
  element_count: 16
  sphere_radius: 20
motion:
  camera_target: [0, 10, 80]
  cluster_spin:
    axis_degrees: 5
    duration: [2, 3]
seed: 42
"#;
        let config = WorldsConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.layout.element_count, 16);
        assert_eq!(config.layout.band_count, 32);
        assert_eq!(config.layout.params().vertical_scale, 20.0);
        assert_eq!(config.motion.camera_target, Vec3::new(0.0, 10.0, 80.0));
        assert_eq!(
            config.motion.cluster_spin,
            SpinJitter {
                axis_degrees: 5.0,
                duration: [2.0, 3.0]
            }
        );
        assert_eq!(config.motion.backdrop_spin, SpinJitter::BACKDROP);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = WorldsConfig::default();
        config.layout.backdrop_texture = Some("stars.png".into());
        config.audio.duration = 90.5;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(WorldsConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn malformed_yaml_is_a_configuration_error() {
        let err = WorldsConfig::from_yaml("layout: [1, 2").unwrap_err();
        assert!(matches!(err, WorldsError::Configuration(_)));
    }

    #[test]
    fn validate_catches_layout_problems() {
        let mut config = WorldsConfig::default();
        config.layout.band_count = 0;
        assert!(matches!(
            config.validate(),
            Err(WorldsError::InvalidLayoutParameter {
                name: "band_count",
                ..
            })
        ));
    }
}
