use std::path::Path;

use cgmath::{Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, ConfigResult},
    vr_config::TeleportButton,
    world::MAX_ARC_STEPS,
};

/// A single `(speed, radius)` key of the blinker curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub speed: f32,
    pub radius: f32,
}

/// Mesh and material used for each teleport arch segment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchSegmentAsset {
    pub mesh: String,
    pub material: String,
}

/// Per-session tunables for teleporting, climbing and the blinker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// How far ahead, in seconds, the teleport arc is simulated
    pub simulation_time: f32,
    /// Arc samples per simulated second
    pub simulation_frequency: f32,
    pub gravity: f32,
    /// Half-extents of the box searched for a walkable surface around the arc hit
    pub nav_extent: Vector3<f32>,
    pub fade_duration: f32,

    pub blinker_material: Option<String>,
    pub blinker_curve: Option<Vec<CurveKey>>,
    /// Applied to body speed before the curve lookup
    pub blinker_speed_scale: f32,
    pub blinker_initial_radius: f32,
    pub blinker_projection_distance: f32,

    pub hand_class: Option<String>,
    pub haptic_effect: Option<String>,
    pub arch_segment: Option<ArchSegmentAsset>,

    pub teleport_button: TeleportButton,
    pub trigger_threshold: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        LocomotionConfig {
            projectile_speed: 800.0,
            projectile_radius: 10.0,
            simulation_time: 1.0,
            simulation_frequency: 15.0,
            gravity: 980.0,
            nav_extent: vec3(100.0, 100.0, 100.0),
            fade_duration: 1.0,

            blinker_material: None,
            blinker_curve: None,
            blinker_speed_scale: 0.01,
            blinker_initial_radius: 2.0,
            blinker_projection_distance: 1000.0,

            hand_class: None,
            haptic_effect: None,
            arch_segment: None,

            teleport_button: TeleportButton::Trigger,
            trigger_threshold: 0.5,
        }
    }
}

impl LocomotionConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: LocomotionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        non_negative("projectile_speed", self.projectile_speed)?;
        non_negative("projectile_radius", self.projectile_radius)?;
        non_negative("simulation_time", self.simulation_time)?;
        non_negative("gravity", self.gravity)?;
        non_negative("fade_duration", self.fade_duration)?;
        non_negative("blinker_speed_scale", self.blinker_speed_scale)?;
        non_negative("blinker_projection_distance", self.blinker_projection_distance)?;
        non_negative("nav_extent.x", self.nav_extent.x)?;
        non_negative("nav_extent.y", self.nav_extent.y)?;
        non_negative("nav_extent.z", self.nav_extent.z)?;

        if !self.simulation_frequency.is_finite() || self.simulation_frequency <= 0.0 {
            return Err(ConfigError::Validation {
                field: "simulation_frequency",
                reason: format!("must be positive, got {}", self.simulation_frequency),
            });
        }

        let steps = self.simulation_time * self.simulation_frequency;
        if steps > MAX_ARC_STEPS as f32 {
            return Err(ConfigError::Validation {
                field: "simulation_time",
                reason: format!(
                    "arc would need {} samples, at most {} are allowed",
                    steps, MAX_ARC_STEPS
                ),
            });
        }

        if let Some(keys) = &self.blinker_curve {
            if keys.is_empty() {
                return Err(ConfigError::Validation {
                    field: "blinker_curve",
                    reason: "curve needs at least one key".to_string(),
                });
            }
            if keys.iter().any(|k| !k.speed.is_finite() || !k.radius.is_finite()) {
                return Err(ConfigError::Validation {
                    field: "blinker_curve",
                    reason: "keys must be finite".to_string(),
                });
            }
            if keys.windows(2).any(|pair| pair[1].speed < pair[0].speed) {
                return Err(ConfigError::Validation {
                    field: "blinker_curve",
                    reason: "keys must be sorted by speed".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field,
            reason: format!("must be a finite, non-negative number, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LocomotionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LocomotionConfig::from_json(
            r#"{ "projectile_speed": 1200.0, "nav_extent": { "x": 50.0, "y": 200.0, "z": 50.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.projectile_speed, 1200.0);
        assert_eq!(config.nav_extent, vec3(50.0, 200.0, 50.0));
        assert_eq!(config.fade_duration, 1.0);
        assert!(config.hand_class.is_none());
    }

    #[test]
    fn test_full_json() {
        let config = LocomotionConfig::from_json(
            r#"{
                "hand_class": "BP_HandController",
                "haptic_effect": "ClimbPulse",
                "teleport_button": "Squeeze",
                "blinker_material": "M_Blinker",
                "blinker_curve": [ { "speed": 0.0, "radius": 1.0 }, { "speed": 6.0, "radius": 0.3 } ],
                "arch_segment": { "mesh": "SM_Arch", "material": "M_Arch" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.teleport_button, TeleportButton::Squeeze);
        assert_eq!(config.blinker_curve.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.arch_segment.unwrap().mesh, "SM_Arch");
    }

    #[test]
    fn test_rejects_negative_speed() {
        let err = LocomotionConfig::from_json(r#"{ "projectile_speed": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation {
                field: "projectile_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unsorted_curve() {
        let err = LocomotionConfig::from_json(
            r#"{ "blinker_curve": [ { "speed": 5.0, "radius": 1.0 }, { "speed": 1.0, "radius": 0.5 } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("blinker_curve"));
    }

    #[test]
    fn test_rejects_zero_frequency() {
        let config = LocomotionConfig {
            simulation_frequency: 0.0,
            ..LocomotionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unbounded_arc_horizon() {
        let err = LocomotionConfig::from_json(r#"{ "simulation_time": 3.0e38 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation {
                field: "simulation_time",
                ..
            }
        ));

        let config = LocomotionConfig {
            simulation_time: 500.0,
            simulation_frequency: 15.0,
            ..LocomotionConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = LocomotionConfig {
            simulation_time: 500.0,
            simulation_frequency: 60.0,
            ..LocomotionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = LocomotionConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
