use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::dispenser::{PlaneDispenser, PlaneTemplate};
use crate::flight::FlightParameters;
use crate::flight::parameters::FlightParameterError;
use crate::flight::resources::FlightRng;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid flight parameters: {0}")]
    InvalidFlight(#[from] FlightParameterError),
    #[error("{name} must be a finite, non-negative number of seconds, got {value}")]
    InvalidDuration { name: &'static str, value: f32 },
    #[error("plane {name} must be positive, got {value}")]
    InvalidPlane { name: &'static str, value: f32 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub despawn_after_secs: f32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            despawn_after_secs: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispenserConfig {
    pub spawn_position: [f32; 3],
    /// Yaw of the spawned plane, in degrees.
    pub spawn_yaw_deg: f32,
    pub respawn_delay: f32,
    pub enable_grab_after: f32,
    pub ignore_dispenser_collision_for: f32,
    pub plane_half_extents: [f32; 3],
    pub plane_mass: f32,
}

impl Default for DispenserConfig {
    fn default() -> Self {
        Self {
            spawn_position: [0.0, 1.2, -0.5],
            spawn_yaw_deg: 0.0,
            respawn_delay: 2.0,
            enable_grab_after: 0.15,
            ignore_dispenser_collision_for: 0.2,
            plane_half_extents: [0.12, 0.02, 0.18],
            plane_mass: 1.0,
        }
    }
}

/// Everything a host can tune from a TOML file. Missing tables and keys keep
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaperPlaneConfig {
    /// Fixes the noise seeds handed to new planes. Random when absent.
    pub seed: Option<u64>,
    pub flight: FlightParameters,
    pub lifecycle: LifecycleConfig,
    pub dispenser: DispenserConfig,
}

impl PaperPlaneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flight.validate()?;

        let durations = [
            ("lifecycle.despawn_after_secs", self.lifecycle.despawn_after_secs),
            ("dispenser.respawn_delay", self.dispenser.respawn_delay),
            ("dispenser.enable_grab_after", self.dispenser.enable_grab_after),
            (
                "dispenser.ignore_dispenser_collision_for",
                self.dispenser.ignore_dispenser_collision_for,
            ),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { name, value });
            }
        }

        if self.dispenser.plane_mass.is_nan() || self.dispenser.plane_mass <= 0.0 {
            return Err(ConfigError::InvalidPlane {
                name: "mass",
                value: self.dispenser.plane_mass,
            });
        }
        for value in self.dispenser.plane_half_extents {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::InvalidPlane {
                    name: "half extent",
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn rng(&self) -> FlightRng {
        FlightRng::from_seed_option(self.seed)
    }

    pub fn plane_template(&self) -> PlaneTemplate {
        PlaneTemplate {
            flight: self.flight.clone(),
            despawn_after_secs: self.lifecycle.despawn_after_secs,
            half_extents: Vec3::from_array(self.dispenser.plane_half_extents),
            mass: self.dispenser.plane_mass,
        }
    }

    pub fn dispenser(&self) -> PlaneDispenser {
        let settings = &self.dispenser;
        let spawn_point = Transform::from_translation(Vec3::from_array(settings.spawn_position))
            .with_rotation(Quat::from_rotation_y(settings.spawn_yaw_deg.to_radians()));
        PlaneDispenser {
            respawn_delay: settings.respawn_delay,
            enable_grab_after: settings.enable_grab_after,
            ignore_dispenser_collision_for: settings.ignore_dispenser_collision_for,
            template: self.plane_template(),
            ..PlaneDispenser::new(spawn_point)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: PaperPlaneConfig = toml::from_str("").unwrap();
        assert!(config.seed.is_none());
        assert_eq!(config.flight, FlightParameters::default());
        assert_eq!(config.lifecycle.despawn_after_secs, 100.0);
        assert!(config.validate().is_ok());

        let dispenser = config.dispenser();
        assert_eq!(dispenser.respawn_delay, 2.0);
        assert_eq!(dispenser.enable_grab_after, 0.15);
        assert_eq!(dispenser.ignore_dispenser_collision_for, 0.2);
        assert!(dispenser.template.is_spawnable());
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config: PaperPlaneConfig = toml::from_str(
            r#"
            seed = 7

            [flight]
            stability = 3.0
            max_bank_deg = 25.0

            [dispenser]
            respawn_delay = 0.5
            spawn_position = [1.0, 1.5, 0.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.flight.stability, 3.0);
        assert_eq!(config.flight.max_bank_deg, 25.0);
        assert_eq!(config.flight.lift_power, FlightParameters::default().lift_power);

        let dispenser = config.dispenser();
        assert_eq!(dispenser.respawn_delay, 0.5);
        assert_eq!(dispenser.enable_grab_after, 0.15);
        assert_eq!(dispenser.spawn_point.translation, Vec3::new(1.0, 1.5, 0.0));
        assert_eq!(dispenser.template.flight.stability, 3.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let config: PaperPlaneConfig = toml::from_str("[flight]\ngravity_comp = 2.0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFlight(FlightParameterError::GravityCompOutOfRange(_)))
        ));

        let config: PaperPlaneConfig =
            toml::from_str("[dispenser]\nrespawn_delay = -1.0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration {
                name: "dispenser.respawn_delay",
                ..
            })
        ));

        let config: PaperPlaneConfig = toml::from_str("[dispenser]\nplane_mass = 0.0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPlane { .. })));

        let config = PaperPlaneConfig {
            dispenser: DispenserConfig {
                plane_mass: f32::NAN,
                ..default()
            },
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlane { name: "mass", .. })
        ));

        let config = PaperPlaneConfig {
            dispenser: DispenserConfig {
                plane_half_extents: [0.1, f32::NAN, 0.1],
                ..default()
            },
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlane { name: "half extent", .. })
        ));
    }

    #[test]
    fn test_load_reports_missing_file_and_bad_syntax() {
        let missing = std::env::temp_dir().join("paper-plane-flight-missing.toml");
        assert!(matches!(
            PaperPlaneConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = std::env::temp_dir().join(format!(
            "paper-plane-flight-broken-{}.toml",
            std::process::id()
        ));
        std::fs::write(&broken, "[flight\nstability = ").unwrap();
        let result = PaperPlaneConfig::load(&broken);
        std::fs::remove_file(&broken).unwrap();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_seed_makes_rng_reproducible() {
        use rand::Rng;

        let config = PaperPlaneConfig {
            seed: Some(99),
            ..default()
        };
        let a: u64 = config.rng().0.random();
        let b: u64 = config.rng().0.random();
        assert_eq!(a, b);
    }
}
