use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Tuning for one paper plane. Set when the plane is spawned and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Reflect, Deserialize)]
#[serde(default)]
pub struct FlightParameters {
    // Forces (paper feel)
    pub lift_power: f32,      // lift ~ speed^2
    pub drag_power: f32,      // higher = slows down faster
    pub side_drag_power: f32, // higher = less slip

    // Stall / lift limits
    pub stall_speed: f32, // higher = less lift at low speed
    pub max_lift: f32,

    // Keep flying (but not climbing forever)
    pub gravity_comp: f32, // 0.0 ..= 1.2
    pub gravity_comp_speed: f32,
    pub cruise_push: f32,
    pub slow_cruise_boost: f32,
    pub slow_speed: f32,

    // Climb damper
    pub climb_damp: f32,
    pub climb_deadzone: f32,

    // Wobble
    pub flutter_strength: f32,
    pub flutter_frequency: f32,
    pub flutter_min_speed: f32,

    // Turns / weave
    pub turn_strength: f32,
    pub turn_frequency: f32, // slower = wider arcs
    pub turn_min_speed: f32,
    pub max_bank_deg: f32,

    // Rotation follow
    pub stability: f32, // lower = looser
    pub max_angular_speed: f32,
}

impl Default for FlightParameters {
    fn default() -> Self {
        Self {
            lift_power: 10.0,
            drag_power: 10.0052,
            side_drag_power: 10.10,
            stall_speed: 10.35,
            max_lift: 16.5,
            gravity_comp: 0.40,
            gravity_comp_speed: 0.9,
            cruise_push: 0.035,
            slow_cruise_boost: 0.06,
            slow_speed: 0.7,
            climb_damp: 0.9,
            climb_deadzone: 0.15,
            flutter_strength: 0.14,
            flutter_frequency: 1.1,
            flutter_min_speed: 0.9,
            turn_strength: 0.28,
            turn_frequency: 0.45,
            turn_min_speed: 0.9,
            max_bank_deg: 18.0,
            stability: 1.7,
            max_angular_speed: 5.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FlightParameterError {
    #[error("flight parameter `{0}` is not a finite number")]
    NotFinite(&'static str),
    #[error("flight parameter `{name}` must not be negative (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("flight parameter `{name}` must be greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("gravity_comp must be within 0.0..=1.2 (got {0})")]
    GravityCompOutOfRange(f32),
}

impl FlightParameters {
    pub const MAX_GRAVITY_COMP: f32 = 1.2;

    fn named_values(&self) -> [(&'static str, f32); 21] {
        [
            ("lift_power", self.lift_power),
            ("drag_power", self.drag_power),
            ("side_drag_power", self.side_drag_power),
            ("stall_speed", self.stall_speed),
            ("max_lift", self.max_lift),
            ("gravity_comp", self.gravity_comp),
            ("gravity_comp_speed", self.gravity_comp_speed),
            ("cruise_push", self.cruise_push),
            ("slow_cruise_boost", self.slow_cruise_boost),
            ("slow_speed", self.slow_speed),
            ("climb_damp", self.climb_damp),
            ("climb_deadzone", self.climb_deadzone),
            ("flutter_strength", self.flutter_strength),
            ("flutter_frequency", self.flutter_frequency),
            ("flutter_min_speed", self.flutter_min_speed),
            ("turn_strength", self.turn_strength),
            ("turn_frequency", self.turn_frequency),
            ("turn_min_speed", self.turn_min_speed),
            ("max_bank_deg", self.max_bank_deg),
            ("stability", self.stability),
            ("max_angular_speed", self.max_angular_speed),
        ]
    }

    /// Rejects values that would make the flight model misbehave.
    ///
    /// A non-positive `stall_speed` is accepted: the plane is then treated as
    /// permanently stalled and produces no lift.
    pub fn validate(&self) -> Result<(), FlightParameterError> {
        for (name, value) in self.named_values() {
            if !value.is_finite() {
                return Err(FlightParameterError::NotFinite(name));
            }
            if name != "stall_speed" && value < 0.0 {
                return Err(FlightParameterError::Negative { name, value });
            }
        }

        if self.gravity_comp > Self::MAX_GRAVITY_COMP {
            return Err(FlightParameterError::GravityCompOutOfRange(self.gravity_comp));
        }
        if self.stability <= 0.0 {
            return Err(FlightParameterError::NotPositive {
                name: "stability",
                value: self.stability,
            });
        }
        if self.max_angular_speed <= 0.0 {
            return Err(FlightParameterError::NotPositive {
                name: "max_angular_speed",
                value: self.max_angular_speed,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_are_valid() {
        assert_eq!(FlightParameters::default().validate(), Ok(()));
    }

    #[test]
    fn test_non_positive_stall_speed_is_allowed() {
        let params = FlightParameters {
            stall_speed: 0.0,
            ..default()
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_nan() {
        let params = FlightParameters {
            lift_power: f32::NAN,
            ..default()
        };
        assert_eq!(
            params.validate(),
            Err(FlightParameterError::NotFinite("lift_power"))
        );
    }

    #[test]
    fn test_rejects_negative_drag() {
        let params = FlightParameters {
            drag_power: -1.0,
            ..default()
        };
        assert!(matches!(
            params.validate(),
            Err(FlightParameterError::Negative { name: "drag_power", .. })
        ));
    }

    #[test]
    fn test_rejects_gravity_comp_above_range() {
        let params = FlightParameters {
            gravity_comp: 1.5,
            ..default()
        };
        assert_eq!(
            params.validate(),
            Err(FlightParameterError::GravityCompOutOfRange(1.5))
        );
    }

    #[test]
    fn test_rejects_zero_stability() {
        let params = FlightParameters {
            stability: 0.0,
            ..default()
        };
        assert!(matches!(
            params.validate(),
            Err(FlightParameterError::NotPositive { name: "stability", .. })
        ));
    }
}
