use bevy::prelude::*;
use rand::Rng;

use super::aerodynamics::{FlightForces, FlightOutput};
use super::noise::NoiseSeeds;
use super::parameters::FlightParameters;

/// Flight gate and tuning for one plane.
///
/// Starts disabled: a freshly spawned plane only flies after it has been
/// picked up and let go.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct FlightController {
    params: FlightParameters,
    seeds: NoiseSeeds,
    flight_enabled: bool,
}

impl FlightController {
    pub fn new(params: FlightParameters, rng: &mut impl Rng) -> Self {
        Self::with_seeds(params, NoiseSeeds::from_rng(rng))
    }

    pub fn with_seeds(params: FlightParameters, seeds: NoiseSeeds) -> Self {
        Self {
            params,
            seeds,
            flight_enabled: false,
        }
    }

    pub fn enable_flight(&mut self) {
        self.flight_enabled = true;
    }

    pub fn disable_flight(&mut self) {
        self.flight_enabled = false;
    }

    pub fn is_flight_enabled(&self) -> bool {
        self.flight_enabled
    }

    pub fn params(&self) -> &FlightParameters {
        &self.params
    }

    pub fn seeds(&self) -> &NoiseSeeds {
        &self.seeds
    }
}

/// Last step of the flight model, kept for the inspector and debug gizmos.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FlightTelemetry {
    pub speed: f32,
    pub forces: FlightForces,
    pub bank_angle: f32,
}

impl FlightTelemetry {
    pub fn record(&mut self, speed: f32, output: &FlightOutput) {
        self.speed = speed;
        self.forces = output.forces;
        self.bank_angle = output.bank_angle;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
