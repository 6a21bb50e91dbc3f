pub mod aerodynamics;
pub mod controller;
pub mod noise;
pub mod parameters;
pub mod resources;
pub mod systems;

use bevy::prelude::*;
use controller::*;
use resources::*;
use systems::*;

pub use self::noise::{FlightNoise, NoiseSeeds};
pub use parameters::FlightParameters;

pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightEnvironment>()
            .init_resource::<FlightNoise>()
            .init_resource::<FlightRng>()
            .register_type::<FlightController>()
            .register_type::<FlightTelemetry>()
            .register_type::<FlightEnvironment>()
            .add_systems(FixedUpdate, apply_aerodynamics);
    }
}
