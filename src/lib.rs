//! Paper planes that glide, wobble and drift on a rapier rigid body, handed
//! out one at a time by dispensers.
//!
//! Add [`PaperPlanePlugin`] next to rapier, spawn a [`PlaneDispenser`] and
//! drive [`Grabbable`] from your own input or XR layer.

pub mod config;
pub mod dispenser;
pub mod flight;
pub mod interaction;
pub mod lifecycle;
pub mod timers;

use bevy::prelude::*;

pub use config::{ConfigError, PaperPlaneConfig};
pub use dispenser::{DispenserPlugin, PaperPlane, PlaneDispenser, PlaneTemplate, PlaneVisual};
pub use flight::controller::{FlightController, FlightTelemetry};
pub use flight::resources::{FlightEnvironment, FlightRng};
pub use flight::{FlightParameters, FlightPlugin};
pub use interaction::Grabbable;
pub use lifecycle::{GrabLifecycle, LifecyclePlugin};
pub use timers::{TimerPlugin, TimerRegistry};

/// Frame-rate work, in this order: fired timers, hold edges, dispensers.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaperPlaneSet {
    Timers,
    Hold,
    Dispense,
}

pub struct PaperPlanePlugin;

impl Plugin for PaperPlanePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Grabbable>().add_plugins((
            TimerPlugin,
            FlightPlugin,
            LifecyclePlugin,
            DispenserPlugin,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_plugin_provides_rng_for_dispensers() {
        let mut app = App::new();
        app.init_resource::<Time>().add_plugins(PaperPlanePlugin);
        assert!(app.world().contains_resource::<FlightRng>());

        let dispenser = app.world_mut().spawn(PlaneDispenser::default()).id();
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(0.02));
        app.update();

        let live_plane = app
            .world()
            .get::<PlaneDispenser>(dispenser)
            .and_then(PlaneDispenser::live_plane);
        assert!(live_plane.is_some());
    }
}
