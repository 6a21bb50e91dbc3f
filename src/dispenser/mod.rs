pub mod components;
pub mod systems;

use bevy::prelude::*;
use components::*;
use systems::*;

use crate::PaperPlaneSet;

pub use components::{PaperPlane, PlaneDispenser, PlaneTemplate, PlaneVisual};

/// Spawning and respawning of planes. Draws noise seeds from the `FlightRng`
/// resource that `FlightPlugin` sets up.
pub struct DispenserPlugin;

impl Plugin for DispenserPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlaneDispenser>()
            .register_type::<PaperPlane>()
            .register_type::<NotifyGrab>()
            .add_event::<RespawnRequested>()
            .add_event::<PlaneSpawned>()
            .add_systems(
                Update,
                (
                    setup_new_dispensers,
                    notify_dispenser_on_grab,
                    schedule_respawns,
                    handle_dispenser_timers,
                )
                    .chain()
                    .in_set(PaperPlaneSet::Dispense),
            );
    }
}
