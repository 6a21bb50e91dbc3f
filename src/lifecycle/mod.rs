pub mod grab;
pub mod systems;

use bevy::prelude::*;
use grab::*;
use systems::*;

use crate::PaperPlaneSet;

pub use grab::{FlightPhase, GrabLifecycle, HoldEdge};

pub struct LifecyclePlugin;

impl Plugin for LifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GrabLifecycle>()
            .add_event::<PlaneGrabbed>()
            .add_event::<PlaneReleased>()
            .add_event::<PlaneDespawned>()
            .add_systems(
                Update,
                (observe_hold_state, despawn_expired_planes)
                    .chain()
                    .in_set(PaperPlaneSet::Hold),
            );
    }
}
