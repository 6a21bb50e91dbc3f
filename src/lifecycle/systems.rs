use bevy::prelude::*;

use crate::flight::controller::FlightController;
use crate::interaction::Grabbable;
use crate::lifecycle::grab::*;
use crate::timers::{TimerAction, TimerElapsed, TimerRegistry};

pub fn observe_hold_state(
    mut timers: ResMut<TimerRegistry>,
    mut planes: Query<(Entity, &Grabbable, &mut GrabLifecycle, &mut FlightController)>,
    mut grabbed_events: EventWriter<PlaneGrabbed>,
    mut released_events: EventWriter<PlaneReleased>,
) {
    for (plane, grabbable, mut lifecycle, mut controller) in planes.iter_mut() {
        match lifecycle.observe(grabbable.selecting_points()) {
            Some(HoldEdge::Grabbed) => {
                controller.disable_flight();
                if let Some(handle) = lifecycle.take_despawn_timer() {
                    timers.cancel(handle);
                    debug!("Canceled despawn countdown of {:?}", plane);
                }
                info!("✋ Plane {:?} grabbed", plane);
                grabbed_events.write(PlaneGrabbed { plane });
            }
            Some(HoldEdge::Released) => {
                controller.enable_flight();
                if let Some(stale) = lifecycle.take_despawn_timer() {
                    timers.cancel(stale);
                }
                let handle =
                    timers.schedule(lifecycle.despawn_after_secs, TimerAction::Despawn(plane));
                lifecycle.arm_despawn(handle);
                info!(
                    "🛩️ Plane {:?} released, despawning in {:.1}s unless caught",
                    plane, lifecycle.despawn_after_secs
                );
                released_events.write(PlaneReleased { plane });
            }
            None => {}
        }
    }
}

pub fn despawn_expired_planes(
    mut commands: Commands,
    mut elapsed_events: EventReader<TimerElapsed>,
    planes: Query<&GrabLifecycle>,
    mut despawned_events: EventWriter<PlaneDespawned>,
) {
    for elapsed in elapsed_events.read() {
        let TimerAction::Despawn(plane) = elapsed.action else {
            continue;
        };

        let Ok(lifecycle) = planes.get(plane) else {
            debug!("Despawn timer fired for {:?}, which no longer exists", plane);
            continue;
        };
        if !lifecycle.should_despawn(elapsed.handle) {
            continue;
        }

        info!(
            "🗑️ Plane {:?} despawned after {:.1}s in flight",
            plane, lifecycle.despawn_after_secs
        );
        commands.entity(plane).despawn();
        despawned_events.write(PlaneDespawned { plane });
    }
}
