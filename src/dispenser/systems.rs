use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    Collider, ColliderMassProperties, CollisionGroups, ExternalForce, Group, ReadMassProperties,
    RigidBody, Velocity,
};

use crate::dispenser::components::*;
use crate::flight::controller::{FlightController, FlightTelemetry};
use crate::flight::resources::FlightRng;
use crate::interaction::Grabbable;
use crate::lifecycle::GrabLifecycle;
use crate::timers::{TimerAction, TimerElapsed, TimerRegistry};

/// Builds a plane at the dispenser's spawn point with both spawn guards armed.
fn spawn_plane(
    commands: &mut Commands,
    timers: &mut TimerRegistry,
    rng: &mut FlightRng,
    visual: Option<&PlaneVisual>,
    dispenser_entity: Entity,
    dispenser: &mut PlaneDispenser,
    quarantine: bool,
) -> Option<Entity> {
    let template = &dispenser.template;
    if !template.is_spawnable() {
        warn!(
            "❌ Dispenser {:?} has an unusable plane template \
             (half extents {:?}, mass {}), not spawning",
            dispenser_entity, template.half_extents, template.mass
        );
        return None;
    }

    let mut collision_groups = CollisionGroups::new(PLANE_GROUP, Group::ALL);
    if quarantine {
        collision_groups.filters = Group::ALL.difference(DISPENSER_GROUP);
    }

    let extents = template.half_extents;
    let plane = commands
        .spawn((
            Name::new(format!("PaperPlane_{}", dispenser.spawned_count())),
            PaperPlane {
                dispenser: Some(dispenser_entity),
            },
            dispenser.spawn_point,
            (
                RigidBody::Dynamic,
                Collider::cuboid(extents.x, extents.y, extents.z),
                ColliderMassProperties::Mass(template.mass),
                collision_groups,
                Velocity::zero(),
                ExternalForce::default(),
                ReadMassProperties::default(),
            ),
            Grabbable::disabled(),
            FlightController::new(template.flight.clone(), &mut rng.0),
            FlightTelemetry::default(),
            GrabLifecycle::new(template.despawn_after_secs),
            NotifyGrab::new(dispenser_entity),
        ))
        .id();

    if let Some(visual) = visual {
        commands.entity(plane).insert((
            Mesh3d(visual.mesh.clone()),
            MeshMaterial3d(visual.material.clone()),
        ));
    }

    timers.schedule(dispenser.enable_grab_after, TimerAction::EnableGrab(plane));
    if quarantine {
        timers.schedule(
            dispenser.ignore_dispenser_collision_for,
            TimerAction::LiftQuarantine {
                plane,
                dispenser: dispenser_entity,
            },
        );
    }

    let count = dispenser.record_spawn(plane);
    info!("📦 Dispenser {:?} spawned plane #{} ({:?})", dispenser_entity, count, plane);
    Some(plane)
}

/// Adds the dispenser membership to whatever groups the host already set.
fn dispenser_collision_groups(existing: Option<CollisionGroups>) -> CollisionGroups {
    match existing {
        Some(mut groups) => {
            groups.memberships |= DISPENSER_GROUP;
            groups
        }
        None => CollisionGroups::new(DISPENSER_GROUP, Group::ALL),
    }
}

pub fn setup_new_dispensers(
    mut commands: Commands,
    mut timers: ResMut<TimerRegistry>,
    mut rng: ResMut<FlightRng>,
    visual: Option<Res<PlaneVisual>>,
    mut dispensers: Query<
        (Entity, &mut PlaneDispenser, Has<Collider>, Option<&CollisionGroups>),
        Added<PlaneDispenser>,
    >,
    mut spawned_events: EventWriter<PlaneSpawned>,
) {
    for (dispenser_entity, mut dispenser, has_collider, groups) in dispensers.iter_mut() {
        if has_collider {
            commands
                .entity(dispenser_entity)
                .insert(dispenser_collision_groups(groups.copied()));
        }

        if let Some(plane) = spawn_plane(
            &mut commands,
            &mut timers,
            &mut rng,
            visual.as_deref(),
            dispenser_entity,
            &mut dispenser,
            has_collider,
        ) {
            spawned_events.write(PlaneSpawned {
                plane,
                dispenser: dispenser_entity,
            });
        }
    }
}

pub fn notify_dispenser_on_grab(
    mut planes: Query<(&Grabbable, &mut NotifyGrab)>,
    mut requests: EventWriter<RespawnRequested>,
) {
    for (grabbable, mut notify) in planes.iter_mut() {
        if notify.observe(grabbable.is_held()) {
            requests.write(RespawnRequested {
                dispenser: notify.dispenser,
            });
        }
    }
}

pub fn schedule_respawns(
    mut requests: EventReader<RespawnRequested>,
    mut timers: ResMut<TimerRegistry>,
    mut dispensers: Query<&mut PlaneDispenser>,
) {
    for request in requests.read() {
        let Ok(mut dispenser) = dispensers.get_mut(request.dispenser) else {
            debug!("Respawn requested by {:?}, which no longer exists", request.dispenser);
            continue;
        };

        let scheduled = dispenser.request_respawn(|delay| {
            timers.schedule(delay, TimerAction::Respawn(request.dispenser))
        });
        match scheduled {
            Some(_) => info!(
                "🔁 Dispenser {:?} respawning in {:.2}s",
                request.dispenser, dispenser.respawn_delay
            ),
            None => debug!("Dispenser {:?} already respawning, request dropped", request.dispenser),
        }
    }
}

pub fn handle_dispenser_timers(
    mut commands: Commands,
    mut elapsed_events: EventReader<TimerElapsed>,
    mut timers: ResMut<TimerRegistry>,
    mut rng: ResMut<FlightRng>,
    visual: Option<Res<PlaneVisual>>,
    mut dispensers: Query<(&mut PlaneDispenser, Has<Collider>)>,
    mut grabbables: Query<&mut Grabbable>,
    mut plane_groups: Query<&mut CollisionGroups, With<PaperPlane>>,
    mut spawned_events: EventWriter<PlaneSpawned>,
) {
    for elapsed in elapsed_events.read() {
        match elapsed.action {
            TimerAction::EnableGrab(plane) => {
                if let Ok(mut grabbable) = grabbables.get_mut(plane) {
                    grabbable.enabled = true;
                    debug!("Grabbing enabled for {:?}", plane);
                } else {
                    debug!("Grab guard expired for {:?}, which no longer exists", plane);
                }
            }
            TimerAction::LiftQuarantine { plane, dispenser } => {
                // restored whether or not the dispenser is still around
                if let Ok(mut groups) = plane_groups.get_mut(plane) {
                    groups.filters = Group::ALL;
                    debug!("Dispenser collision restored for {:?}", plane);
                } else {
                    debug!("Quarantine expired for {:?}, which no longer exists", plane);
                }
                if !dispensers.contains(dispenser) {
                    debug!(
                        "Dispenser {:?} went away during the quarantine of {:?}",
                        dispenser, plane
                    );
                }
            }
            TimerAction::Respawn(dispenser_entity) => {
                let Ok((mut dispenser, has_collider)) = dispensers.get_mut(dispenser_entity) else {
                    debug!(
                        "Respawn timer fired for {:?}, which no longer exists",
                        dispenser_entity
                    );
                    continue;
                };
                if !dispenser.take_respawn(elapsed.handle) {
                    continue;
                }
                if let Some(plane) = spawn_plane(
                    &mut commands,
                    &mut timers,
                    &mut rng,
                    visual.as_deref(),
                    dispenser_entity,
                    &mut dispenser,
                    has_collider,
                ) {
                    spawned_events.write(PlaneSpawned {
                        plane,
                        dispenser: dispenser_entity,
                    });
                }
            }
            TimerAction::Despawn(_) => {}
        }
    }
}
