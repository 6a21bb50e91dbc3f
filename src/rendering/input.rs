use bevy::prelude::*;
use bevy_rapier3d::prelude::{RigidBody, Velocity};
use paper_plane_flight::{Grabbable, PaperPlane, PaperPlaneSet};

use super::camera::HandCamera;

/// Keyboard stand-in for a grab/interaction host: hold Space to pick up the
/// nearest plane, let go to throw it.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Hand>().add_systems(
            Update,
            (grab_with_keyboard, carry_held_plane)
                .chain()
                .before(PaperPlaneSet::Timers),
        );
    }
}

#[derive(Resource)]
pub struct Hand {
    pub held: Option<Entity>,
    pub reach: f32,
    pub throw_speed: f32,
    /// Where a held plane sits, in camera space.
    pub hold_offset: Vec3,
}

impl Default for Hand {
    fn default() -> Self {
        Self {
            held: None,
            reach: 2.5,
            throw_speed: 4.0,
            hold_offset: Vec3::new(0.15, -0.25, -0.5),
        }
    }
}

fn grab_with_keyboard(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut hand: ResMut<Hand>,
    camera: Query<&Transform, With<HandCamera>>,
    mut planes: Query<(Entity, &Transform, &mut Grabbable, &mut Velocity), With<PaperPlane>>,
) {
    let Ok(camera) = camera.single() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Space) && hand.held.is_none() {
        let nearest = planes
            .iter()
            .map(|(entity, transform, ..)| {
                (entity, transform.translation.distance(camera.translation))
            })
            .filter(|(_, distance)| *distance <= hand.reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, _)| entity);

        if let Some(plane) = nearest {
            if let Ok((_, _, mut grabbable, _)) = planes.get_mut(plane) {
                if grabbable.try_grab() {
                    info!("✋ Picked up {:?}", plane);
                    hand.held = Some(plane);
                    commands.entity(plane).insert(RigidBody::KinematicPositionBased);
                } else {
                    debug!("{:?} is not grabbable yet", plane);
                }
            }
        }
    }

    if keyboard.just_released(KeyCode::Space) {
        let Some(plane) = hand.held.take() else {
            return;
        };
        if let Ok((_, _, mut grabbable, mut velocity)) = planes.get_mut(plane) {
            grabbable.release_all();
            velocity.linvel = camera.forward() * hand.throw_speed;
            velocity.angvel = Vec3::ZERO;
            commands.entity(plane).insert(RigidBody::Dynamic);
            info!("🛫 Threw {:?} at {:.1} m/s", plane, hand.throw_speed);
        }
    }
}

fn carry_held_plane(
    mut hand: ResMut<Hand>,
    camera: Query<&Transform, (With<HandCamera>, Without<PaperPlane>)>,
    mut planes: Query<&mut Transform, With<PaperPlane>>,
) {
    let Some(plane) = hand.held else {
        return;
    };
    let Ok(camera) = camera.single() else {
        return;
    };
    let Ok(mut transform) = planes.get_mut(plane) else {
        // despawned while in hand
        hand.held = None;
        return;
    };

    transform.translation = camera.transform_point(hand.hold_offset);
    transform.rotation = camera.rotation;
}
