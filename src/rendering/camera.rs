use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, move_camera);
    }
}

/// The player's head. Held planes hang in front of it.
#[derive(Component)]
pub struct HandCamera {
    pub move_speed: f32,
    pub turn_speed: f32,
}

fn spawn_camera(mut commands: Commands) {
    // Standing height, a step back from the dispenser
    commands.spawn((
        Name::new("HandCamera"),
        Camera3d::default(),
        HandCamera {
            move_speed: 3.0,
            turn_speed: 1.5,
        },
        Transform::from_xyz(0.0, 1.6, 1.5).looking_at(Vec3::new(0.0, 1.2, -0.5), Vec3::Y),
    ));
}

fn move_camera(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&mut Transform, &HandCamera)>,
    time: Res<Time>,
) {
    for (mut transform, camera) in query.iter_mut() {
        let mut movement = Vec3::ZERO;
        let forward = transform.forward().with_y(0.0).normalize_or_zero();
        let right = transform.right().with_y(0.0).normalize_or_zero();

        if keyboard.pressed(KeyCode::KeyW) {
            movement += forward;
        }
        if keyboard.pressed(KeyCode::KeyS) {
            movement -= forward;
        }
        if keyboard.pressed(KeyCode::KeyD) {
            movement += right;
        }
        if keyboard.pressed(KeyCode::KeyA) {
            movement -= right;
        }

        if movement != Vec3::ZERO {
            transform.translation += movement.normalize() * camera.move_speed * time.delta_secs();
        }

        let mut yaw = 0.0;
        if keyboard.pressed(KeyCode::ArrowLeft) {
            yaw += 1.0;
        }
        if keyboard.pressed(KeyCode::ArrowRight) {
            yaw -= 1.0;
        }
        if yaw != 0.0 {
            transform.rotate_y(yaw * camera.turn_speed * time.delta_secs());
        }

        let mut pitch = 0.0;
        if keyboard.pressed(KeyCode::ArrowUp) {
            pitch += 1.0;
        }
        if keyboard.pressed(KeyCode::ArrowDown) {
            pitch -= 1.0;
        }
        if pitch != 0.0 {
            transform.rotate_local_x(pitch * camera.turn_speed * time.delta_secs());
        }
    }
}
