use bevy::prelude::*;
use paper_plane_flight::{FlightTelemetry, PaperPlane, PlaneVisual};

pub struct DebugRenderPlugin;

impl Plugin for DebugRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_coordinate_system, setup_plane_visual))
            .add_systems(Update, draw_flight_forces);
    }
}

fn setup_plane_visual(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(PlaneVisual {
        mesh: meshes.add(Cuboid::new(0.24, 0.04, 0.36)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.95, 0.95, 0.92),
            perceptual_roughness: 0.9,
            ..default()
        }),
    });
}

fn spawn_coordinate_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // X axis (red)
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.0, 0.01, 0.01))),
        MeshMaterial3d(materials.add(Color::srgb(1.0, 0.0, 0.0))),
        Transform::from_xyz(0.5, 0.005, 0.0),
    ));

    // Y axis (green)
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.01, 1.0, 0.01))),
        MeshMaterial3d(materials.add(Color::srgb(0.0, 1.0, 0.0))),
        Transform::from_xyz(0.0, 0.5, 0.0),
    ));

    // Z axis (blue)
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.01, 0.01, 1.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.0, 0.0, 1.0))),
        Transform::from_xyz(0.0, 0.005, 0.5),
    ));
}

/// Heading scaled by speed (white), lift (green) and drag (red) of every flying plane.
fn draw_flight_forces(
    mut gizmos: Gizmos,
    planes: Query<(&GlobalTransform, &FlightTelemetry), With<PaperPlane>>,
) {
    const FORCE_SCALE: f32 = 0.05;

    for (transform, telemetry) in planes.iter() {
        if telemetry.speed <= 0.0 {
            continue;
        }
        let origin = transform.translation();
        let heading = transform.forward();

        gizmos.arrow(origin, origin + heading * telemetry.speed * 0.1, Color::WHITE);
        gizmos.arrow(
            origin,
            origin + telemetry.forces.lift * FORCE_SCALE,
            Color::srgb(0.2, 0.9, 0.2),
        );
        gizmos.arrow(
            origin,
            origin + telemetry.forces.drag * FORCE_SCALE,
            Color::srgb(0.9, 0.2, 0.2),
        );
    }
}
