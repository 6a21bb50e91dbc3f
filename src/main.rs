mod rendering;

use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use bevy_rapier3d::prelude::*;
use paper_plane_flight::{PaperPlaneConfig, PaperPlanePlugin};
use rendering::CameraPlugin;
use rendering::DebugRenderPlugin;
use rendering::InputPlugin;

const DEFAULT_CONFIG_PATH: &str = "paper_plane.toml";

fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(EguiPlugin { enable_multipass_for_primary_context: true })
        .add_plugins(WorldInspectorPlugin::new())
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(PaperPlanePlugin)
        .add_plugins(DebugRenderPlugin)
        .add_plugins(CameraPlugin)
        .add_plugins(InputPlugin)
        .insert_resource(ConfigPath(config_path))
        .add_systems(Startup, setup_scene)
        .run();
}

#[derive(Resource)]
struct ConfigPath(String);

fn load_config(path: &str) -> PaperPlaneConfig {
    match PaperPlaneConfig::load(path) {
        Ok(config) => {
            info!("📄 Loaded paper plane config from {}", path);
            config
        }
        Err(err) => {
            warn!("⚠️ {}, falling back to default paper plane settings", err);
            PaperPlaneConfig::default()
        }
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config_path: Res<ConfigPath>,
) {
    let config = load_config(&config_path.0);
    match config.seed {
        Some(seed) => info!("🎲 Flight noise seeded with {}", seed),
        None => info!("🎲 Flight noise seeded from the OS"),
    }
    commands.insert_resource(config.rng());

    // Ground
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Cuboid::new(40.0, 0.2, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.5, 0.3))),
        Transform::from_xyz(0.0, -0.1, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(20.0, 0.1, 20.0),
    ));

    // Dispenser stand, its top just under the spawn point
    let dispenser = config.dispenser();
    let spawn = dispenser.spawn_point.translation;
    let stand_half_height = ((spawn.y - 0.1) * 0.5).max(0.05);
    commands.spawn((
        Name::new("Dispenser"),
        Mesh3d(meshes.add(Cuboid::new(0.6, stand_half_height * 2.0, 0.6))),
        MeshMaterial3d(materials.add(Color::srgb(0.55, 0.4, 0.25))),
        Transform::from_xyz(spawn.x, stand_half_height, spawn.z),
        RigidBody::Fixed,
        Collider::cuboid(0.3, stand_half_height, 0.3),
        dispenser,
    ));

    // Spawn directional light
    let light_pos = Vec3::new(4.0, 10.0, 2.0);
    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: 15000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(light_pos).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
