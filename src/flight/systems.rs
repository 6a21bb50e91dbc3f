use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalForce, ReadMassProperties, Velocity};

use super::aerodynamics::{FlightBody, FlightContext, apply_flight};
use super::controller::{FlightController, FlightTelemetry};
use super::noise::FlightNoise;
use super::resources::FlightEnvironment;

/// Rapier rigid body seen through the flight model's eyes.
///
/// Rapier keeps `ExternalForce` applied until it is changed, so the force is
/// reset at the start of every step and the model adds onto it.
struct RapierFlightBody<'a> {
    velocity: Mut<'a, Velocity>,
    external_force: Mut<'a, ExternalForce>,
    transform: Mut<'a, Transform>,
    mass: f32,
}

impl FlightBody for RapierFlightBody<'_> {
    fn linear_velocity(&self) -> Vec3 {
        self.velocity.linvel
    }

    fn angular_velocity(&self) -> Vec3 {
        self.velocity.angvel
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.velocity.angvel = angular_velocity;
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn move_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    fn add_force(&mut self, force: Vec3) {
        self.external_force.force += force;
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}

pub fn apply_aerodynamics(
    time: Res<Time>,
    environment: Res<FlightEnvironment>,
    noise: Res<FlightNoise>,
    mut planes: Query<(
        &FlightController,
        &mut Velocity,
        &mut ExternalForce,
        &mut Transform,
        Option<&ReadMassProperties>,
        Option<&mut FlightTelemetry>,
    )>,
) {
    let ctx = FlightContext {
        gravity: environment.gravity,
        time: time.elapsed_secs(),
        dt: time.delta_secs(),
    };

    for (controller, velocity, mut external_force, transform, mass_props, telemetry) in
        planes.iter_mut()
    {
        if !controller.is_flight_enabled() {
            if external_force.force != Vec3::ZERO || external_force.torque != Vec3::ZERO {
                *external_force = ExternalForce::default();
            }
            if let Some(mut telemetry) = telemetry {
                if telemetry.speed != 0.0 {
                    telemetry.clear();
                }
            }
            continue;
        }

        external_force.force = Vec3::ZERO;
        let speed = velocity.linvel.length();
        let mut body = RapierFlightBody {
            velocity,
            external_force,
            transform,
            mass: mass_props.map(|props| props.get().mass).unwrap_or(0.0),
        };

        let output = apply_flight(
            &mut body,
            controller.params(),
            controller.seeds(),
            &noise,
            &ctx,
        );

        if let Some(mut telemetry) = telemetry {
            telemetry.record(speed, &output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::noise::NoiseSeeds;
    use crate::flight::parameters::FlightParameters;
    use std::time::Duration;

    fn setup_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<FlightEnvironment>()
            .init_resource::<FlightNoise>()
            .add_systems(Update, apply_aerodynamics);
        app
    }

    fn step(app: &mut App, secs: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        app.update();
    }

    fn controller(enabled: bool) -> FlightController {
        let mut controller = FlightController::with_seeds(
            FlightParameters::default(),
            NoiseSeeds { flutter: 12.5, turn: 1234.5 },
        );
        if enabled {
            controller.enable_flight();
        }
        controller
    }

    #[test]
    fn test_enabled_plane_gets_lift_and_drag() {
        let mut app = setup_app();
        let plane = app
            .world_mut()
            .spawn((
                controller(true),
                Velocity::linear(Vec3::new(5.0, 0.0, 0.0)),
                ExternalForce::default(),
                Transform::default(),
                FlightTelemetry::default(),
            ))
            .id();

        step(&mut app, 1.0 / 64.0);

        let telemetry = app.world().get::<FlightTelemetry>(plane).unwrap();
        assert!(telemetry.forces.lift.y > 0.0);
        assert!(telemetry.forces.drag.x < 0.0);
        assert!((telemetry.speed - 5.0).abs() < 1e-4);

        let force = app.world().get::<ExternalForce>(plane).unwrap();
        assert!((force.force - telemetry.forces.total()).length() < 1e-4);

        let transform = app.world().get::<Transform>(plane).unwrap();
        assert_ne!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_force_does_not_accumulate_between_steps() {
        let mut app = setup_app();
        let plane = app
            .world_mut()
            .spawn((
                controller(true),
                Velocity::linear(Vec3::new(0.0, 0.0, -5.0)),
                ExternalForce::default(),
                Transform::default(),
            ))
            .id();

        step(&mut app, 1.0 / 64.0);
        let first = app.world().get::<ExternalForce>(plane).unwrap().force;
        step(&mut app, 1.0 / 64.0);
        let second = app.world().get::<ExternalForce>(plane).unwrap().force;

        // same velocity both steps, only the noise terms may differ slightly
        assert!((first - second).length() < 0.5);
        assert!(second.length() < first.length() * 1.5);
    }

    #[test]
    fn test_disabled_plane_has_force_cleared() {
        let mut app = setup_app();
        let plane = app
            .world_mut()
            .spawn((
                controller(false),
                Velocity::linear(Vec3::new(5.0, 0.0, 0.0)),
                ExternalForce {
                    force: Vec3::new(1.0, 2.0, 3.0),
                    torque: Vec3::ZERO,
                },
                Transform::default(),
            ))
            .id();

        step(&mut app, 1.0 / 64.0);

        let force = app.world().get::<ExternalForce>(plane).unwrap();
        assert_eq!(force.force, Vec3::ZERO);
        let transform = app.world().get::<Transform>(plane).unwrap();
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_spin_is_capped() {
        let mut app = setup_app();
        let plane = app
            .world_mut()
            .spawn((
                controller(true),
                Velocity {
                    linvel: Vec3::new(3.0, 0.0, 0.0),
                    angvel: Vec3::new(0.0, 50.0, 0.0),
                },
                ExternalForce::default(),
                Transform::default(),
            ))
            .id();

        step(&mut app, 1.0 / 64.0);

        let velocity = app.world().get::<Velocity>(plane).unwrap();
        assert!((velocity.angvel.length() - 5.0).abs() < 1e-3);
    }
}
