//! Paper plane aerodynamics.
//!
//! Every fixed step the model reads the body's velocity and rotation and turns
//! them into a handful of additive forces plus a rotation blend:
//!
//! 1. Hard cap on angular velocity (prevents spin-out)
//! 2. Airflow direction and a stable right axis
//! 3. Stall gate by speed
//! 4. Lift along world up, capped at `max_lift`
//! 5. Quadratic drag along velocity
//! 6. Side drag (damps sideways slip)
//! 7. Gravity compensation (keeps gliding)
//! 8. Cruise push along airflow, stronger when slow
//! 9. Climb damper (stops step-by-step rising)
//! 10. Flutter: small up + sideways wobble
//! 11. Turns: sideways weave plus a visual bank angle
//! 12. Rotation: face airflow with the banked up vector, slerped by `stability * dt`
//!
//! The rotation is moved kinematically, never through torque.

use bevy::prelude::*;

use super::noise::{FlightNoise, NoiseSeeds};
use super::parameters::FlightParameters;

/// Below this speed the airflow direction is meaningless and no force is applied.
pub const MIN_FLIGHT_SPEED: f32 = 0.01;

/// Below this length `up x airflow` is treated as degenerate (near-vertical flight).
const DEGENERATE_RIGHT_AXIS: f32 = 0.001;

/// Speed window over which flutter and turn amplitudes fade in above their thresholds.
const PLAYFUL_FADE_WINDOW: f32 = 2.0;

/// The slice of a rigid body the flight model needs.
pub trait FlightBody {
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn set_angular_velocity(&mut self, angular_velocity: Vec3);
    fn rotation(&self) -> Quat;
    /// Moves the body to `rotation` kinematically.
    fn move_rotation(&mut self, rotation: Quat);
    /// Adds a continuous force for the current step.
    fn add_force(&mut self, force: Vec3);
    fn mass(&self) -> f32;
}

/// Body state read at the start of a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub rotation: Quat,
    pub mass: f32,
}

impl FlightState {
    pub fn read(body: &impl FlightBody) -> Self {
        Self {
            linear_velocity: body.linear_velocity(),
            angular_velocity: body.angular_velocity(),
            rotation: body.rotation(),
            mass: body.mass(),
        }
    }
}

/// World gravity, the noise clock and the fixed step length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightContext {
    pub gravity: Vec3,
    /// Monotonic time in seconds, only used to phase the noise channels.
    pub time: f32,
    pub dt: f32,
}

/// Every force the model produced in one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct FlightForces {
    pub lift: Vec3,
    pub drag: Vec3,
    pub side_drag: Vec3,
    pub gravity_comp: Vec3,
    pub cruise: Vec3,
    pub climb_damp: Vec3,
    pub flutter: Vec3,
    pub turn: Vec3,
}

impl FlightForces {
    pub fn total(&self) -> Vec3 {
        self.lift
            + self.drag
            + self.side_drag
            + self.gravity_comp
            + self.cruise
            + self.climb_damp
            + self.flutter
            + self.turn
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightOutput {
    /// Angular velocity after the hard cap.
    pub angular_velocity: Vec3,
    pub forces: FlightForces,
    /// Signed bank angle in radians, zero below the turn threshold.
    pub bank_angle: f32,
    /// New body rotation, `None` when the plane is too slow to orient.
    pub rotation: Option<Quat>,
}

impl FlightOutput {
    pub fn total_force(&self) -> Vec3 {
        self.forces.total()
    }
}

pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Where `value` sits between `a` and `b`; zero when the range is empty.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    (value - a) / (b - a)
}

/// Rescales `angular_velocity` so its length never exceeds `max_speed`.
pub fn clamp_angular_velocity(angular_velocity: Vec3, max_speed: f32) -> Vec3 {
    let magnitude = angular_velocity.length();
    if magnitude > max_speed {
        angular_velocity * (max_speed / magnitude)
    } else {
        angular_velocity
    }
}

/// Linear ramp from 0 at rest to 1 at stall speed. A non-positive stall speed
/// means the plane is always fully stalled.
pub fn stall_factor(speed: f32, stall_speed: f32) -> f32 {
    if stall_speed <= 0.0 {
        return 0.0;
    }
    clamp01(speed / stall_speed)
}

pub fn lift_magnitude(speed: f32, params: &FlightParameters) -> f32 {
    let stall01 = stall_factor(speed, params.stall_speed);
    (params.lift_power * speed * speed * stall01).min(params.max_lift)
}

/// Axis perpendicular to airflow and world up. Falls back to the body's own
/// right axis when flying almost straight up or down.
pub fn right_axis(airflow: Vec3, rotation: Quat) -> Vec3 {
    let right = Vec3::Y.cross(airflow);
    if right.length() < DEGENERATE_RIGHT_AXIS {
        let body_right = rotation * Vec3::X;
        return body_right.cross(airflow).normalize_or_zero();
    }
    right.normalize()
}

/// Faces `airflow` with world up rolled about the airflow axis by `bank_angle` radians.
pub fn target_rotation(airflow: Vec3, bank_angle: f32) -> Quat {
    let banked_up = Quat::from_axis_angle(airflow, bank_angle) * Vec3::Y;
    Transform::IDENTITY.looking_to(airflow, banked_up).rotation
}

fn speed_fade(speed: f32, min_speed: f32) -> f32 {
    clamp01((speed - min_speed) / PLAYFUL_FADE_WINDOW)
}

/// Runs one step of the model without touching the body.
pub fn compute_flight(
    state: &FlightState,
    params: &FlightParameters,
    seeds: &NoiseSeeds,
    noise: &FlightNoise,
    ctx: &FlightContext,
) -> FlightOutput {
    let angular_velocity = clamp_angular_velocity(state.angular_velocity, params.max_angular_speed);

    let v = state.linear_velocity;
    let speed = v.length();
    if speed < MIN_FLIGHT_SPEED {
        return FlightOutput {
            angular_velocity,
            forces: FlightForces::default(),
            bank_angle: 0.0,
            rotation: None,
        };
    }

    let airflow = v / speed;
    let right = right_axis(airflow, state.rotation);
    let mut forces = FlightForces::default();

    forces.lift = Vec3::Y * lift_magnitude(speed, params);
    forces.drag = -v * params.drag_power * speed;

    let side_speed = v.dot(right);
    forces.side_drag = -right * side_speed * params.side_drag_power;

    let glide01 = if params.gravity_comp_speed > 0.0 {
        clamp01(speed / params.gravity_comp_speed)
    } else {
        1.0
    };
    forces.gravity_comp = -ctx.gravity * state.mass * params.gravity_comp * glide01;

    let slow01 = clamp01(inverse_lerp(params.slow_speed, 0.0, speed));
    forces.cruise = airflow * (params.cruise_push + params.slow_cruise_boost * slow01);

    let climb_over = (v.dot(Vec3::Y) - params.climb_deadzone).max(0.0);
    if climb_over > 0.0 {
        forces.climb_damp = Vec3::NEG_Y * climb_over * params.climb_damp;
    }

    if speed >= params.flutter_min_speed {
        let (n_up, n_side) = noise.flutter(seeds, ctx.time * params.flutter_frequency);
        let f01 = speed_fade(speed, params.flutter_min_speed);
        forces.flutter = (Vec3::Y * n_up + right * n_side) * (params.flutter_strength * f01);
    }

    let mut bank_angle = 0.0;
    if speed >= params.turn_min_speed {
        let n_turn = noise.turn(seeds, ctx.time * params.turn_frequency);
        let t01 = speed_fade(speed, params.turn_min_speed);
        forces.turn = right * (n_turn * params.turn_strength * t01);
        bank_angle = n_turn * params.max_bank_deg.to_radians() * t01;
    }

    let target = target_rotation(airflow, bank_angle);
    let rotation = state
        .rotation
        .slerp(target, clamp01(params.stability * ctx.dt));

    FlightOutput {
        angular_velocity,
        forces,
        bank_angle,
        rotation: Some(rotation),
    }
}

/// Reads `body`, runs one step and writes the result back.
pub fn apply_flight(
    body: &mut impl FlightBody,
    params: &FlightParameters,
    seeds: &NoiseSeeds,
    noise: &FlightNoise,
    ctx: &FlightContext,
) -> FlightOutput {
    let state = FlightState::read(body);
    let output = compute_flight(&state, params, seeds, noise, ctx);

    if output.angular_velocity != state.angular_velocity {
        body.set_angular_velocity(output.angular_velocity);
    }
    if let Some(rotation) = output.rotation {
        body.add_force(output.total_force());
        body.move_rotation(rotation);
    }

    output
}
