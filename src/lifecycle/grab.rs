use bevy::prelude::*;

use crate::timers::TimerHandle;

/// Transition of the grip-contact count between zero and nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEdge {
    Grabbed,
    Released,
}

/// Edge between the previous held flag and the current contact count, if any.
pub fn detect_hold_edge(was_held: bool, selecting_points: u32) -> Option<HoldEdge> {
    match (was_held, selecting_points > 0) {
        (false, true) => Some(HoldEdge::Grabbed),
        (true, false) => Some(HoldEdge::Released),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum FlightPhase {
    /// Resting or held: flight off.
    #[default]
    Idle,
    /// Thrown and airborne: flight on, despawn countdown running.
    Flying,
}

/// Grab/release state machine for one plane.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct GrabLifecycle {
    pub despawn_after_secs: f32,
    phase: FlightPhase,
    was_held: bool,
    despawn_timer: Option<TimerHandle>,
}

impl GrabLifecycle {
    pub fn new(despawn_after_secs: f32) -> Self {
        Self {
            despawn_after_secs,
            phase: FlightPhase::Idle,
            was_held: false,
            despawn_timer: None,
        }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn despawn_timer(&self) -> Option<TimerHandle> {
        self.despawn_timer
    }

    /// Feeds one hold-count sample and returns the edge it produced.
    pub fn observe(&mut self, selecting_points: u32) -> Option<HoldEdge> {
        let edge = detect_hold_edge(self.was_held, selecting_points)?;
        match edge {
            HoldEdge::Grabbed => {
                self.was_held = true;
                self.phase = FlightPhase::Idle;
            }
            HoldEdge::Released => {
                self.was_held = false;
                self.phase = FlightPhase::Flying;
            }
        }
        Some(edge)
    }

    pub fn arm_despawn(&mut self, handle: TimerHandle) {
        self.despawn_timer = Some(handle);
    }

    /// Forgets the countdown and hands back its handle so it can be canceled.
    pub fn take_despawn_timer(&mut self) -> Option<TimerHandle> {
        self.despawn_timer.take()
    }

    /// True when `handle` is the live countdown of a plane still in the air.
    pub fn should_despawn(&self, handle: TimerHandle) -> bool {
        self.phase == FlightPhase::Flying && self.despawn_timer == Some(handle)
    }
}

impl Default for GrabLifecycle {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneGrabbed {
    pub plane: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneReleased {
    pub plane: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDespawned {
    pub plane: Entity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_detection() {
        assert_eq!(detect_hold_edge(false, 0), None);
        assert_eq!(detect_hold_edge(false, 1), Some(HoldEdge::Grabbed));
        assert_eq!(detect_hold_edge(false, 3), Some(HoldEdge::Grabbed));
        assert_eq!(detect_hold_edge(true, 2), None);
        assert_eq!(detect_hold_edge(true, 0), Some(HoldEdge::Released));
    }

    #[test]
    fn test_hold_sequence_transitions() {
        let mut lifecycle = GrabLifecycle::default();
        let samples = [1, 1, 0, 0, 1, 0];
        let phases: Vec<FlightPhase> = samples
            .iter()
            .map(|&count| {
                lifecycle.observe(count);
                lifecycle.phase()
            })
            .collect();

        use FlightPhase::*;
        assert_eq!(phases, vec![Idle, Idle, Flying, Flying, Idle, Flying]);
    }

    #[test]
    fn test_untouched_plane_never_flies() {
        let mut lifecycle = GrabLifecycle::default();
        for _ in 0..10 {
            assert_eq!(lifecycle.observe(0), None);
        }
        assert_eq!(lifecycle.phase(), FlightPhase::Idle);
    }

    #[test]
    fn test_contact_count_changes_while_held_are_not_edges() {
        let mut lifecycle = GrabLifecycle::default();
        assert_eq!(lifecycle.observe(1), Some(HoldEdge::Grabbed));
        assert_eq!(lifecycle.observe(2), None);
        assert_eq!(lifecycle.observe(1), None);
        assert_eq!(lifecycle.observe(0), Some(HoldEdge::Released));
    }

    #[test]
    fn test_should_despawn_requires_matching_handle_in_flight() {
        use crate::timers::{TimerAction, TimerRegistry};

        let mut registry = TimerRegistry::default();
        let first = registry.schedule(1.0, TimerAction::Despawn(Entity::PLACEHOLDER));
        let second = registry.schedule(1.0, TimerAction::Despawn(Entity::PLACEHOLDER));

        let mut lifecycle = GrabLifecycle::default();
        lifecycle.observe(1);
        lifecycle.observe(0);
        lifecycle.arm_despawn(second);

        assert!(lifecycle.should_despawn(second));
        assert!(!lifecycle.should_despawn(first));

        lifecycle.observe(1);
        assert!(!lifecycle.should_despawn(second));
    }
}
