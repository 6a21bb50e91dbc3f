use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use crate::flight::FlightParameters;
use crate::timers::TimerHandle;

/// Collision membership of dispenser bodies.
pub const DISPENSER_GROUP: Group = Group::GROUP_1;
/// Collision membership of paper planes.
pub const PLANE_GROUP: Group = Group::GROUP_2;

/// Everything needed to build a fresh plane.
#[derive(Debug, Clone, Reflect)]
pub struct PlaneTemplate {
    pub flight: FlightParameters,
    pub despawn_after_secs: f32,
    pub half_extents: Vec3,
    pub mass: f32,
}

impl Default for PlaneTemplate {
    fn default() -> Self {
        Self {
            flight: FlightParameters::default(),
            despawn_after_secs: 100.0,
            half_extents: Vec3::new(0.12, 0.02, 0.18),
            mass: 1.0,
        }
    }
}

impl PlaneTemplate {
    pub fn is_spawnable(&self) -> bool {
        self.half_extents.cmpgt(Vec3::ZERO).all() && self.mass > 0.0
    }
}

/// Hands out one plane at a time and replaces it shortly after it is picked up.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlaneDispenser {
    pub spawn_point: Transform,
    pub respawn_delay: f32,
    /// Grabbing is refused this long after spawn so the spawn itself can't register as a grab.
    pub enable_grab_after: f32,
    /// Collisions with the dispenser body are ignored this long after spawn.
    pub ignore_dispenser_collision_for: f32,
    pub template: PlaneTemplate,
    pub(crate) pending_respawn: Option<TimerHandle>,
    pub(crate) live_plane: Option<Entity>,
    pub(crate) spawned: u32,
}

impl Default for PlaneDispenser {
    fn default() -> Self {
        Self {
            spawn_point: Transform::default(),
            respawn_delay: 2.0,
            enable_grab_after: 0.15,
            ignore_dispenser_collision_for: 0.2,
            template: PlaneTemplate::default(),
            pending_respawn: None,
            live_plane: None,
            spawned: 0,
        }
    }
}

impl PlaneDispenser {
    pub fn new(spawn_point: Transform) -> Self {
        Self {
            spawn_point,
            ..default()
        }
    }

    /// The plane waiting to be picked up, if any.
    pub fn live_plane(&self) -> Option<Entity> {
        self.live_plane
    }

    pub fn is_respawn_pending(&self) -> bool {
        self.pending_respawn.is_some()
    }

    pub fn spawned_count(&self) -> u32 {
        self.spawned
    }

    /// Arms a respawn unless one is already on its way.
    pub fn request_respawn(
        &mut self,
        schedule: impl FnOnce(f32) -> TimerHandle,
    ) -> Option<TimerHandle> {
        if self.pending_respawn.is_some() {
            return None;
        }
        let handle = schedule(self.respawn_delay);
        self.pending_respawn = Some(handle);
        self.live_plane = None;
        Some(handle)
    }

    /// Consumes the pending respawn if `handle` is the one it is waiting for.
    pub fn take_respawn(&mut self, handle: TimerHandle) -> bool {
        if self.pending_respawn == Some(handle) {
            self.pending_respawn = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn record_spawn(&mut self, plane: Entity) -> u32 {
        self.live_plane = Some(plane);
        self.spawned += 1;
        self.spawned
    }
}

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PaperPlane {
    pub dispenser: Option<Entity>,
}

/// One-shot observer: tells the dispenser the first time its plane is grabbed.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NotifyGrab {
    pub dispenser: Entity,
    requested: bool,
}

impl NotifyGrab {
    pub fn new(dispenser: Entity) -> Self {
        Self {
            dispenser,
            requested: false,
        }
    }

    pub fn has_requested(&self) -> bool {
        self.requested
    }

    /// True exactly once, on the first held sample.
    pub fn observe(&mut self, held: bool) -> bool {
        if self.requested || !held {
            return false;
        }
        self.requested = true;
        true
    }
}

/// Mesh and material for spawned planes. Optional, headless setups leave it out.
#[derive(Resource, Clone)]
pub struct PlaneVisual {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnRequested {
    pub dispenser: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneSpawned {
    pub plane: Entity,
    pub dispenser: Entity,
}
