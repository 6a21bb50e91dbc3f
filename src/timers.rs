//! One-shot scheduled actions.
//!
//! Everything that used to "wait a few seconds, then do X" (despawn
//! countdown, spawn guards, respawn delay) goes through the [`TimerRegistry`].
//! Timers are ticked once per frame on the main schedule and fire as
//! [`TimerElapsed`] events, so they never run concurrently with the frame or
//! physics passes.

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::PaperPlaneSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct TimerHandle(u64);

/// What to do when a timer fires. Entities may be gone by then; handlers check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Despawn(Entity),
    EnableGrab(Entity),
    LiftQuarantine { plane: Entity, dispenser: Entity },
    Respawn(Entity),
}

#[derive(Event, Debug, Clone, Copy)]
pub struct TimerElapsed {
    pub handle: TimerHandle,
    pub action: TimerAction,
}

struct PendingTimer {
    timer: Timer,
    action: TimerAction,
}

#[derive(Resource, Default)]
pub struct TimerRegistry {
    next_handle: u64,
    pending: BTreeMap<TimerHandle, PendingTimer>,
}

impl TimerRegistry {
    pub fn schedule(&mut self, delay_secs: f32, action: TimerAction) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert(
            handle,
            PendingTimer {
                timer: Timer::from_seconds(delay_secs.max(0.0), TimerMode::Once),
                action,
            },
        );
        handle
    }

    /// Returns false if the timer already fired or never existed.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advances every pending timer and removes the ones that finished,
    /// returned in the order they were scheduled.
    pub fn tick(&mut self, delta: Duration) -> Vec<TimerElapsed> {
        let mut fired = Vec::new();
        for (handle, pending) in self.pending.iter_mut() {
            if pending.timer.tick(delta).finished() {
                fired.push(TimerElapsed {
                    handle: *handle,
                    action: pending.action,
                });
            }
        }
        for elapsed in &fired {
            self.pending.remove(&elapsed.handle);
        }
        fired
    }
}

pub struct TimerPlugin;

impl Plugin for TimerPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (PaperPlaneSet::Timers, PaperPlaneSet::Hold, PaperPlaneSet::Dispense).chain(),
        )
        .init_resource::<TimerRegistry>()
        .add_event::<TimerElapsed>()
        .add_systems(Update, tick_timers.in_set(PaperPlaneSet::Timers));
    }
}

pub fn tick_timers(
    time: Res<Time>,
    mut registry: ResMut<TimerRegistry>,
    mut elapsed_events: EventWriter<TimerElapsed>,
) {
    for elapsed in registry.tick(time.delta()) {
        debug!("⏰ Timer {:?} fired: {:?}", elapsed.handle, elapsed.action);
        elapsed_events.write(elapsed);
    }
}
