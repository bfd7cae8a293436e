//! Simulation clock and deferred callback queue.
//!
//! Timers inside states are plain per-tick countdowns. The only delayed
//! execution primitive in the core is a fire-and-forget callback queue,
//! serviced once per tick, used for cosmetic cleanup such as resetting a
//! weapon animation tag shortly after an AI shot.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hecs::Entity;

/// Global game time clock (in seconds)
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    /// Current simulation time in seconds (not real time)
    pub time: f32,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick's delta
    pub fn advance(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "cannot go backwards in time: dt = {}", dt);
        self.time += dt;
    }
}

/// Deferred actions the queue knows how to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Clear an agent's weapon animation tag back to neutral
    ResetWeaponTag,
}

/// A scheduled callback
#[derive(Debug, Clone, Copy)]
struct ScheduledCallback {
    entity: Entity,
    fire_time: f32,
    action: DeferredAction,
}

impl PartialEq for ScheduledCallback {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.entity == other.entity
    }
}

impl Eq for ScheduledCallback {}

impl PartialOrd for ScheduledCallback {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledCallback {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (earliest time first)
        other
            .fire_time
            .partial_cmp(&self.fire_time)
            .unwrap_or(Ordering::Equal)
    }
}

/// Fire-and-forget callback queue ordered by fire time (min-heap)
#[derive(Debug, Default)]
pub struct DeferredQueue {
    pending: BinaryHeap<ScheduledCallback>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an action to run at `fire_time` (absolute clock seconds)
    pub fn schedule(&mut self, entity: Entity, fire_time: f32, action: DeferredAction) {
        self.pending.push(ScheduledCallback {
            entity,
            fire_time,
            action,
        });
    }

    /// Pop every callback due at or before `now`
    pub fn pop_due(&mut self, now: f32) -> Vec<(Entity, DeferredAction)> {
        let mut due = Vec::new();
        while self
            .pending
            .peek()
            .map_or(false, |next| next.fire_time <= now)
        {
            if let Some(callback) = self.pending.pop() {
                due.push((callback.entity, callback.action));
            }
        }
        due
    }

    /// Remove all callbacks for a specific entity (e.g., on death)
    pub fn cancel_for_entity(&mut self, entity: Entity) {
        // Rebuild the heap without the cancelled entity
        let remaining: Vec<_> = self
            .pending
            .drain()
            .filter(|callback| callback.entity != entity)
            .collect();
        self.pending = remaining.into_iter().collect();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
