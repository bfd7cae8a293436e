//! Game event system for decoupled communication between systems.
//!
//! The combat core emits events, collaborating layers (HUD, inventory,
//! audio, game-over handling) consume them at the end of each tick.

use glam::Vec2;
use hecs::Entity;

use crate::components::{AmmoFamily, AmmoTier, WeaponType};
use crate::state_machine::StateId;

/// Game events that systems can emit and subscribe to
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// An actor's ammo totals or active tier changed
    AmmoChanged {
        family: AmmoFamily,
        /// Total stockpile count across all tiers
        total: u32,
        /// Currently selected tier
        tier: AmmoTier,
    },
    /// An entity took damage
    Damage {
        target: Entity,
        damage: i32,
        remaining_health: i32,
    },
    /// An entity's health changed (damage or healing)
    HealthChanged {
        target: Entity,
        current: i32,
        max: i32,
    },
    /// An entity died
    Died {
        target: Entity,
        killer: Option<Entity>,
    },
    /// An AI agent changed machine state
    AiStateChanged { entity: Entity, state: StateId },
}

/// A validated fire, handed to the external projectile layer to spawn a
/// bullet. Damage reflects the ammo tier that was actually debited from
/// the stockpile.
#[derive(Debug, Clone)]
pub struct FireCommand {
    pub shooter: Entity,
    pub weapon: WeaponType,
    pub origin: Vec2,
    pub direction: Vec2,
    pub damage: i32,
    pub tier: AmmoTier,
}

/// Simple event queue - events are pushed during update, processed at end of frame
#[derive(Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Append events collected in an actor-local outbox
    pub fn append(&mut self, events: &mut Vec<GameEvent>) {
        self.events.append(events);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
