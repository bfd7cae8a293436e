//! Discrete player input events.
//!
//! The windowing/input layer is a collaborator; it translates raw device
//! state into these events and feeds them to the simulation, at most once
//! per tick per event type.

use glam::Vec2;

/// A discrete input event for the player state graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerInput {
    /// Movement stick/keys changed; `Vec2::ZERO` means released
    Move(Vec2),
    /// Sprint toggled on or off
    Sprint(bool),
    /// Fire the equipped weapon
    Shoot,
    /// Reload the equipped weapon
    Reload,
    /// The actor was hit. Issued internally by the damage path, not by
    /// the input device layer.
    Hurt,
}

/// Latched input state carried between ticks (the current stick position
/// and sprint toggle), as opposed to the one-shot events above.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub move_dir: Vec2,
    pub sprinting: bool,
}

impl InputSnapshot {
    pub fn is_moving(&self) -> bool {
        self.move_dir != Vec2::ZERO
    }
}
