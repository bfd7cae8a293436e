//! Enemy AI constants.

/// Patrol duty cycle: seconds spent walking toward the patrol point
pub const PATROL_MOVE_DURATION: f32 = 3.0;
/// Patrol duty cycle: seconds spent idling between walks
pub const PATROL_IDLE_DURATION: f32 = 2.0;
/// An agent counts as arrived once within this distance of its goal
pub const ARRIVAL_THRESHOLD: f32 = 0.3;

/// Minimum seconds between AI shots
pub const AI_SHOOT_INTERVAL_MIN: f32 = 3.0;
/// Maximum seconds between AI shots
pub const AI_SHOOT_INTERVAL_MAX: f32 = 6.0;
/// Delay before the weapon animation tag resets after an AI shot (seconds)
pub const WEAPON_TAG_RESET_DELAY: f32 = 0.5;
