//! General gameplay constants.

/// Player walk speed (units/second)
pub const DEFAULT_WALK_SPEED: f32 = 3.5;
/// Player sprint speed (units/second)
pub const DEFAULT_SPRINT_SPEED: f32 = 6.0;
/// Turn rate while steering toward a movement direction (radians/second)
pub const DEFAULT_ROTATION_SPEED: f32 = 10.0;

/// Player starting health
pub const PLAYER_MAX_HEALTH: i32 = 100;
/// Enemy starting health
pub const ENEMY_MAX_HEALTH: i32 = 60;
/// Enemy movement speed (units/second)
pub const ENEMY_MOVE_SPEED: f32 = 3.0;
/// Enemy turn rate while facing a target (radians/second)
pub const ENEMY_ROTATION_SPEED: f32 = 5.0;
/// Enemy hurt stagger duration (seconds)
pub const ENEMY_HURT_DURATION: f32 = 1.0;

/// Default enemy engagement ranges (units)
pub const DEFAULT_PATROL_RANGE: f32 = 5.0;
pub const DEFAULT_SHOOT_RANGE: f32 = 7.0;
pub const DEFAULT_CHASE_RANGE: f32 = 10.0;
pub const DEFAULT_LOSE_RANGE: f32 = 15.0;
/// Default enemy field of view (degrees, full cone)
pub const DEFAULT_FOV_DEGREES: f32 = 120.0;
