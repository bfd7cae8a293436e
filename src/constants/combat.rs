//! Weapon and combat constants.

/// Pistol clip capacity (rounds)
pub const PISTOL_CLIP_CAPACITY: u32 = 10;
/// Rifle clip capacity (rounds)
pub const RIFLE_CLIP_CAPACITY: u32 = 30;
/// Sniper rifle clip capacity (rounds)
pub const SNIPER_CLIP_CAPACITY: u32 = 3;

/// Duration the shooting state holds the actor, per weapon (seconds)
pub const PISTOL_SHOOT_DURATION: f32 = 0.3;
pub const RIFLE_SHOOT_DURATION: f32 = 0.5;
pub const SNIPER_SHOOT_DURATION: f32 = 0.5;

/// Duration of the reload animation (seconds)
pub const RELOAD_DURATION: f32 = 2.0;
/// Duration of the player hurt stagger (seconds)
pub const HURT_DURATION: f32 = 1.0;

/// Distance from the actor's position to the muzzle (units)
pub const MUZZLE_OFFSET: f32 = 0.5;
