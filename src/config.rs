//! Tunable gameplay configuration, loadable from JSON.
//!
//! The AI transition table assumes nested range bands
//! (shoot <= chase <= lose); the algorithm itself never checks them, so a
//! bad config would make agents oscillate between states. Validation
//! happens here, at load time, and `Simulation::new` only accepts a
//! validated config.

use serde::Deserialize;
use thiserror::Error;

use crate::components::WeaponType;
use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "ai range bands must be nested: shoot_range ({shoot}) <= chase_range ({chase}) <= lose_range ({lose})"
    )]
    InvalidRangeBands { shoot: f32, chase: f32, lose: f32 },
    #[error("fov_degrees must be within (0, 360], got {0}")]
    InvalidFov(f32),
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
}

/// Player movement and survivability tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub rotation_speed: f32,
    pub max_health: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: DEFAULT_WALK_SPEED,
            sprint_speed: DEFAULT_SPRINT_SPEED,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            max_health: PLAYER_MAX_HEALTH,
        }
    }
}

/// Per-agent AI tuning: engagement bands, field of view, movement
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiProfile {
    /// Radius around the agent for random patrol points
    pub patrol_range: f32,
    /// Within this distance (and FOV) the agent stops and shoots
    pub shoot_range: f32,
    /// Beyond this distance a shooting agent falls back to chasing
    pub chase_range: f32,
    /// Beyond this distance the agent gives up and patrols
    pub lose_range: f32,
    /// Full view cone in degrees
    pub fov_degrees: f32,
    pub move_speed: f32,
    pub rotation_speed: f32,
    pub hurt_duration: f32,
    pub max_health: i32,
    pub weapon: WeaponType,
}

impl Default for AiProfile {
    fn default() -> Self {
        Self {
            patrol_range: DEFAULT_PATROL_RANGE,
            shoot_range: DEFAULT_SHOOT_RANGE,
            chase_range: DEFAULT_CHASE_RANGE,
            lose_range: DEFAULT_LOSE_RANGE,
            fov_degrees: DEFAULT_FOV_DEGREES,
            move_speed: ENEMY_MOVE_SPEED,
            rotation_speed: ENEMY_ROTATION_SPEED,
            hurt_duration: ENEMY_HURT_DURATION,
            max_health: ENEMY_MAX_HEALTH,
            weapon: WeaponType::Pistol,
        }
    }
}

impl AiProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.shoot_range <= self.chase_range && self.chase_range <= self.lose_range) {
            return Err(ConfigError::InvalidRangeBands {
                shoot: self.shoot_range,
                chase: self.chase_range,
                lose: self.lose_range,
            });
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees <= 360.0) {
            return Err(ConfigError::InvalidFov(self.fov_degrees));
        }
        check_positive("patrol_range", self.patrol_range)?;
        check_positive("move_speed", self.move_speed)?;
        check_positive("rotation_speed", self.rotation_speed)?;
        check_positive("hurt_duration", self.hurt_duration)?;
        check_positive("max_health", self.max_health as f32)?;
        Ok(())
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub enemy: AiProfile,
}

impl GameConfig {
    /// Parse and validate a JSON config string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("walk_speed", self.player.walk_speed)?;
        check_positive("sprint_speed", self.player.sprint_speed)?;
        check_positive("rotation_speed", self.player.rotation_speed)?;
        check_positive("max_health", self.player.max_health as f32)?;
        self.enemy.validate()
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
