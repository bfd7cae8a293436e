//! Actor assembly: component bundles plus their state machines.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Facing, Health, Player, Position, Stockpile, WeaponType};
use crate::config::GameConfig;
use crate::systems::enemy_ai::{EnemyActor, EnemyBody};
use crate::systems::player_states::{PlayerActor, PlayerBody};

/// Post-hit invulnerability window for the player (seconds)
const PLAYER_INVULNERABLE_DURATION: f32 = 0.5;

/// Spawn the player actor at `pos`, idle, with nothing loaded.
pub fn spawn_player(
    world: &mut World,
    config: &GameConfig,
    pos: Vec2,
    weapon: WeaponType,
    stockpile: Stockpile,
) -> Entity {
    let entity = world.spawn((
        Position::new(pos.x, pos.y),
        Facing::default(),
        Health::new(config.player.max_health)
            .with_invulnerability(PLAYER_INVULNERABLE_DURATION),
        Player,
    ));

    let mut body = PlayerBody::new(entity, weapon, stockpile);
    body.position = pos;
    body.walk_speed = config.player.walk_speed;
    body.sprint_speed = config.player.sprint_speed;
    body.rotation_speed = config.player.rotation_speed;

    let _ = world.insert_one(entity, PlayerActor::new(body));
    tracing::info!(?entity, "spawned player");
    entity
}

/// Spawn an AI agent at `pos`, patrolling. `seed` fixes the agent's RNG
/// so simulations replay deterministically.
pub fn spawn_enemy(
    world: &mut World,
    config: &GameConfig,
    pos: Vec2,
    facing: Vec2,
    stockpile: Stockpile,
    seed: u64,
) -> Entity {
    let entity = world.spawn((
        Position::new(pos.x, pos.y),
        Facing::new(facing),
        Health::new(config.enemy.max_health),
    ));

    let mut body = EnemyBody::new(entity, config.enemy.clone(), stockpile, seed);
    body.position = pos;
    body.forward = facing.normalize_or_zero();

    let _ = world.insert_one(entity, EnemyActor::new(body));
    tracing::info!(?entity, "spawned enemy");
    entity
}
