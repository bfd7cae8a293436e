//! Motion execution: applies the intents written by state graphs to the
//! world transforms. States decide, this module moves.

use glam::Vec2;
use hecs::World;

use crate::components::{Facing, Position};
use crate::constants::ARRIVAL_THRESHOLD;
use crate::systems::enemy_ai::EnemyActor;
use crate::systems::player_states::PlayerActor;

/// Rotate `current` toward `desired` by at most `max_angle` radians.
/// Both are treated as directions; zero vectors pass through unchanged.
pub fn rotate_towards(current: Vec2, desired: Vec2, max_angle: f32) -> Vec2 {
    let current = current.normalize_or_zero();
    let desired = desired.normalize_or_zero();
    if desired == Vec2::ZERO {
        return current;
    }
    if current == Vec2::ZERO {
        return desired;
    }

    // Signed angle from current to desired, clamped to the allowed step
    let angle = current.perp_dot(desired).atan2(current.dot(desired));
    let step = angle.clamp(-max_angle, max_angle);
    Vec2::from_angle(step).rotate(current)
}

/// Apply the player's motion intent and mirror the state-steered facing
/// out to the transform components.
pub fn apply_player_motion(world: &mut World, dt: f32) {
    for (_, (position, facing, actor)) in
        world.query_mut::<(&mut Position, &mut Facing, &mut PlayerActor)>()
    {
        position.pos += actor.body.motion * dt;
        facing.forward = actor.body.forward;
        actor.body.position = position.pos;
    }
}

/// Steer enemies toward their nav destinations. While moving, facing
/// follows the travel direction; while halted, the state graph owns it
/// (the Shoot state tracks its target).
pub fn apply_enemy_nav(world: &mut World, dt: f32) {
    for (_, (position, facing, actor)) in
        world.query_mut::<(&mut Position, &mut Facing, &mut EnemyActor)>()
    {
        let body = &mut actor.body;
        if !body.nav.stopped {
            if let Some(destination) = body.nav.destination {
                let to_destination = destination - position.pos;
                let distance = to_destination.length();
                if distance > ARRIVAL_THRESHOLD {
                    let direction = to_destination / distance;
                    let step = (body.profile.move_speed * dt).min(distance);
                    position.pos += direction * step;
                    body.forward = rotate_towards(
                        body.forward,
                        direction,
                        body.profile.rotation_speed * dt,
                    );
                }
            }
        }
        facing.forward = body.forward;
        body.position = position.pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_towards_converges() {
        let mut forward = Vec2::Y;
        for _ in 0..100 {
            forward = rotate_towards(forward, Vec2::X, 0.1);
        }
        assert!(forward.distance(Vec2::X) < 1e-3);
    }

    #[test]
    fn test_rotate_towards_clamps_step() {
        let forward = rotate_towards(Vec2::Y, -Vec2::Y, 0.1);
        // One step of 0.1 rad, not the full half-turn
        let angle = Vec2::Y.dot(forward).clamp(-1.0, 1.0).acos();
        assert!((angle - 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_towards_zero_desired_is_identity() {
        assert_eq!(rotate_towards(Vec2::Y, Vec2::ZERO, 1.0), Vec2::Y);
    }
}
