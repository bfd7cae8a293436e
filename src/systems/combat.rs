//! Damage application and death events.

use hecs::{Entity, World};

use crate::components::Health;
use crate::events::{EventQueue, GameEvent};

/// Apply damage to an entity through its mitigation pipeline and emit the
/// resulting events. Returns the damage actually dealt (0 for entities
/// without health, corpses, or hits inside an invulnerability window).
pub fn apply_damage(
    world: &mut World,
    target: Entity,
    damage: i32,
    attacker: Option<Entity>,
    events: &mut EventQueue,
) -> i32 {
    let Ok(mut health) = world.get::<&mut Health>(target) else {
        return 0;
    };

    let dealt = health.take_damage(damage);
    if dealt <= 0 {
        return 0;
    }

    events.push(GameEvent::Damage {
        target,
        damage: dealt,
        remaining_health: health.current,
    });
    events.push(GameEvent::HealthChanged {
        target,
        current: health.current,
        max: health.max,
    });

    if health.is_dead() {
        events.push(GameEvent::Died {
            target,
            killer: attacker,
        });
    }

    dealt
}

/// Heal an entity and emit the health change. No-op on corpses.
pub fn heal(world: &mut World, target: Entity, amount: i32, events: &mut EventQueue) {
    let Ok(mut health) = world.get::<&mut Health>(target) else {
        return;
    };
    if health.is_dead() {
        return;
    }
    health.heal(amount);
    events.push(GameEvent::HealthChanged {
        target,
        current: health.current,
        max: health.max,
    });
}

/// Check if an entity is dead (health <= 0 or no health at all).
pub fn is_entity_dead(world: &World, entity: Entity) -> bool {
    world
        .get::<&Health>(entity)
        .map(|h| h.is_dead())
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_damage_emits_events() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = world.spawn((Health::new(50),));

        let dealt = apply_damage(&mut world, target, 20, None, &mut events);
        assert_eq!(dealt, 20);

        let collected: Vec<_> = events.drain().collect();
        assert!(matches!(
            collected[0],
            GameEvent::Damage { damage: 20, remaining_health: 30, .. }
        ));
        assert!(matches!(
            collected[1],
            GameEvent::HealthChanged { current: 30, max: 50, .. }
        ));
    }

    #[test]
    fn test_lethal_damage_emits_died() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut killers = World::new();
        let killer = killers.spawn(());
        let target = world.spawn((Health::new(10),));

        apply_damage(&mut world, target, 99, Some(killer), &mut events);
        assert!(is_entity_dead(&world, target));
        assert!(events.drain().any(|event| matches!(
            event,
            GameEvent::Died { killer: Some(k), .. } if k == killer
        )));
    }

    #[test]
    fn test_damage_on_corpse_is_ignored() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = world.spawn((Health::new(10),));

        apply_damage(&mut world, target, 99, None, &mut events);
        events.drain().count();

        let dealt = apply_damage(&mut world, target, 10, None, &mut events);
        assert_eq!(dealt, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_entity_without_health_counts_as_dead() {
        let mut world = World::new();
        let decoration = world.spawn(());
        assert!(is_entity_dead(&world, decoration));
    }

    #[test]
    fn test_heal_emits_health_changed() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = world.spawn((Health::new(50),));

        apply_damage(&mut world, target, 20, None, &mut events);
        events.drain().count();

        heal(&mut world, target, 15, &mut events);
        let health = world.get::<&Health>(target).unwrap();
        assert_eq!(health.current, 45);
        assert!(!events.is_empty());
    }
}
