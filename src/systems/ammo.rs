//! Ammo ledger operations: fire consumption, reloads, and tier switching.
//!
//! Every operation either succeeds fully or denies with no mutation at
//! all. Denials are ordinary gameplay (the caller just doesn't play the
//! action), never errors.

use glam::Vec2;
use hecs::Entity;

use crate::components::{AmmoFamily, AmmoPouch, AmmoTier, StockpileAccess, WeaponType};
use crate::events::{FireCommand, GameEvent};

/// Static definition of one ammo grade.
#[derive(Debug, Clone, Copy)]
pub struct AmmoDef {
    pub name: &'static str,
    pub damage: i32,
}

/// Look up the definition for a family + tier. Damage increases with tier
/// within each family.
pub fn ammo_def(family: AmmoFamily, tier: AmmoTier) -> &'static AmmoDef {
    use AmmoFamily::*;
    match (family, tier.level()) {
        (PistolAmmo, 1) => &AmmoDef { name: "9mm FMJ", damage: 10 },
        (PistolAmmo, 2) => &AmmoDef { name: "9mm JHP", damage: 14 },
        (PistolAmmo, _) => &AmmoDef { name: "9mm AP", damage: 20 },
        (RifleAmmo, 1) => &AmmoDef { name: "5.56 FMJ", damage: 12 },
        (RifleAmmo, 2) => &AmmoDef { name: "5.56 Match", damage: 17 },
        (RifleAmmo, _) => &AmmoDef { name: "5.56 AP", damage: 24 },
        (SniperAmmo, 1) => &AmmoDef { name: ".338 Soft", damage: 40 },
        (SniperAmmo, 2) => &AmmoDef { name: ".338 Match", damage: 55 },
        (SniperAmmo, _) => &AmmoDef { name: ".338 AP", damage: 75 },
    }
}

/// Where a shot leaves from, for the projectile layer.
#[derive(Debug, Clone, Copy)]
pub struct ShotContext {
    pub shooter: Entity,
    pub origin: Vec2,
    pub direction: Vec2,
}

/// Resolve which tier a fired round debits: the selected tier if it has
/// stock, otherwise the lowest stocked tier (searched 1 -> 3). None means
/// every tier is dry.
fn resolve_debit_tier(
    stock: &impl StockpileAccess,
    family: AmmoFamily,
    selected: AmmoTier,
) -> Option<AmmoTier> {
    if stock.quantity(family, selected) > 0 {
        return Some(selected);
    }
    AmmoTier::ALL
        .into_iter()
        .find(|tier| stock.quantity(family, *tier) > 0)
}

/// Fire one round from the weapon's clip.
///
/// An empty clip triggers an implicit reload first; if that fails too the
/// fire is a dry fire: denied, nothing mutated, no event emitted. On
/// success the round's damage comes from the tier actually debited, and
/// `selected_tier` follows it if the ledger had to fall back.
pub fn fire(
    pouch: &mut AmmoPouch,
    stock: &mut impl StockpileAccess,
    weapon: WeaponType,
    shot: ShotContext,
    events: &mut Vec<GameEvent>,
    shots: &mut Vec<FireCommand>,
) -> bool {
    let family = weapon.ammo_family();

    if pouch.clip(family).rounds == 0 && !reload(pouch, stock, weapon, events) {
        tracing::debug!(?weapon, "dry fire: clip and stockpile empty");
        return false;
    }

    let selected = pouch.clip(family).selected_tier;
    // Resolve before mutating anything so a denial leaves no trace.
    let Some(tier) = resolve_debit_tier(stock, family, selected) else {
        tracing::debug!(?weapon, "fire denied: no stockpile backing the clip");
        return false;
    };

    let clip = pouch.clip_mut(family);
    clip.rounds -= 1;
    stock.debit(family, tier, 1);
    if tier != selected {
        // Selected tier ran out mid-magazine; the ledger degrades to the
        // tier it actually drew from.
        clip.selected_tier = tier;
    }

    let def = ammo_def(family, tier);
    shots.push(FireCommand {
        shooter: shot.shooter,
        weapon,
        origin: shot.origin,
        direction: shot.direction,
        damage: def.damage,
        tier,
    });
    events.push(GameEvent::AmmoChanged {
        family,
        total: stock.total(family),
        tier,
    });
    true
}

/// Reload the weapon's clip from the stockpile.
///
/// Sets the clip to `min(capacity, total stockpile)` - a partial clip is
/// discarded, not topped up. Fails (clip untouched, no event) when the
/// stockpile is completely empty.
pub fn reload(
    pouch: &mut AmmoPouch,
    stock: &mut impl StockpileAccess,
    weapon: WeaponType,
    events: &mut Vec<GameEvent>,
) -> bool {
    let family = weapon.ammo_family();
    let total = stock.total(family);
    let amount = total.min(weapon.clip_capacity());
    if amount == 0 {
        tracing::debug!(?weapon, "reload failed: no stockpile");
        return false;
    }

    let clip = pouch.clip_mut(family);
    clip.rounds = amount;
    let tier = clip.selected_tier;
    events.push(GameEvent::AmmoChanged {
        family,
        total,
        tier,
    });
    true
}

/// Switch the selected tier up or down by one.
///
/// Only changes what the next reload/fallback draws from; the loaded clip
/// is untouched. No-op returning false when the step clamps to the same
/// tier or the candidate tier has no stock.
pub fn switch_tier(
    pouch: &mut AmmoPouch,
    stock: &impl StockpileAccess,
    family: AmmoFamily,
    direction: i32,
    events: &mut Vec<GameEvent>,
) -> bool {
    let clip = pouch.clip_mut(family);
    let candidate = clip.selected_tier.stepped(direction);
    if candidate == clip.selected_tier || stock.quantity(family, candidate) == 0 {
        return false;
    }
    clip.selected_tier = candidate;
    events.push(GameEvent::AmmoChanged {
        family,
        total: stock.total(family),
        tier: candidate,
    });
    true
}

/// Upgrade the selected tier by one. Convenience wrapper over
/// `switch_tier(+1)`.
pub fn upgrade_tier(
    pouch: &mut AmmoPouch,
    stock: &impl StockpileAccess,
    family: AmmoFamily,
    events: &mut Vec<GameEvent>,
) -> bool {
    switch_tier(pouch, stock, family, 1, events)
}

/// Consume `amount` rounds of a family from the stockpile at the selected
/// tier, without touching the clip (scripted costs, conversions).
pub fn consume(
    pouch: &AmmoPouch,
    stock: &mut impl StockpileAccess,
    family: AmmoFamily,
    amount: u32,
    events: &mut Vec<GameEvent>,
) -> bool {
    let tier = pouch.clip(family).selected_tier;
    if !stock.debit(family, tier, amount) {
        return false;
    }
    events.push(GameEvent::AmmoChanged {
        family,
        total: stock.total(family),
        tier,
    });
    true
}

/// Add rounds to the stockpile (pickups, purchases).
pub fn add_ammo(
    pouch: &AmmoPouch,
    stock: &mut impl StockpileAccess,
    family: AmmoFamily,
    tier: AmmoTier,
    amount: u32,
    events: &mut Vec<GameEvent>,
) {
    stock.credit(family, tier, amount);
    events.push(GameEvent::AmmoChanged {
        family,
        total: stock.total(family),
        tier: pouch.clip(family).selected_tier,
    });
}

/// Current clip rounds and stockpile total for HUD display.
pub fn ammo_info(
    pouch: &AmmoPouch,
    stock: &impl StockpileAccess,
    family: AmmoFamily,
) -> (u32, u32) {
    (pouch.clip(family).rounds, stock.total(family))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Stockpile;
    use hecs::World;

    fn tier(level: i32) -> AmmoTier {
        AmmoTier::clamped(level)
    }

    fn shot() -> ShotContext {
        let mut world = World::new();
        ShotContext {
            shooter: world.spawn(()),
            origin: Vec2::ZERO,
            direction: Vec2::Y,
        }
    }

    fn rifle_stock(t1: u32, t2: u32, t3: u32) -> Stockpile {
        Stockpile::new()
            .with(AmmoFamily::RifleAmmo, tier(1), t1)
            .with(AmmoFamily::RifleAmmo, tier(2), t2)
            .with(AmmoFamily::RifleAmmo, tier(3), t3)
    }

    #[test]
    fn test_fire_consumes_clip_and_stockpile() {
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(10, 0, 0);
        let mut events = Vec::new();
        let mut shots = Vec::new();

        assert!(reload(&mut pouch, &mut stock, WeaponType::Rifle, &mut events));
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).rounds, 10);

        assert!(fire(&mut pouch, &mut stock, WeaponType::Rifle, shot(), &mut events, &mut shots));
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).rounds, 9);
        assert_eq!(stock.total(AmmoFamily::RifleAmmo), 9);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].damage, ammo_def(AmmoFamily::RifleAmmo, tier(1)).damage);
    }

    #[test]
    fn test_fire_empty_clip_reloads_implicitly() {
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(5, 0, 0);
        let mut events = Vec::new();
        let mut shots = Vec::new();

        assert!(fire(&mut pouch, &mut stock, WeaponType::Rifle, shot(), &mut events, &mut shots));
        // Implicit reload filled the clip with all 5, then one was fired
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).rounds, 4);
        assert_eq!(stock.total(AmmoFamily::RifleAmmo), 4);
    }

    #[test]
    fn test_dry_fire_denied_without_mutation_or_event() {
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(0, 0, 0);
        let mut events = Vec::new();
        let mut shots = Vec::new();

        assert!(!fire(&mut pouch, &mut stock, WeaponType::Rifle, shot(), &mut events, &mut shots));
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).rounds, 0);
        assert_eq!(stock.total(AmmoFamily::RifleAmmo), 0);
        assert!(events.is_empty());
        assert!(shots.is_empty());
    }

    #[test]
    fn test_fire_fallback_to_lowest_stocked_tier() {
        // Stockpile {t1:0, t2:3, t3:1}, selected tier 1: fire succeeds,
        // debits tier 2, and the selected tier follows.
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(0, 3, 1);
        let mut events = Vec::new();
        let mut shots = Vec::new();

        assert!(reload(&mut pouch, &mut stock, WeaponType::Rifle, &mut events));
        assert!(fire(&mut pouch, &mut stock, WeaponType::Rifle, shot(), &mut events, &mut shots));

        assert_eq!(stock.quantity(AmmoFamily::RifleAmmo, tier(2)), 2);
        assert_eq!(stock.quantity(AmmoFamily::RifleAmmo, tier(3)), 1);
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).selected_tier, tier(2));
        // Damage tracks the debited tier, not the nominal one
        assert_eq!(shots[0].damage, ammo_def(AmmoFamily::RifleAmmo, tier(2)).damage);
        assert_eq!(shots[0].tier, tier(2));
    }

    #[test]
    fn test_clip_never_exceeds_capacity() {
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(100, 100, 100);
        let mut events = Vec::new();

        assert!(reload(&mut pouch, &mut stock, WeaponType::Rifle, &mut events));
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).rounds, WeaponType::Rifle.clip_capacity());

        let mut pistol_stock = Stockpile::new().with(AmmoFamily::PistolAmmo, tier(1), 100);
        assert!(reload(&mut pouch, &mut pistol_stock, WeaponType::Pistol, &mut events));
        assert_eq!(pouch.clip(AmmoFamily::PistolAmmo).rounds, WeaponType::Pistol.clip_capacity());
    }

    #[test]
    fn test_reload_overwrites_partial_clip() {
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(50, 0, 0);
        let mut events = Vec::new();

        pouch.clip_mut(AmmoFamily::RifleAmmo).rounds = 4;
        assert!(reload(&mut pouch, &mut stock, WeaponType::Rifle, &mut events));
        // Set, not topped up: 30, not 34
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).rounds, 30);
    }

    #[test]
    fn test_reload_denied_leaves_clip_unchanged() {
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(0, 0, 0);
        let mut events = Vec::new();

        pouch.clip_mut(AmmoFamily::RifleAmmo).rounds = 4;
        assert!(!reload(&mut pouch, &mut stock, WeaponType::Rifle, &mut events));
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).rounds, 4);
        assert!(events.is_empty());
    }

    #[test]
    fn test_switch_tier_bounds_and_stock_check() {
        let mut pouch = AmmoPouch::new();
        let stock = rifle_stock(10, 10, 0);
        let mut events = Vec::new();
        let family = AmmoFamily::RifleAmmo;

        // Down from tier 1 clamps to tier 1: no-op
        assert!(!switch_tier(&mut pouch, &stock, family, -1, &mut events));
        // Up to tier 2: stocked, succeeds
        assert!(switch_tier(&mut pouch, &stock, family, 1, &mut events));
        assert_eq!(pouch.clip(family).selected_tier, tier(2));
        // Up to tier 3: empty, denied
        assert!(!switch_tier(&mut pouch, &stock, family, 1, &mut events));
        assert_eq!(pouch.clip(family).selected_tier, tier(2));

        // Tier stays in bounds whatever we throw at it
        for direction in [-5, -1, 1, 5] {
            switch_tier(&mut pouch, &stock, family, direction, &mut events);
            let level = pouch.clip(family).selected_tier.level();
            assert!((1..=3).contains(&level));
        }
    }

    #[test]
    fn test_switch_tier_does_not_touch_clip() {
        let mut pouch = AmmoPouch::new();
        let stock = rifle_stock(10, 10, 10);
        let mut events = Vec::new();

        pouch.clip_mut(AmmoFamily::RifleAmmo).rounds = 7;
        assert!(switch_tier(&mut pouch, &stock, AmmoFamily::RifleAmmo, 1, &mut events));
        assert_eq!(pouch.clip(AmmoFamily::RifleAmmo).rounds, 7);
    }

    #[test]
    fn test_consume_and_add_ammo() {
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(5, 0, 0);
        let mut events = Vec::new();

        assert!(consume(&pouch, &mut stock, AmmoFamily::RifleAmmo, 3, &mut events));
        assert_eq!(stock.total(AmmoFamily::RifleAmmo), 2);
        // Not enough left at the selected tier
        assert!(!consume(&pouch, &mut stock, AmmoFamily::RifleAmmo, 3, &mut events));
        assert_eq!(stock.total(AmmoFamily::RifleAmmo), 2);

        add_ammo(&pouch, &mut stock, AmmoFamily::RifleAmmo, tier(2), 30, &mut events);
        assert_eq!(stock.total(AmmoFamily::RifleAmmo), 32);
    }

    #[test]
    fn test_ammo_info() {
        let mut pouch = AmmoPouch::new();
        let mut stock = rifle_stock(40, 5, 0);
        let mut events = Vec::new();

        assert_eq!(ammo_info(&pouch, &stock, AmmoFamily::RifleAmmo), (0, 45));
        assert!(reload(&mut pouch, &mut stock, WeaponType::Rifle, &mut events));
        assert_eq!(ammo_info(&pouch, &stock, AmmoFamily::RifleAmmo), (30, 45));
    }

    #[test]
    fn test_tier_damage_increases_within_family() {
        for family in AmmoFamily::ALL {
            let mut last = 0;
            for t in AmmoTier::ALL {
                let damage = ammo_def(family, t).damage;
                assert!(damage > last, "{:?} {:?}", family, t);
                last = damage;
            }
        }
    }
}
