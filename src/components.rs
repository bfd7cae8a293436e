use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position component - world coordinates on the arena plane
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub pos: Vec2,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

/// Facing component - unit vector the actor is looking along
#[derive(Debug, Clone, Copy)]
pub struct Facing {
    pub forward: Vec2,
}

impl Facing {
    pub fn new(forward: Vec2) -> Self {
        Self {
            forward: forward.normalize_or_zero(),
        }
    }
}

impl Default for Facing {
    fn default() -> Self {
        Self { forward: Vec2::Y }
    }
}

/// Player marker component
#[derive(Debug, Clone, Copy)]
pub struct Player;

/// Health component with armor/helmet mitigation and a post-hit
/// invulnerability window.
#[derive(Debug, Clone)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    /// Percent of incoming damage absorbed by armor (0-100)
    pub armor_value: i32,
    /// Percent of post-armor damage absorbed by the helmet (0-100)
    pub helmet_value: i32,
    pub armor_durability: i32,
    pub helmet_durability: i32,
    /// Seconds of invulnerability granted after each hit
    pub invulnerable_duration: f32,
    pub invulnerable_timer: f32,
    pub can_die: bool,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            max,
            armor_value: 0,
            helmet_value: 0,
            armor_durability: 100,
            helmet_durability: 100,
            invulnerable_duration: 0.0,
            invulnerable_timer: 0.0,
            can_die: true,
        }
    }

    pub fn with_armor(mut self, armor_value: i32, helmet_value: i32) -> Self {
        self.armor_value = armor_value;
        self.helmet_value = helmet_value;
        self
    }

    pub fn with_invulnerability(mut self, duration: f32) -> Self {
        self.invulnerable_duration = duration;
        self
    }

    pub fn percentage(&self) -> f32 {
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    pub fn heal(&mut self, amount: i32) {
        if self.current <= 0 {
            return;
        }
        self.current = (self.current + amount).min(self.max);
    }

    /// Advance the invulnerability window.
    pub fn tick(&mut self, dt: f32) {
        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        }
    }

    /// Apply incoming damage through armor and helmet mitigation.
    /// Returns the final damage dealt (0 if the hit was ignored).
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        if self.is_invulnerable() || self.current <= 0 {
            return 0;
        }

        let armor_reduction = (damage as f32 * self.armor_value as f32 / 100.0).round() as i32;
        let after_armor = (damage - armor_reduction).max(1);
        let helmet_reduction =
            (after_armor as f32 * self.helmet_value as f32 / 100.0).round() as i32;
        let final_damage = (after_armor - helmet_reduction).max(1);

        // Mitigation wears the protective gear down
        if self.armor_value > 0 {
            self.armor_durability = (self.armor_durability - armor_reduction).max(0);
        }
        if self.helmet_value > 0 {
            self.helmet_durability = (self.helmet_durability - helmet_reduction).max(0);
        }

        let floor = if self.can_die { 0 } else { 1 };
        self.current = (self.current - final_damage).clamp(floor, self.max);

        if self.invulnerable_duration > 0.0 {
            self.invulnerable_timer = self.invulnerable_duration;
        }

        final_damage
    }
}

/// Weapon type - determines clip capacity, shot duration, and ammo family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    Pistol,
    Rifle,
    Sniper,
}

impl WeaponType {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponType::Pistol => "Pistol",
            WeaponType::Rifle => "Rifle",
            WeaponType::Sniper => "Sniper",
        }
    }

    pub fn ammo_family(&self) -> AmmoFamily {
        match self {
            WeaponType::Pistol => AmmoFamily::PistolAmmo,
            WeaponType::Rifle => AmmoFamily::RifleAmmo,
            WeaponType::Sniper => AmmoFamily::SniperAmmo,
        }
    }

    pub fn clip_capacity(&self) -> u32 {
        match self {
            WeaponType::Pistol => crate::constants::PISTOL_CLIP_CAPACITY,
            WeaponType::Rifle => crate::constants::RIFLE_CLIP_CAPACITY,
            WeaponType::Sniper => crate::constants::SNIPER_CLIP_CAPACITY,
        }
    }

    /// How long the shooting state holds the actor (seconds)
    pub fn shoot_duration(&self) -> f32 {
        match self {
            WeaponType::Pistol => crate::constants::PISTOL_SHOOT_DURATION,
            WeaponType::Rifle => crate::constants::RIFLE_SHOOT_DURATION,
            WeaponType::Sniper => crate::constants::SNIPER_SHOOT_DURATION,
        }
    }

    /// Animation tag value for this weapon (0 is reserved for "no weapon")
    pub fn anim_tag(&self) -> u8 {
        match self {
            WeaponType::Pistol => 1,
            WeaponType::Rifle => 2,
            WeaponType::Sniper => 3,
        }
    }
}

/// Ammunition family, in 1:1 correspondence with WeaponType
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmmoFamily {
    PistolAmmo,
    RifleAmmo,
    SniperAmmo,
}

impl AmmoFamily {
    pub const ALL: [AmmoFamily; 3] = [
        AmmoFamily::PistolAmmo,
        AmmoFamily::RifleAmmo,
        AmmoFamily::SniperAmmo,
    ];
}

/// Ammunition quality tier, always within [1, 3].
/// Higher tiers deal more damage per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AmmoTier(u8);

impl AmmoTier {
    pub const MIN: AmmoTier = AmmoTier(1);
    pub const MAX: AmmoTier = AmmoTier(3);
    pub const ALL: [AmmoTier; 3] = [AmmoTier(1), AmmoTier(2), AmmoTier(3)];

    /// Build a tier, clamping into the valid range.
    pub fn clamped(level: i32) -> Self {
        Self(level.clamp(1, 3) as u8)
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Step the tier by `direction` (+1/-1), clamping at the bounds.
    pub fn stepped(&self, direction: i32) -> Self {
        Self::clamped(self.0 as i32 + direction)
    }
}

impl Default for AmmoTier {
    fn default() -> Self {
        AmmoTier::MIN
    }
}

/// The loaded clip for one ammo family: how many rounds are ready to fire
/// and which tier the next reload will draw from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipState {
    pub rounds: u32,
    pub selected_tier: AmmoTier,
}

/// Per-actor ammo ledger: one clip per family. No weapon starts loaded.
#[derive(Debug, Clone, Default)]
pub struct AmmoPouch {
    clips: HashMap<AmmoFamily, ClipState>,
}

impl AmmoPouch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip(&self, family: AmmoFamily) -> ClipState {
        self.clips.get(&family).copied().unwrap_or_default()
    }

    pub fn clip_mut(&mut self, family: AmmoFamily) -> &mut ClipState {
        self.clips.entry(family).or_default()
    }
}

/// Inventory query contract the ammo ledger operates through.
/// The concrete `Stockpile` below satisfies it; an embedding game with its
/// own inventory collections can provide another implementation.
pub trait StockpileAccess {
    fn quantity(&self, family: AmmoFamily, tier: AmmoTier) -> u32;

    /// Remove `amount` rounds. Returns false (and changes nothing) if the
    /// entry holds fewer than `amount`.
    fn debit(&mut self, family: AmmoFamily, tier: AmmoTier, amount: u32) -> bool;

    fn credit(&mut self, family: AmmoFamily, tier: AmmoTier, amount: u32);

    /// Total rounds of a family across all tiers.
    fn total(&self, family: AmmoFamily) -> u32 {
        AmmoTier::ALL
            .iter()
            .map(|tier| self.quantity(family, *tier))
            .sum()
    }
}

/// Simple owned stockpile keyed by (family, tier).
#[derive(Debug, Clone, Default)]
pub struct Stockpile {
    entries: HashMap<(AmmoFamily, AmmoTier), u32>,
}

impl Stockpile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, family: AmmoFamily, tier: AmmoTier, quantity: u32) -> Self {
        self.entries.insert((family, tier), quantity);
        self
    }
}

impl StockpileAccess for Stockpile {
    fn quantity(&self, family: AmmoFamily, tier: AmmoTier) -> u32 {
        self.entries.get(&(family, tier)).copied().unwrap_or(0)
    }

    fn debit(&mut self, family: AmmoFamily, tier: AmmoTier, amount: u32) -> bool {
        match self.entries.get_mut(&(family, tier)) {
            Some(quantity) if *quantity >= amount => {
                *quantity -= amount;
                true
            }
            _ => false,
        }
    }

    fn credit(&mut self, family: AmmoFamily, tier: AmmoTier, amount: u32) {
        *self.entries.entry((family, tier)).or_insert(0) += amount;
    }
}

/// Animation parameter block written by states, read by the (external)
/// animation layer. Mirrors the animator parameters of the reference
/// character rig.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimParams {
    pub move_x: f32,
    pub move_y: f32,
    pub running: bool,
    pub sprinting: bool,
    pub reloading: bool,
    pub hurt: bool,
    pub dead: bool,
    /// 0 = no weapon raised, 1..=3 = weapon variant (see WeaponType::anim_tag)
    pub weapon_tag: u8,
}

/// Navigation intent written by AI states and executed by the movement
/// system. Pathfinding proper is a collaborator concern; execution here is
/// straight-line steering.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavIntent {
    pub destination: Option<Vec2>,
    pub stopped: bool,
}
