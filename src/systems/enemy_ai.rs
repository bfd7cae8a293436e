//! Enemy AI state graph: Patrol, Chase, Shoot, Hurt, Die.
//!
//! Unlike the player graph, transition decisions live outside the states:
//! `evaluate_transitions` inspects distance-to-target and field of view
//! once per tick (after every state has run) and swaps pre-registered,
//! long-lived states with `translate`. Each state's own `on_stay` only
//! performs local behavior. The two exceptions are Hurt, which times
//! itself out back to Patrol, and Die, which is terminal.

use glam::Vec2;
use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{AmmoPouch, AnimParams, NavIntent, Stockpile};
use crate::config::AiProfile;
use crate::constants::*;
use crate::events::{FireCommand, GameEvent};
use crate::scheduler::DeferredAction;
use crate::state_machine::{State, StateContext, StateId, StateMachine, Transition};
use crate::systems::ammo::{self, ShotContext};
use crate::systems::movement::rotate_towards;

pub const PATROL: StateId = StateId(0);
pub const CHASE: StateId = StateId(1);
pub const SHOOT: StateId = StateId(2);
pub const HURT: StateId = StateId(3);
pub const DIE: StateId = StateId(4);

/// The AI states' owner context, owned by the enemy actor component.
#[derive(Debug)]
pub struct EnemyBody {
    pub entity: Entity,
    pub dt: f32,
    pub position: Vec2,
    pub forward: Vec2,
    /// Perception, written by `perceive` before each evaluation
    pub target_position: Vec2,
    pub distance_to_target: f32,
    pub target_in_fov: bool,
    pub profile: AiProfile,
    pub anim: AnimParams,
    pub nav: NavIntent,
    pub ammo: AmmoPouch,
    pub stockpile: Stockpile,
    pub rng: StdRng,
    /// Outboxes drained by the simulation at end of tick
    pub events: Vec<GameEvent>,
    pub shots: Vec<FireCommand>,
    /// (delay seconds, action) pairs for the deferred callback queue
    pub deferred: Vec<(f32, DeferredAction)>,
}

impl EnemyBody {
    pub fn new(entity: Entity, profile: AiProfile, stockpile: Stockpile, seed: u64) -> Self {
        Self {
            entity,
            dt: 0.0,
            position: Vec2::ZERO,
            forward: Vec2::Y,
            target_position: Vec2::ZERO,
            distance_to_target: f32::MAX,
            target_in_fov: false,
            profile,
            anim: AnimParams::default(),
            nav: NavIntent::default(),
            ammo: AmmoPouch::new(),
            stockpile,
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
            shots: Vec::new(),
            deferred: Vec::new(),
        }
    }
}

impl StateContext for EnemyBody {
    // AI states have no player-input semantics; HandleInput is a no-op.
    type Input = ();
}

/// An AI-controlled actor: body plus its machine, spawned patrolling with
/// the full state set registered for `translate`.
pub struct EnemyActor {
    pub body: EnemyBody,
    pub machine: StateMachine<EnemyBody>,
}

impl EnemyActor {
    pub fn new(mut body: EnemyBody) -> Self {
        let mut machine = StateMachine::new(Box::new(PatrolState::new()), &mut body);
        machine.add_state(Box::new(ChaseState));
        machine.add_state(Box::new(ShootState::new()));
        machine.add_state(Box::new(HurtState::new()));
        machine.add_state(Box::new(DieState));
        Self { body, machine }
    }
}

/// Unsigned angle between two directions in degrees.
pub fn angle_between_degrees(a: Vec2, b: Vec2) -> f32 {
    let a = a.normalize_or_zero();
    let b = b.normalize_or_zero();
    if a == Vec2::ZERO || b == Vec2::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Update the agent's view of its target: distance and whether the target
/// sits inside the view cone.
pub fn perceive(body: &mut EnemyBody, target: Vec2) {
    body.target_position = target;
    let to_target = target - body.position;
    body.distance_to_target = to_target.length();
    body.target_in_fov =
        angle_between_degrees(body.forward, to_target) <= body.profile.fov_degrees * 0.5;
}

/// The per-tick transition evaluator. Runs after all `on_stay` calls and
/// drives Patrol/Chase/Shoot against the engagement bands. Hurt times
/// itself out; Die never transitions again.
pub fn evaluate_transitions(machine: &mut StateMachine<EnemyBody>, body: &mut EnemyBody) {
    let current = machine.current_id();
    if current == DIE {
        return;
    }

    let distance = body.distance_to_target;
    let in_fov = body.target_in_fov;
    let shoot_range = body.profile.shoot_range;
    let chase_range = body.profile.chase_range;
    let lose_range = body.profile.lose_range;

    match current {
        id if id == PATROL => {
            if distance <= lose_range && in_fov {
                if distance <= shoot_range {
                    machine.translate(SHOOT, body);
                } else {
                    machine.translate(CHASE, body);
                }
            }
        }
        id if id == CHASE => {
            if distance > lose_range {
                machine.translate(PATROL, body);
            } else if distance <= shoot_range && in_fov {
                machine.translate(SHOOT, body);
            }
        }
        id if id == SHOOT => {
            if distance > chase_range {
                machine.translate(CHASE, body);
            } else if distance > lose_range {
                machine.translate(PATROL, body);
            }
        }
        // Hurt recovers on its own timer
        _ => {}
    }
}

/// Pick a random reachable point within the patrol radius.
fn pick_patrol_point(body: &mut EnemyBody) -> Vec2 {
    let angle = body.rng.gen_range(0.0..std::f32::consts::TAU);
    let radius = body.rng.gen_range(0.0..body.profile.patrol_range);
    body.position + Vec2::from_angle(angle) * radius
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatrolPhase {
    Moving,
    Idling,
}

/// Patrol: walk to a random nearby point, idle, repeat.
pub struct PatrolState {
    phase: PatrolPhase,
    timer: f32,
}

impl PatrolState {
    pub fn new() -> Self {
        Self {
            phase: PatrolPhase::Moving,
            timer: 0.0,
        }
    }
}

impl State<EnemyBody> for PatrolState {
    fn id(&self) -> StateId {
        PATROL
    }

    fn on_enter(&mut self, body: &mut EnemyBody) {
        body.anim.weapon_tag = 0;
        self.phase = PatrolPhase::Moving;
        self.timer = 0.0;

        body.anim.running = true;
        let point = pick_patrol_point(body);
        body.nav.destination = Some(point);
        body.nav.stopped = false;
    }

    fn on_stay(&mut self, body: &mut EnemyBody) -> Option<Transition<EnemyBody>> {
        self.timer += body.dt;

        match self.phase {
            PatrolPhase::Moving => {
                let arrived = body
                    .nav
                    .destination
                    .map_or(true, |d| body.position.distance(d) <= ARRIVAL_THRESHOLD);
                if arrived || self.timer >= PATROL_MOVE_DURATION {
                    self.phase = PatrolPhase::Idling;
                    self.timer = 0.0;
                    body.anim.running = false;
                    body.nav.stopped = true;
                }
            }
            PatrolPhase::Idling => {
                if self.timer >= PATROL_IDLE_DURATION {
                    self.phase = PatrolPhase::Moving;
                    self.timer = 0.0;
                    body.anim.running = true;
                    let point = pick_patrol_point(body);
                    body.nav.destination = Some(point);
                    body.nav.stopped = false;
                }
            }
        }
        None
    }

    fn on_exit(&mut self, body: &mut EnemyBody) {
        body.anim.running = false;
        body.nav.stopped = true;
    }
}

/// Chase: keep steering toward the target's latest position.
pub struct ChaseState;

impl State<EnemyBody> for ChaseState {
    fn id(&self) -> StateId {
        CHASE
    }

    fn on_enter(&mut self, body: &mut EnemyBody) {
        body.anim.weapon_tag = 0;
        body.anim.running = true;
        body.nav.destination = Some(body.target_position);
        body.nav.stopped = false;
    }

    fn on_stay(&mut self, body: &mut EnemyBody) -> Option<Transition<EnemyBody>> {
        body.anim.running = true;
        body.nav.destination = Some(body.target_position);
        None
    }

    fn on_exit(&mut self, body: &mut EnemyBody) {
        body.anim.running = false;
        body.nav.stopped = true;
    }
}

/// Shoot: stand still, face the target, fire on a randomized interval.
pub struct ShootState {
    timer: f32,
    cooldown: f32,
}

impl ShootState {
    pub fn new() -> Self {
        Self {
            timer: 0.0,
            cooldown: 0.0,
        }
    }
}

impl State<EnemyBody> for ShootState {
    fn id(&self) -> StateId {
        SHOOT
    }

    fn on_enter(&mut self, body: &mut EnemyBody) {
        self.timer = 0.0;
        self.cooldown = body
            .rng
            .gen_range(AI_SHOOT_INTERVAL_MIN..AI_SHOOT_INTERVAL_MAX);
        body.nav.stopped = true;
        body.nav.destination = None;
        body.anim.running = false;
    }

    fn on_stay(&mut self, body: &mut EnemyBody) -> Option<Transition<EnemyBody>> {
        let to_target = body.target_position - body.position;
        if to_target != Vec2::ZERO {
            let rotation = body.profile.rotation_speed * body.dt;
            body.forward = rotate_towards(body.forward, to_target.normalize_or_zero(), rotation);
        }

        self.timer += body.dt;
        if self.timer >= self.cooldown {
            let direction = if to_target != Vec2::ZERO {
                to_target.normalize_or_zero()
            } else {
                body.forward
            };
            let shot = ShotContext {
                shooter: body.entity,
                origin: body.position + body.forward * MUZZLE_OFFSET,
                direction,
            };
            let weapon = body.profile.weapon;
            if ammo::fire(
                &mut body.ammo,
                &mut body.stockpile,
                weapon,
                shot,
                &mut body.events,
                &mut body.shots,
            ) {
                // Pulse the weapon animation tag, clear it a beat later
                body.anim.weapon_tag = weapon.anim_tag();
                body.deferred
                    .push((WEAPON_TAG_RESET_DELAY, DeferredAction::ResetWeaponTag));
            }

            self.timer = 0.0;
            self.cooldown = body
                .rng
                .gen_range(AI_SHOOT_INTERVAL_MIN..AI_SHOOT_INTERVAL_MAX);
        }
        None
    }

    fn on_exit(&mut self, body: &mut EnemyBody) {
        // Clear immediately rather than waiting for the deferred reset
        body.anim.weapon_tag = 0;
    }
}

/// Hurt: brief stagger, then unconditionally back to Patrol.
pub struct HurtState {
    timer: f32,
}

impl HurtState {
    pub fn new() -> Self {
        Self { timer: 0.0 }
    }
}

impl State<EnemyBody> for HurtState {
    fn id(&self) -> StateId {
        HURT
    }

    fn on_enter(&mut self, body: &mut EnemyBody) {
        self.timer = 0.0;
        body.anim.hurt = true;
        body.nav.stopped = true;
    }

    fn on_stay(&mut self, body: &mut EnemyBody) -> Option<Transition<EnemyBody>> {
        self.timer += body.dt;
        if self.timer >= body.profile.hurt_duration {
            Some(Transition::To(PATROL))
        } else {
            None
        }
    }

    fn on_exit(&mut self, body: &mut EnemyBody) {
        body.anim.hurt = false;
        body.nav.stopped = false;
    }
}

/// Die: terminal. AI processing for this agent ends here.
pub struct DieState;

impl State<EnemyBody> for DieState {
    fn id(&self) -> StateId {
        DIE
    }

    fn on_enter(&mut self, body: &mut EnemyBody) {
        body.nav.stopped = true;
        body.nav.destination = None;
        body.anim.running = false;
        body.anim.weapon_tag = 0;
        body.anim.dead = true;
        tracing::info!(entity = ?body.entity, "agent died");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AmmoFamily, AmmoTier, StockpileAccess};
    use hecs::World;

    const DT: f32 = 1.0 / 60.0;

    fn enemy() -> EnemyActor {
        let mut world = World::new();
        let entity = world.spawn(());
        let stockpile = Stockpile::new().with(AmmoFamily::PistolAmmo, AmmoTier::MIN, 50);
        EnemyActor::new(EnemyBody::new(entity, AiProfile::default(), stockpile, 7))
    }

    fn run_seconds(actor: &mut EnemyActor, seconds: f32) {
        let ticks = (seconds / DT).ceil() as usize;
        actor.body.dt = DT;
        for _ in 0..ticks {
            actor.machine.update(&mut actor.body);
        }
    }

    /// Put the target at `distance` straight ahead (inside the FOV).
    fn see_target_at(body: &mut EnemyBody, distance: f32) {
        let target = body.position + body.forward * distance;
        perceive(body, target);
    }

    /// Put the target at `distance` directly behind (outside a 120° FOV).
    fn target_behind_at(body: &mut EnemyBody, distance: f32) {
        let target = body.position - body.forward * distance;
        perceive(body, target);
    }

    #[test]
    fn test_spawns_patrolling_with_destination() {
        let actor = enemy();
        assert_eq!(actor.machine.current_id(), PATROL);
        assert!(actor.body.nav.destination.is_some());
        assert!(actor.body.anim.running);
    }

    #[test]
    fn test_patrol_point_within_radius() {
        let mut actor = enemy();
        for _ in 0..50 {
            let point = pick_patrol_point(&mut actor.body);
            assert!(actor.body.position.distance(point) <= actor.body.profile.patrol_range);
        }
    }

    #[test]
    fn test_patrol_duty_cycle() {
        let mut actor = enemy();
        // Pin the destination far away so the walk phase ends on its
        // timer, not on arrival
        actor.body.nav.destination = Some(Vec2::new(100.0, 100.0));
        run_seconds(&mut actor, PATROL_MOVE_DURATION + DT);
        assert!(actor.body.nav.stopped);
        assert!(!actor.body.anim.running);

        // Idle phase ends and a fresh destination is picked
        run_seconds(&mut actor, PATROL_IDLE_DURATION + DT);
        assert!(!actor.body.nav.stopped);
        assert!(actor.body.anim.running);
        assert!(actor.body.nav.destination.is_some());
    }

    #[test]
    fn test_fov_angle_math() {
        assert!(angle_between_degrees(Vec2::Y, Vec2::Y) < 1e-3);
        assert!((angle_between_degrees(Vec2::Y, Vec2::X) - 90.0).abs() < 1e-3);
        assert!((angle_between_degrees(Vec2::Y, -Vec2::Y) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_perceive_sets_fov_flag() {
        let mut actor = enemy();
        see_target_at(&mut actor.body, 5.0);
        assert!(actor.body.target_in_fov);
        assert_eq!(actor.body.distance_to_target, 5.0);

        target_behind_at(&mut actor.body, 5.0);
        assert!(!actor.body.target_in_fov);
    }

    #[test]
    fn test_patrol_to_shoot_when_close_in_fov() {
        let mut actor = enemy();
        see_target_at(&mut actor.body, 5.0); // within shoot_range 7
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), SHOOT);
        assert!(actor.body.nav.stopped);
    }

    #[test]
    fn test_patrol_to_chase_when_seen_beyond_shoot_range() {
        let mut actor = enemy();
        see_target_at(&mut actor.body, 12.0); // within lose 15, beyond shoot 7
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), CHASE);
    }

    #[test]
    fn test_patrol_ignores_target_outside_fov() {
        let mut actor = enemy();
        target_behind_at(&mut actor.body, 5.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), PATROL);
    }

    #[test]
    fn test_chase_follows_and_gives_up() {
        let mut actor = enemy();
        see_target_at(&mut actor.body, 12.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), CHASE);
        assert_eq!(
            actor.body.nav.destination,
            Some(actor.body.target_position)
        );

        // Target escapes beyond lose_range
        see_target_at(&mut actor.body, 20.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), PATROL);
    }

    #[test]
    fn test_chase_to_shoot_when_in_range_and_fov() {
        let mut actor = enemy();
        see_target_at(&mut actor.body, 12.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        see_target_at(&mut actor.body, 6.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), SHOOT);
    }

    #[test]
    fn test_shoot_falls_back_to_chase() {
        let mut actor = enemy();
        see_target_at(&mut actor.body, 5.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), SHOOT);

        see_target_at(&mut actor.body, 11.0); // beyond chase_range 10
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), CHASE);
    }

    #[test]
    fn test_shoot_fires_within_interval_and_pulses_tag() {
        let mut actor = enemy();
        see_target_at(&mut actor.body, 5.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.machine.current_id(), SHOOT);

        run_seconds(&mut actor, AI_SHOOT_INTERVAL_MAX + DT);
        assert!(!actor.body.shots.is_empty());
        assert_eq!(actor.body.anim.weapon_tag, actor.body.profile.weapon.anim_tag());
        assert!(actor
            .body
            .deferred
            .iter()
            .any(|(_, action)| *action == DeferredAction::ResetWeaponTag));
        // The round came out of the agent's own stockpile
        assert!(actor.body.stockpile.quantity(AmmoFamily::PistolAmmo, AmmoTier::MIN) < 50);
    }

    #[test]
    fn test_shoot_exit_clears_weapon_tag() {
        let mut actor = enemy();
        see_target_at(&mut actor.body, 5.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        run_seconds(&mut actor, AI_SHOOT_INTERVAL_MAX + DT);

        see_target_at(&mut actor.body, 20.0);
        evaluate_transitions(&mut actor.machine, &mut actor.body);
        assert_eq!(actor.body.anim.weapon_tag, 0);
    }

    #[test]
    fn test_hurt_returns_to_patrol() {
        let mut actor = enemy();
        actor.machine.translate(HURT, &mut actor.body);
        assert!(actor.body.anim.hurt);

        let hurt_duration = actor.body.profile.hurt_duration + DT;
        run_seconds(&mut actor, hurt_duration);
        assert_eq!(actor.machine.current_id(), PATROL);
        assert!(!actor.body.anim.hurt);
    }

    #[test]
    fn test_die_is_terminal() {
        let mut actor = enemy();
        actor.machine.translate(DIE, &mut actor.body);
        assert!(actor.body.anim.dead);

        // No amount of stimulus moves a dead agent
        see_target_at(&mut actor.body, 2.0);
        for _ in 0..10 {
            evaluate_transitions(&mut actor.machine, &mut actor.body);
            actor.body.dt = DT;
            actor.machine.update(&mut actor.body);
        }
        assert_eq!(actor.machine.current_id(), DIE);
    }
}
