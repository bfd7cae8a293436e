//! Player-controlled actor state graph.
//!
//! Six states over the generic engine: Idle, Running, Sprinting, Shooting
//! (one state parameterized by weapon), Reloading, Hurt. Transitions are
//! input-driven plus self-timed countdowns; every transition goes to a
//! freshly constructed state so per-state timers restart naturally.
//!
//! Hurt is universal: every state's fallthrough routes a Hurt input to the
//! Hurt state, except Hurt and Reloading themselves, which absorb it so an
//! incapacitated actor cannot be re-staggered into a transition loop.

use glam::Vec2;
use hecs::Entity;

use crate::components::{AmmoPouch, AnimParams, Stockpile, WeaponType};
use crate::constants::*;
use crate::events::{FireCommand, GameEvent};
use crate::input::{InputSnapshot, PlayerInput};
use crate::state_machine::{State, StateContext, StateId, StateMachine, Transition};
use crate::systems::ammo::{self, ShotContext};
use crate::systems::movement::rotate_towards;

pub const IDLE: StateId = StateId(0);
pub const RUNNING: StateId = StateId(1);
pub const SPRINTING: StateId = StateId(2);
pub const SHOOTING: StateId = StateId(3);
pub const RELOADING: StateId = StateId(4);
pub const HURT: StateId = StateId(5);

/// Everything the player's states read and write during a tick: the
/// machine's owner context, owned by the actor component.
#[derive(Debug)]
pub struct PlayerBody {
    pub entity: Entity,
    /// Delta time of the current tick, written by the simulation
    pub dt: f32,
    /// World position, synced in each tick; states move via `motion`
    pub position: Vec2,
    /// Facing direction; states steer it, movement mirrors it out
    pub forward: Vec2,
    pub input: InputSnapshot,
    pub equipped: WeaponType,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub rotation_speed: f32,
    pub anim: AnimParams,
    /// Velocity intent for this tick; zeroed by the simulation before
    /// each machine update
    pub motion: Vec2,
    pub ammo: AmmoPouch,
    pub stockpile: Stockpile,
    /// Outboxes drained by the simulation at end of tick
    pub events: Vec<GameEvent>,
    pub shots: Vec<FireCommand>,
}

impl PlayerBody {
    pub fn new(entity: Entity, equipped: WeaponType, stockpile: Stockpile) -> Self {
        Self {
            entity,
            dt: 0.0,
            position: Vec2::ZERO,
            forward: Vec2::Y,
            input: InputSnapshot::default(),
            equipped,
            walk_speed: DEFAULT_WALK_SPEED,
            sprint_speed: DEFAULT_SPRINT_SPEED,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            anim: AnimParams::default(),
            motion: Vec2::ZERO,
            ammo: AmmoPouch::new(),
            stockpile,
            events: Vec::new(),
            shots: Vec::new(),
        }
    }
}

impl StateContext for PlayerBody {
    type Input = PlayerInput;
}

/// The player actor: body plus its state machine, spawned in Idle.
pub struct PlayerActor {
    pub body: PlayerBody,
    pub machine: StateMachine<PlayerBody>,
}

impl PlayerActor {
    pub fn new(mut body: PlayerBody) -> Self {
        let machine = StateMachine::new(Box::new(IdleState), &mut body);
        Self { body, machine }
    }
}

/// Shared fallthrough: any state that doesn't claim an input routes Hurt
/// to the Hurt state and ignores the rest.
fn hurt_interrupt(input: &PlayerInput) -> Option<Transition<PlayerBody>> {
    match input {
        PlayerInput::Hurt => Some(Transition::Change(Box::new(HurtState::new()))),
        _ => None,
    }
}

/// Pick the post-action state: Running if the stick is held, Idle if not.
fn running_or_idle(body: &PlayerBody) -> Transition<PlayerBody> {
    if body.input.is_moving() {
        Transition::Change(Box::new(RunningState))
    } else {
        Transition::Change(Box::new(IdleState))
    }
}

/// Steer and move at `speed`, and keep the movement animation axes fed.
fn steer(body: &mut PlayerBody, speed: f32) {
    let dir = body.input.move_dir;
    if dir != Vec2::ZERO {
        let move_dir = dir.normalize_or_zero();
        body.forward = rotate_towards(body.forward, move_dir, body.rotation_speed * body.dt);
        body.motion = move_dir * speed;
    }
    body.anim.move_x = dir.x;
    body.anim.move_y = dir.y;
}

pub struct IdleState;

impl State<PlayerBody> for IdleState {
    fn id(&self) -> StateId {
        IDLE
    }

    fn on_enter(&mut self, body: &mut PlayerBody) {
        body.anim.move_x = 0.0;
        body.anim.move_y = 0.0;
        body.anim.reloading = false;
        body.anim.sprinting = false;
        body.anim.hurt = false;
    }

    fn handle_input(
        &mut self,
        input: &PlayerInput,
        body: &mut PlayerBody,
    ) -> Option<Transition<PlayerBody>> {
        match input {
            PlayerInput::Move(dir) if *dir != Vec2::ZERO => {
                Some(Transition::Change(Box::new(RunningState)))
            }
            PlayerInput::Shoot => Some(Transition::Change(Box::new(ShootingState::new(
                body.equipped,
            )))),
            PlayerInput::Sprint(true) => Some(Transition::Change(Box::new(SprintingState))),
            _ => hurt_interrupt(input),
        }
    }
}

pub struct RunningState;

impl State<PlayerBody> for RunningState {
    fn id(&self) -> StateId {
        RUNNING
    }

    fn on_enter(&mut self, body: &mut PlayerBody) {
        body.anim.reloading = false;
        body.anim.sprinting = false;
    }

    fn on_stay(&mut self, body: &mut PlayerBody) -> Option<Transition<PlayerBody>> {
        let speed = body.walk_speed;
        steer(body, speed);
        None
    }

    fn handle_input(
        &mut self,
        input: &PlayerInput,
        body: &mut PlayerBody,
    ) -> Option<Transition<PlayerBody>> {
        match input {
            PlayerInput::Move(dir) if *dir == Vec2::ZERO => {
                Some(Transition::Change(Box::new(IdleState)))
            }
            PlayerInput::Shoot => Some(Transition::Change(Box::new(ShootingState::new(
                body.equipped,
            )))),
            PlayerInput::Reload => Some(Transition::Change(Box::new(ReloadingState::new()))),
            PlayerInput::Sprint(true) => Some(Transition::Change(Box::new(SprintingState))),
            _ => hurt_interrupt(input),
        }
    }
}

pub struct SprintingState;

impl State<PlayerBody> for SprintingState {
    fn id(&self) -> StateId {
        SPRINTING
    }

    fn on_enter(&mut self, body: &mut PlayerBody) {
        body.anim.sprinting = true;
    }

    fn on_stay(&mut self, body: &mut PlayerBody) -> Option<Transition<PlayerBody>> {
        let speed = body.sprint_speed;
        steer(body, speed);
        None
    }

    fn on_exit(&mut self, body: &mut PlayerBody) {
        body.anim.sprinting = false;
    }

    fn handle_input(
        &mut self,
        input: &PlayerInput,
        body: &mut PlayerBody,
    ) -> Option<Transition<PlayerBody>> {
        match input {
            // Sprint toggled off: drop to Running while moving, Idle otherwise
            PlayerInput::Sprint(false) => Some(running_or_idle(body)),
            PlayerInput::Move(dir) if *dir == Vec2::ZERO => {
                Some(Transition::Change(Box::new(IdleState)))
            }
            _ => hurt_interrupt(input),
        }
    }
}

/// Shooting, parameterized by weapon: the three weapon variants differ
/// only in duration and animation tag.
pub struct ShootingState {
    weapon: WeaponType,
    timer: f32,
}

impl ShootingState {
    pub fn new(weapon: WeaponType) -> Self {
        Self {
            weapon,
            timer: weapon.shoot_duration(),
        }
    }
}

impl State<PlayerBody> for ShootingState {
    fn id(&self) -> StateId {
        SHOOTING
    }

    fn on_enter(&mut self, body: &mut PlayerBody) {
        body.anim.weapon_tag = self.weapon.anim_tag();
        // One round leaves the ledger immediately; a denial is a dry fire
        // and the state still plays out its recovery time.
        let shot = ShotContext {
            shooter: body.entity,
            origin: body.position + body.forward * MUZZLE_OFFSET,
            direction: body.forward,
        };
        ammo::fire(
            &mut body.ammo,
            &mut body.stockpile,
            self.weapon,
            shot,
            &mut body.events,
            &mut body.shots,
        );
    }

    fn on_stay(&mut self, body: &mut PlayerBody) -> Option<Transition<PlayerBody>> {
        self.timer -= body.dt;
        if self.timer <= 0.0 {
            Some(running_or_idle(body))
        } else {
            None
        }
    }

    fn on_exit(&mut self, body: &mut PlayerBody) {
        // Forced exits (Hurt, Reload) must not leave the weapon raised
        body.anim.weapon_tag = 0;
    }

    fn handle_input(
        &mut self,
        input: &PlayerInput,
        _body: &mut PlayerBody,
    ) -> Option<Transition<PlayerBody>> {
        match input {
            PlayerInput::Reload => Some(Transition::Change(Box::new(ReloadingState::new()))),
            _ => hurt_interrupt(input),
        }
    }
}

pub struct ReloadingState {
    timer: f32,
}

impl ReloadingState {
    pub fn new() -> Self {
        Self {
            timer: RELOAD_DURATION,
        }
    }
}

impl State<PlayerBody> for ReloadingState {
    fn id(&self) -> StateId {
        RELOADING
    }

    fn on_enter(&mut self, body: &mut PlayerBody) {
        body.anim.reloading = true;
    }

    fn on_stay(&mut self, body: &mut PlayerBody) -> Option<Transition<PlayerBody>> {
        self.timer -= body.dt;
        if self.timer <= 0.0 {
            // The actual ledger reload happens when the animation finishes
            ammo::reload(
                &mut body.ammo,
                &mut body.stockpile,
                body.equipped,
                &mut body.events,
            );
            Some(running_or_idle(body))
        } else {
            None
        }
    }

    fn on_exit(&mut self, body: &mut PlayerBody) {
        body.anim.reloading = false;
    }

    fn handle_input(
        &mut self,
        _input: &PlayerInput,
        _body: &mut PlayerBody,
    ) -> Option<Transition<PlayerBody>> {
        // Absorbs everything, Hurt included: a reload is not interrupted
        None
    }
}

pub struct HurtState {
    timer: f32,
}

impl HurtState {
    pub fn new() -> Self {
        Self {
            timer: HURT_DURATION,
        }
    }
}

impl State<PlayerBody> for HurtState {
    fn id(&self) -> StateId {
        HURT
    }

    fn on_enter(&mut self, body: &mut PlayerBody) {
        body.anim.hurt = true;
    }

    fn on_stay(&mut self, body: &mut PlayerBody) -> Option<Transition<PlayerBody>> {
        self.timer -= body.dt;
        if self.timer <= 0.0 {
            Some(running_or_idle(body))
        } else {
            None
        }
    }

    fn on_exit(&mut self, body: &mut PlayerBody) {
        body.anim.hurt = false;
    }

    fn handle_input(
        &mut self,
        _input: &PlayerInput,
        _body: &mut PlayerBody,
    ) -> Option<Transition<PlayerBody>> {
        // No input while staggered; further Hurt does not restart the timer
        None
    }
}
