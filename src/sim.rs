//! Simulation driver: owns the world and runs the tick pipeline.
//!
//! One logical frame = one `tick(dt)`. Phase order inside a tick:
//!
//! 1. queued player input is fed to the player machine
//! 2. bodies sync (dt, transforms, enemy perception) and every machine
//!    runs its `on_stay`
//! 3. movement applies the motion/nav intents the states wrote
//! 4. AI transition evaluation runs against post-movement positions
//! 5. actor outboxes drain into the global queues
//! 6. due deferred callbacks are serviced
//!
//! `on_stay` always completes before any evaluator-driven transition, so
//! an agent can never act in one state and transition out of it from
//! stale data within the same read.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Player, Position, Stockpile, WeaponType};
use crate::config::{ConfigError, GameConfig};
use crate::events::{EventQueue, FireCommand, GameEvent};
use crate::input::PlayerInput;
use crate::scheduler::{DeferredAction, DeferredQueue, GameClock};
use crate::spawning;
use crate::systems;
use crate::systems::enemy_ai::{self, EnemyActor};
use crate::systems::player_states::PlayerActor;

pub struct Simulation {
    world: World,
    clock: GameClock,
    deferred: DeferredQueue,
    events: EventQueue,
    shots: Vec<FireCommand>,
    pending_input: Vec<PlayerInput>,
    config: GameConfig,
}

impl Simulation {
    /// Build a simulation over a validated config.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            clock: GameClock::new(),
            deferred: DeferredQueue::new(),
            events: EventQueue::new(),
            shots: Vec::new(),
            pending_input: Vec::new(),
            config,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn time(&self) -> f32 {
        self.clock.time
    }

    pub fn spawn_player(&mut self, pos: Vec2, weapon: WeaponType, stockpile: Stockpile) -> Entity {
        spawning::spawn_player(&mut self.world, &self.config, pos, weapon, stockpile)
    }

    pub fn spawn_enemy(
        &mut self,
        pos: Vec2,
        facing: Vec2,
        stockpile: Stockpile,
        seed: u64,
    ) -> Entity {
        spawning::spawn_enemy(&mut self.world, &self.config, pos, facing, stockpile, seed)
    }

    /// Queue a discrete input event for the next tick. The input layer
    /// delivers at most one event per type per tick.
    pub fn queue_input(&mut self, input: PlayerInput) {
        self.pending_input.push(input);
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self, dt: f32) {
        puffin::profile_function!();
        self.clock.advance(dt);

        self.update_players(dt);
        self.update_enemies(dt);

        systems::movement::apply_player_motion(&mut self.world, dt);
        systems::movement::apply_enemy_nav(&mut self.world, dt);

        self.evaluate_ai_transitions();
        self.drain_outboxes();
        self.service_deferred();
    }

    /// Report a projectile hit resolved by the external collision layer.
    /// Applies damage and routes the interrupt: players take a Hurt input,
    /// enemies translate to Hurt, or to Die at zero health.
    pub fn report_hit(&mut self, target: Entity, damage: i32, attacker: Option<Entity>) {
        let dealt =
            systems::combat::apply_damage(&mut self.world, target, damage, attacker, &mut self.events);
        if dealt <= 0 {
            return;
        }

        let dead = systems::combat::is_entity_dead(&self.world, target);

        if self.world.get::<&Player>(target).is_ok() {
            if let Ok(mut actor) = self.world.get::<&mut PlayerActor>(target) {
                let actor = &mut *actor;
                actor.machine.handle_input(&PlayerInput::Hurt, &mut actor.body);
            }
            return;
        }

        if let Ok(mut actor) = self.world.get::<&mut EnemyActor>(target) {
            let actor = &mut *actor;
            if actor.machine.current_id() == enemy_ai::DIE {
                return;
            }
            let before = actor.machine.current_id();
            if dead {
                actor.machine.translate(enemy_ai::DIE, &mut actor.body);
            } else {
                actor.machine.translate(enemy_ai::HURT, &mut actor.body);
            }
            if actor.machine.current_id() != before {
                self.events.push(GameEvent::AiStateChanged {
                    entity: target,
                    state: actor.machine.current_id(),
                });
            }
        }

        if dead {
            // A corpse has no pending cosmetic cleanup
            self.deferred.cancel_for_entity(target);
        }
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }

    /// Take all fire commands emitted since the last call. The external
    /// projectile layer spawns bullets from these.
    pub fn take_shots(&mut self) -> Vec<FireCommand> {
        std::mem::take(&mut self.shots)
    }

    fn update_players(&mut self, dt: f32) {
        puffin::profile_scope!("update_players");
        let inputs = std::mem::take(&mut self.pending_input);

        for (_, (position, health, actor)) in self
            .world
            .query_mut::<(&Position, &mut crate::components::Health, &mut PlayerActor)>()
        {
            let body = &mut actor.body;
            body.dt = dt;
            body.position = position.pos;
            // Motion intents are only valid for the tick that writes them
            body.motion = Vec2::ZERO;
            health.tick(dt);

            if health.is_dead() {
                continue;
            }

            for input in &inputs {
                // Latch the held state before the machine reacts to it
                match input {
                    PlayerInput::Move(dir) => body.input.move_dir = *dir,
                    PlayerInput::Sprint(on) => body.input.sprinting = *on,
                    _ => {}
                }
                actor.machine.handle_input(input, body);
            }
            actor.machine.update(body);
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        puffin::profile_scope!("update_enemies");
        let target = self.player_position();

        for (entity, (position, health, actor)) in self
            .world
            .query_mut::<(&Position, &mut crate::components::Health, &mut EnemyActor)>()
        {
            let body = &mut actor.body;
            body.dt = dt;
            body.position = position.pos;
            health.tick(dt);

            if let Some(target) = target {
                enemy_ai::perceive(body, target);
            }
            // Self-timed transitions (Hurt recovering to Patrol) happen here
            let before = actor.machine.current_id();
            actor.machine.update(body);
            if actor.machine.current_id() != before {
                body.events.push(GameEvent::AiStateChanged {
                    entity,
                    state: actor.machine.current_id(),
                });
            }
        }
    }

    /// The external transition pass: perception against post-movement
    /// positions, then the distance/FOV table.
    fn evaluate_ai_transitions(&mut self) {
        puffin::profile_scope!("evaluate_ai_transitions");
        let Some(target) = self.player_position() else {
            return;
        };

        for (entity, (position, actor)) in
            self.world.query_mut::<(&Position, &mut EnemyActor)>()
        {
            let body = &mut actor.body;
            body.position = position.pos;
            enemy_ai::perceive(body, target);

            let before = actor.machine.current_id();
            enemy_ai::evaluate_transitions(&mut actor.machine, body);
            if actor.machine.current_id() != before {
                body.events.push(GameEvent::AiStateChanged {
                    entity,
                    state: actor.machine.current_id(),
                });
            }
        }
    }

    fn drain_outboxes(&mut self) {
        let now = self.clock.time;

        for (_, actor) in self.world.query_mut::<&mut PlayerActor>() {
            self.events.append(&mut actor.body.events);
            self.shots.extend(actor.body.shots.drain(..));
        }
        for (entity, actor) in self.world.query_mut::<&mut EnemyActor>() {
            self.events.append(&mut actor.body.events);
            self.shots.extend(actor.body.shots.drain(..));
            for (delay, action) in actor.body.deferred.drain(..) {
                self.deferred.schedule(entity, now + delay, action);
            }
        }
    }

    fn service_deferred(&mut self) {
        for (entity, action) in self.deferred.pop_due(self.clock.time) {
            match action {
                DeferredAction::ResetWeaponTag => {
                    if let Ok(mut actor) = self.world.get::<&mut EnemyActor>(entity) {
                        actor.body.anim.weapon_tag = 0;
                    }
                }
            }
        }
    }

    fn player_position(&mut self) -> Option<Vec2> {
        self.world
            .query_mut::<(&Position, &Player)>()
            .into_iter()
            .next()
            .map(|(_, (position, _))| position.pos)
    }
}
