#![allow(dead_code)]

mod components;
mod config;
mod constants;
mod events;
mod input;
mod scheduler;
mod sim;
mod spawning;
mod state_machine;
mod systems;

use std::path::Path;

use glam::Vec2;

use components::{AmmoFamily, AmmoTier, Health, Position, Stockpile, WeaponType};
use config::GameConfig;
use events::{FireCommand, GameEvent};
use input::PlayerInput;
use sim::Simulation;

const TICK_RATE: f32 = 60.0;
const DT: f32 = 1.0 / TICK_RATE;
/// How far the demo's hitscan resolution reaches (units)
const HITSCAN_RANGE: f32 = 30.0;
/// Half-angle of the hitscan cone (degrees)
const HITSCAN_SPREAD: f32 = 10.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Opt-in frame profiling: PUFFIN=1 cargo run, then attach puffin_viewer
    let _puffin_server = if std::env::var_os("PUFFIN").is_some() {
        puffin::set_scopes_on(true);
        let address = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        match puffin_http::Server::new(&address) {
            Ok(server) => Some(server),
            Err(err) => {
                tracing::warn!("failed to start puffin server: {err}");
                None
            }
        }
    } else {
        None
    };

    let config_path = Path::new("config.json");
    let config = if config_path.exists() {
        GameConfig::load(config_path)?
    } else {
        GameConfig::default()
    };

    let mut sim = Simulation::new(config)?;

    let player = sim.spawn_player(
        Vec2::ZERO,
        WeaponType::Rifle,
        Stockpile::new()
            .with(AmmoFamily::RifleAmmo, AmmoTier::clamped(1), 60)
            .with(AmmoFamily::RifleAmmo, AmmoTier::clamped(2), 30),
    );
    sim.spawn_enemy(
        Vec2::new(0.0, 12.0),
        -Vec2::Y,
        Stockpile::new().with(AmmoFamily::PistolAmmo, AmmoTier::clamped(1), 40),
        1,
    );
    sim.spawn_enemy(
        Vec2::new(8.0, -6.0),
        Vec2::X,
        Stockpile::new().with(AmmoFamily::PistolAmmo, AmmoTier::clamped(1), 40),
        2,
    );

    // A scripted fifteen seconds: walk in, sprint, trade fire, reload
    let script: &[(f32, PlayerInput)] = &[
        (0.2, PlayerInput::Move(Vec2::Y)),
        (1.0, PlayerInput::Sprint(true)),
        (3.0, PlayerInput::Sprint(false)),
        (3.1, PlayerInput::Move(Vec2::ZERO)),
        (3.5, PlayerInput::Shoot),
        (4.5, PlayerInput::Shoot),
        (5.5, PlayerInput::Reload),
        (9.0, PlayerInput::Shoot),
        (11.0, PlayerInput::Move(Vec2::new(-1.0, 0.0))),
        (13.0, PlayerInput::Move(Vec2::ZERO)),
    ];
    let mut next_cue = 0;

    let total_ticks = (15.0 * TICK_RATE) as u32;
    for _ in 0..total_ticks {
        puffin::GlobalProfiler::lock().new_frame();

        while next_cue < script.len() && script[next_cue].0 <= sim.time() {
            sim.queue_input(script[next_cue].1);
            next_cue += 1;
        }

        sim.tick(DT);

        for shot in sim.take_shots() {
            if let Some(target) = resolve_hitscan(&sim, &shot) {
                sim.report_hit(target, shot.damage, Some(shot.shooter));
            }
        }

        for event in sim.drain_events() {
            log_event(&sim, player, &event);
        }
    }

    tracing::info!(time = sim.time(), "demo complete");
    Ok(())
}

/// Stand-in for the external collision layer: the nearest living actor
/// inside a narrow cone along the shot direction.
fn resolve_hitscan(sim: &Simulation, shot: &FireCommand) -> Option<hecs::Entity> {
    let mut nearest: Option<(hecs::Entity, f32)> = None;

    for (entity, (position, health)) in sim.world().query::<(&Position, &Health)>().iter() {
        if entity == shot.shooter || health.is_dead() {
            continue;
        }
        let to_target = position.pos - shot.origin;
        let distance = to_target.length();
        if distance > HITSCAN_RANGE {
            continue;
        }
        if systems::enemy_ai::angle_between_degrees(shot.direction, to_target) > HITSCAN_SPREAD {
            continue;
        }
        if nearest.map_or(true, |(_, best)| distance < best) {
            nearest = Some((entity, distance));
        }
    }

    nearest.map(|(entity, _)| entity)
}

fn log_event(sim: &Simulation, player: hecs::Entity, event: &GameEvent) {
    match event {
        GameEvent::AmmoChanged { family, total, tier } => {
            tracing::info!(?family, total = *total, tier = tier.level(), "ammo changed");
        }
        GameEvent::Damage {
            target,
            damage,
            remaining_health,
        } => {
            let who = if *target == player { "player" } else { "enemy" };
            tracing::info!(
                who,
                damage = *damage,
                remaining_health = *remaining_health,
                "hit landed"
            );
        }
        GameEvent::HealthChanged { .. } => {}
        GameEvent::Died { target, killer } => {
            let who = if *target == player { "player" } else { "enemy" };
            tracing::info!(who, ?killer, time = sim.time(), "death");
        }
        GameEvent::AiStateChanged { entity, state } => {
            tracing::debug!(?entity, ?state, "ai transition");
        }
    }
}
