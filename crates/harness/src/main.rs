//! Scripted duel that drives the mechanics engine end to end.
//!
//! Usage: `mechanics-harness [DATA_DIR]`. Without a directory the bundled
//! content is used. Set `RUST_LOG=mechanics=debug` to follow the bus.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use mechanics_content::{AbilityLoader, ContentFactory};
use mechanics_core::{
    BoardPos, EntityId, Event, EventType, KnownAbilities, LifeEnergy, ResistPack, Sid, Simulation,
    StatBlock, StatId, Team,
};
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let (config, (database, report)) = match std::env::args().nth(1) {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            let config = factory.load_config()?;
            let abilities = factory
                .load_abilities(&config)
                .with_context(|| format!("loading {}", factory.data_dir().display()))?;
            (config, abilities)
        }
        None => {
            let config = ContentFactory::bundled().load_config()?;
            let abilities = AbilityLoader::load_embedded(&config)?;
            (config, abilities)
        }
    };
    for (name, error) in &report.skipped {
        warn!(%name, %error, "ability skipped");
    }
    info!(loaded = report.loaded.len(), seed = config.battle_seed, "content ready");

    let mut sim = Simulation::new(config, Arc::new(database));
    sim.attach_abilities_to_all();

    let player = spawn(
        &mut sim,
        0,
        &[(StatId::OffensiveAbility, 200.0), (StatId::CritMultiplier, 1.5)],
        100.0,
    )?;
    let enemy = spawn(&mut sim, 1, &[(StatId::DefensiveAbility, 180.0)], 120.0)?;
    sim.world_mut()
        .insert(player, KnownAbilities::from_ids([Sid::new("ShiverStrike")]))?;

    sim.start_battle();
    sim.begin_turn(1);
    for round in 1..=3 {
        let delivered = sim.publish(Event::between(
            EventType::SpellCastResolved,
            player,
            Some(enemy),
        ));
        info!(
            round,
            delivered,
            enemy_hp = hp(&sim, enemy),
            "cast ShiverStrike"
        );
        sim.tick(2.0);
    }
    sim.end_battle();

    info!(
        player_hp = hp(&sim, player),
        enemy_hp = hp(&sim, enemy),
        "duel over"
    );
    Ok(())
}

fn spawn(sim: &mut Simulation, team: u8, stats: &[(StatId, f32)], max_hp: f32) -> Result<EntityId> {
    let world = sim.world_mut();
    let unit = world.spawn();
    world.insert(unit, Team(team))?;
    world.insert(unit, BoardPos::new(0, 0))?;
    world.insert(unit, StatBlock::from_base(stats))?;
    world.insert(unit, ResistPack::new())?;
    world.insert(unit, LifeEnergy::full(max_hp, 50.0))?;
    Ok(unit)
}

fn hp(sim: &Simulation, unit: EntityId) -> f32 {
    sim.world().try_get::<LifeEnergy>(unit).map_or(0.0, |life| life.hp)
}
