use std::sync::Arc;

use mechanics_content::AbilityLoader;
use mechanics_core::effect::params::{ApplyRr, ApplyStatus, DealDamage};
use mechanics_core::{
    BoardPos, CompiledEffectGraph, DamageBundle, DamageType, EffectNode, EngineConfig, EntityId,
    Event, EventType, KnownAbilities, LifeEnergy, ResistPack, RrStage, Sid, Simulation, StatBlock,
    StatId, StatusFlags, Team,
};

fn duel(names: &[&str]) -> (Simulation, EntityId, EntityId) {
    let config = EngineConfig::with_seed(9);
    let (database, report) = AbilityLoader::load_embedded(&config).unwrap();
    assert!(report.is_clean());

    let mut sim = Simulation::new(config, Arc::new(database));
    sim.attach_abilities_to_all();

    let mut spawn = |team: u8, stats: &[(StatId, f32)], hp: f32| {
        let world = sim.world_mut();
        let unit = world.spawn();
        world.insert(unit, Team(team)).unwrap();
        world.insert(unit, BoardPos::new(0, 0)).unwrap();
        world.insert(unit, StatBlock::from_base(stats)).unwrap();
        world.insert(unit, ResistPack::new()).unwrap();
        world.insert(unit, LifeEnergy::full(hp, 50.0)).unwrap();
        unit
    };
    let player = spawn(
        0,
        &[(StatId::OffensiveAbility, 200.0), (StatId::CritMultiplier, 1.5)],
        100.0,
    );
    let enemy = spawn(1, &[(StatId::DefensiveAbility, 180.0)], 120.0);
    let known = KnownAbilities::from_ids(names.iter().map(|name| Sid::new(name)));
    sim.world_mut().insert(player, known).unwrap();
    (sim, player, enemy)
}

fn hp(sim: &Simulation, unit: EntityId) -> f32 {
    sim.world().get::<LifeEnergy>(unit).unwrap().hp
}

#[test]
fn authored_shiver_strike_matches_hand_built_graph() {
    let expected = CompiledEffectGraph::compile(&[
        EffectNode::DealDamage(DealDamage {
            bundle: DamageBundle::skill(1.1).with(DamageType::Cold, 25.0),
        }),
        EffectNode::ApplyStatus(ApplyStatus {
            flags: StatusFlags::CHILLED,
            duration_sec: 0.0,
        }),
        EffectNode::ApplyRr(ApplyRr {
            kind: DamageType::Cold,
            stage: RrStage::Type1PctAdd,
            value: 25.0,
        }),
    ])
    .unwrap();

    let (database, _) = AbilityLoader::load_embedded(&EngineConfig::default()).unwrap();
    let authored = database.get(Sid::new("ShiverStrike")).unwrap();
    assert_eq!(authored.graph, expected);
    assert_eq!(authored.cooldown_sec, 4.0);
    assert!(authored.is_armed());
}

#[test]
fn authored_shiver_strike_plays_out_in_a_duel() {
    let (mut sim, player, enemy) = duel(&["ShiverStrike"]);
    let cast = Event::between(EventType::SpellCastResolved, player, Some(enemy));

    assert_eq!(sim.publish(cast.clone()), 4);
    assert_eq!(hp(&sim, enemy), 95.0);

    sim.tick(4.0);
    sim.publish(cast);
    assert_eq!(hp(&sim, enemy), 63.75);
}

#[test]
fn unknown_abilities_on_a_unit_are_ignored() {
    let (mut sim, player, enemy) = duel(&["NotInTheCatalog"]);
    assert_eq!(
        sim.publish(Event::between(EventType::SpellCastResolved, player, Some(enemy))),
        1
    );
    assert_eq!(hp(&sim, enemy), 120.0);
}
