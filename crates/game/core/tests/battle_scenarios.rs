use std::sync::Arc;

use mechanics_core::ability::triggers;
use mechanics_core::effect::params::{ApplyRr, ApplyStatus, DealDamage, ModifyStats, StatDelta};
use mechanics_core::targeting::{target_primary, target_random_allies, target_self};
use mechanics_core::{
    AbilityDatabase, AbilityDef, BoardPos, CompiledEffectGraph, DamageBundle, DamageType,
    EffectNode, EngineConfig, EntityId, Event, EventType, KnownAbilities, LifeEnergy, ResistPack,
    RrStage, Sid, Simulation, StatBlock, StatId, StatusFlags, StatusState, Team,
};

fn shiver_strike() -> AbilityDef {
    let graph = CompiledEffectGraph::compile(&[
        EffectNode::DealDamage(DealDamage {
            bundle: DamageBundle::skill(1.10).with(DamageType::Cold, 25.0),
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
    AbilityDef::new("ShiverStrike")
        .with_trigger(triggers::on_cast())
        .with_target(target_primary())
        .with_graph(graph)
        .with_cooldown(4.0)
}

fn ant_like_buff() -> AbilityDef {
    let graph = CompiledEffectGraph::compile(&[EffectNode::ModifyStats(
        ModifyStats::from_deltas([
            StatDelta {
                stat: StatId::MaxHp,
                add: 10.0,
                mul: 0.0,
            },
            StatDelta {
                stat: StatId::OffensiveAbility,
                add: 5.0,
                mul: 0.0,
            },
        ])
        .unwrap(),
    )])
    .unwrap();
    AbilityDef::new("AntLikeBuff")
        .with_trigger(triggers::on_death())
        .with_target(target_random_allies(1, false))
        .with_graph(graph)
}

fn simulation(seed: u64, abilities: Vec<AbilityDef>) -> Simulation {
    let mut db = AbilityDatabase::new();
    for ability in abilities {
        db.insert(ability);
    }
    let mut sim = Simulation::new(EngineConfig::with_seed(seed), Arc::new(db));
    sim.attach_abilities_to_all();
    sim
}

fn unit(sim: &mut Simulation, team: u8, index: i32, stats: &[(StatId, f32)], hp: f32) -> EntityId {
    let world = sim.world_mut();
    let unit = world.spawn();
    world.insert(unit, Team(team)).unwrap();
    world.insert(unit, BoardPos::new(0, index)).unwrap();
    world.insert(unit, StatBlock::from_base(stats)).unwrap();
    world.insert(unit, ResistPack::new()).unwrap();
    world.insert(unit, LifeEnergy::full(hp, 50.0)).unwrap();
    unit
}

fn learn(sim: &mut Simulation, unit: EntityId, names: &[&str]) {
    let known = KnownAbilities::from_ids(names.iter().map(|name| Sid::new(name)));
    sim.world_mut().insert(unit, known).unwrap();
}

fn hp(sim: &Simulation, unit: EntityId) -> f32 {
    sim.world().get::<LifeEnergy>(unit).unwrap().hp
}

fn cast(sim: &mut Simulation, caster: EntityId, target: EntityId) -> usize {
    sim.publish(Event::between(EventType::SpellCastResolved, caster, Some(target)))
}

#[test]
fn shiver_strike_chills_and_softens_the_next_hit() {
    let mut sim = simulation(1, vec![shiver_strike()]);
    let player = unit(
        &mut sim,
        0,
        0,
        &[(StatId::OffensiveAbility, 200.0), (StatId::CritMultiplier, 1.5)],
        100.0,
    );
    let enemy = unit(&mut sim, 1, 0, &[(StatId::DefensiveAbility, 180.0)], 120.0);
    learn(&mut sim, player, &["ShiverStrike"]);

    // cast, damage dealt, damage taken, status applied
    assert_eq!(cast(&mut sim, player, enemy), 4);
    assert_eq!(hp(&sim, enemy), 95.0);
    assert!(sim.world().get::<StatusState>(enemy).unwrap().has(StatusFlags::CHILLED));

    assert_eq!(cast(&mut sim, player, enemy), 1);
    assert_eq!(hp(&sim, enemy), 95.0);

    sim.tick(4.0);
    cast(&mut sim, player, enemy);
    assert_eq!(hp(&sim, enemy), 63.75);
    assert_eq!(hp(&sim, player), 100.0);
}

#[test]
fn death_trait_buffs_one_ally_deterministically() {
    let run = |seed| {
        let mut sim = simulation(seed, vec![ant_like_buff()]);
        let ant = unit(&mut sim, 0, 0, &[], 10.0);
        let allies: Vec<_> = (1..4).map(|i| unit(&mut sim, 0, i, &[], 10.0)).collect();
        let enemy = unit(&mut sim, 1, 0, &[], 10.0);
        learn(&mut sim, ant, &["AntLikeBuff"]);

        sim.publish(Event::new(EventType::UnitDied).with_source(ant));

        let max_hp = |unit| sim.world().get::<StatBlock>(unit).unwrap().get(StatId::MaxHp);
        assert_eq!(max_hp(ant), 0.0);
        assert_eq!(max_hp(enemy), 0.0);
        let buffed: Vec<_> = allies.iter().copied().filter(|a| max_hp(*a) == 10.0).collect();
        assert_eq!(buffed.len(), 1);
        buffed[0]
    };

    assert_eq!(run(42), run(42));
}

#[test]
fn per_turn_limit_is_independent_of_cooldowns() {
    let rage = AbilityDef::new("Rage")
        .with_trigger(triggers::on_damage_taken())
        .with_target(target_self())
        .with_graph(
            CompiledEffectGraph::compile(&[EffectNode::LimitPerTurn {
                max_times: 1,
                key: Sid::new("Rage"),
                body: vec![EffectNode::ModifyStats(
                    ModifyStats::from_deltas([StatDelta {
                        stat: StatId::OffensiveAbility,
                        add: 1.0,
                        mul: 0.0,
                    }])
                    .unwrap(),
                )],
            }])
            .unwrap(),
        );
    let mut sim = simulation(3, vec![rage]);
    let attacker = unit(&mut sim, 0, 0, &[(StatId::OffensiveAbility, 100.0)], 100.0);
    let brute = unit(&mut sim, 1, 0, &[], 100.0);
    learn(&mut sim, brute, &["Rage"]);
    let jab = DamageBundle::skill(1.0).with(DamageType::Fire, 1.0);
    let oa = |sim: &Simulation| sim.world().get::<StatBlock>(brute).unwrap().get(StatId::OffensiveAbility);

    sim.begin_turn(1);
    for _ in 0..3 {
        sim.resolve_damage(attacker, brute, &jab, true).unwrap();
    }
    assert_eq!(oa(&sim), 1.0);
    assert_eq!(hp(&sim, brute), 97.0);

    sim.begin_turn(2);
    sim.resolve_damage(attacker, brute, &jab, true).unwrap();
    assert_eq!(oa(&sim), 2.0);
}

#[test]
fn temporary_abilities_end_with_the_battle() {
    let mut sim = simulation(5, vec![shiver_strike()]);
    let player = unit(&mut sim, 0, 0, &[], 10.0);
    let mut known = KnownAbilities::default();
    known.push_temporary(Sid::new("ShiverStrike"));
    sim.world_mut().insert(player, known).unwrap();

    sim.end_battle();

    assert!(sim.world().get::<KnownAbilities>(player).unwrap().is_empty());
}

#[test]
fn stat_changes_earlier_in_a_sequence_feed_later_damage() {
    let sunder = AbilityDef::new("Sunder")
        .with_trigger(triggers::on_cast())
        .with_target(target_primary())
        .with_graph(
            CompiledEffectGraph::compile(&[EffectNode::Seq(vec![
                EffectNode::ModifyStats(
                    ModifyStats::from_deltas([StatDelta {
                        stat: StatId::ArmorProtection,
                        add: 50.0,
                        mul: 0.0,
                    }])
                    .unwrap(),
                ),
                EffectNode::DealDamage(DealDamage {
                    bundle: DamageBundle::skill(1.0).with(DamageType::Physical, 100.0),
                }),
            ])])
            .unwrap(),
        );
    let mut sim = simulation(5, vec![sunder]);
    let player = unit(&mut sim, 0, 0, &[(StatId::OffensiveAbility, 200.0)], 100.0);
    let enemy = unit(&mut sim, 1, 0, &[(StatId::DefensiveAbility, 180.0)], 120.0);
    learn(&mut sim, player, &["Sunder"]);

    cast(&mut sim, player, enemy);

    // 100 physical * 1.1 hit scalar = 110; armor 50 keeps 15 of the first 50
    assert!((hp(&sim, enemy) - 45.0).abs() < 1e-3, "hp = {}", hp(&sim, enemy));
}
