//! Compiles authored [`AbilitySpec`]s into engine [`AbilityDef`]s.
//!
//! Compilation is all-or-nothing per ability: any unknown name or invalid
//! parameter rejects the ability, nothing partial is ever produced.

use std::str::FromStr;

use mechanics_core::ability::{TriggerFn, triggers};
use mechanics_core::effect::params::{
    ApplyRr, ApplyStatus, CopyAbilityFrom, DealDamage, ModifyPlayerResource, ModifyStats, PushUnit,
    ShopAddItem, ShopReplaceItems, ShuffleAllies, StatCopyFrom, StatDelta, StatSwapBetween,
    StatSwapWithin, SummonUnit,
};
use mechanics_core::targeting::{self, TargetFn};
use mechanics_core::{
    AbilityDef, CompiledEffectGraph, DamageBundle, DamageTags, DamageType, EffectNode,
    EngineConfig, ErrorSeverity, EventType, GraphError, MechanicsError, Sid, StatId, StatusFlags,
};

use crate::formats::{AbilitySpec, EffectSpec, StatDeltaSpec, TargetSpec, TriggerSpec};

/// Why an ability was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unknown stat '{0}'")]
    UnknownStat(String),

    #[error("unknown damage type '{0}'")]
    UnknownDamageType(String),

    #[error("unknown trigger '{0}'")]
    UnknownTrigger(String),

    #[error("unknown event type '{0}'")]
    UnknownEventType(String),

    #[error("{count} stat deltas in one ModifyStats, at most {max} allowed")]
    TooManyDeltas { count: usize, max: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl MechanicsError for CompileError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStat(_) => "CONTENT_UNKNOWN_STAT",
            Self::UnknownDamageType(_) => "CONTENT_UNKNOWN_DAMAGE_TYPE",
            Self::UnknownTrigger(_) => "CONTENT_UNKNOWN_TRIGGER",
            Self::UnknownEventType(_) => "CONTENT_UNKNOWN_EVENT_TYPE",
            Self::TooManyDeltas { .. } => "CONTENT_TOO_MANY_DELTAS",
            Self::Graph(e) => e.error_code(),
        }
    }
}

fn stat(name: &str) -> Result<StatId, CompileError> {
    StatId::from_str(name).map_err(|_| CompileError::UnknownStat(name.to_string()))
}

fn damage_type(name: &str) -> Result<DamageType, CompileError> {
    DamageType::from_str(name).map_err(|_| CompileError::UnknownDamageType(name.to_string()))
}

fn event_type(name: &str) -> Result<EventType, CompileError> {
    EventType::from_str(name).map_err(|_| CompileError::UnknownEventType(name.to_string()))
}

fn sid_or_none(name: Option<&str>) -> Sid {
    name.map_or(Sid::NONE, Sid::new)
}

/// Compiles one ability against `config`'s limits.
pub fn compile_ability(spec: &AbilitySpec, config: &EngineConfig) -> Result<AbilityDef, CompileError> {
    let nodes = compile_effects(&spec.effects, &spec.name)?;
    let graph = CompiledEffectGraph::compile_with(&nodes, config)?;
    let mut ability = AbilityDef::new(spec.name.as_str())
        .with_target(compile_target(spec.target))
        .with_graph(graph)
        .with_cooldown(spec.cooldown.max(0.0))
        .with_internal_cooldown(spec.internal_cooldown.max(0.0));
    ability.trigger = compile_trigger(&spec.trigger)?;
    Ok(ability)
}

/// `None` for passive abilities, which never fire from events.
pub fn compile_trigger(spec: &TriggerSpec) -> Result<Option<TriggerFn>, CompileError> {
    let trigger = match spec.on.to_ascii_lowercase().as_str() {
        "passive" => return Ok(None),
        "on_event" => {
            let Some(event) = spec.event.as_deref() else {
                return Err(CompileError::UnknownEventType("(missing)".to_string()));
            };
            triggers::on_event(event_type(event)?)
        }
        "on_death" => triggers::on_death(),
        "on_cast" => triggers::on_cast(),
        "on_damage_taken" => triggers::on_damage_taken(),
        "on_battle_start" => triggers::on_battle_start(),
        "ally_ahead_attacks" => triggers::ally_ahead_attacks(),
        "ally_ahead_faints" => triggers::ally_ahead_faints(),
        _ => return Err(CompileError::UnknownTrigger(spec.on.clone())),
    };
    Ok(Some(trigger))
}

pub fn compile_target(spec: TargetSpec) -> TargetFn {
    match spec {
        TargetSpec::Source => targeting::target_self(),
        TargetSpec::Primary => targeting::target_primary(),
        TargetSpec::AllEnemies => targeting::target_all_enemies(),
        TargetSpec::AllAllies { include_self } => targeting::target_all_allies(include_self),
        TargetSpec::RandomAllies { n, include_self } => {
            targeting::target_random_allies(n as usize, include_self)
        }
        TargetSpec::FirstAllies { n, include_self } => {
            targeting::target_first_allies(n as usize, include_self)
        }
        TargetSpec::AllyAhead => targeting::target_ally_ahead(),
        TargetSpec::AlliesBehind { n } => targeting::target_allies_behind(n),
        TargetSpec::NthAlly { n } => targeting::target_nth_ally(n),
        TargetSpec::AdjacentAllies => targeting::target_two_adjacent_allies(),
    }
}

fn compile_deltas(deltas: &[StatDeltaSpec]) -> Result<ModifyStats, CompileError> {
    if deltas.len() > EngineConfig::MAX_STAT_DELTAS {
        return Err(CompileError::TooManyDeltas {
            count: deltas.len(),
            max: EngineConfig::MAX_STAT_DELTAS,
        });
    }
    let deltas = deltas
        .iter()
        .map(|d| {
            Ok(StatDelta {
                stat: stat(&d.stat)?,
                add: d.add,
                mul: d.mul,
            })
        })
        .collect::<Result<Vec<_>, CompileError>>()?;
    Ok(ModifyStats::from_deltas(deltas)?)
}

/// Lowers authored effects into engine nodes. `ability` keys unnamed per-turn limits.
pub fn compile_effects(effects: &[EffectSpec], ability: &str) -> Result<Vec<EffectNode>, CompileError> {
    effects.iter().map(|e| compile_effect(e, ability)).collect()
}

fn compile_effect(spec: &EffectSpec, ability: &str) -> Result<EffectNode, CompileError> {
    let node = match spec {
        EffectSpec::NoOp => EffectNode::NoOp,
        EffectSpec::Seq(body) => EffectNode::Seq(compile_effects(body, ability)?),
        EffectSpec::Repeat { count, body } => EffectNode::Repeat {
            count: *count,
            body: compile_effects(body, ability)?,
        },
        EffectSpec::LimitPerTurn {
            max_times,
            key,
            body,
        } => EffectNode::LimitPerTurn {
            max_times: *max_times,
            key: Sid::new(key.as_deref().unwrap_or(ability)),
            body: compile_effects(body, ability)?,
        },
        EffectSpec::ModifyStats(deltas) => EffectNode::ModifyStats(compile_deltas(deltas)?),
        EffectSpec::DealDamage {
            weapon_scalar,
            flat,
            weapon,
        } => {
            let mut bundle = DamageBundle::skill(*weapon_scalar);
            if *weapon {
                bundle.tags = DamageTags::WEAPON;
            }
            for (name, amount) in flat {
                bundle = bundle.with(damage_type(name)?, *amount);
            }
            EffectNode::DealDamage(DealDamage { bundle })
        }
        EffectSpec::ApplyStatus {
            chilled,
            frozen,
            stunned,
            duration,
        } => {
            let mut flags = StatusFlags::empty();
            flags.set(StatusFlags::CHILLED, *chilled);
            flags.set(StatusFlags::FROZEN, *frozen);
            flags.set(StatusFlags::STUNNED, *stunned);
            EffectNode::ApplyStatus(ApplyStatus {
                flags,
                duration_sec: duration.max(0.0),
            })
        }
        EffectSpec::ApplyRr {
            damage_type: kind,
            stage,
            value,
        } => EffectNode::ApplyRr(ApplyRr {
            kind: damage_type(kind)?,
            stage: *stage,
            value: *value,
        }),
        EffectSpec::StatSwapWithin { a, b } => EffectNode::StatSwapWithin(StatSwapWithin {
            a: stat(a)?,
            b: stat(b)?,
        }),
        EffectSpec::StatSwapBetween { a, b } => EffectNode::StatSwapBetween(StatSwapBetween {
            a: stat(a)?,
            b: stat(b)?,
        }),
        EffectSpec::StatCopyFrom { stat: name } => {
            EffectNode::StatCopyFrom(StatCopyFrom { stat: stat(name)? })
        }
        EffectSpec::TakeLessDamage { pct } => EffectNode::TakeLessDamageOneShot { pct: *pct },
        EffectSpec::GiveItem(item) => EffectNode::GiveItem(Sid::new(item)),
        EffectSpec::RemoveItem => EffectNode::RemoveItem,
        EffectSpec::StealItem => EffectNode::StealItem,
        EffectSpec::CopyItemTo { fallback } => EffectNode::CopyItemTo {
            fallback: sid_or_none(fallback.as_deref()),
        },
        EffectSpec::ClassifyAdd(tag) => EffectNode::ClassifyAdd(Sid::new(tag)),
        EffectSpec::TransformUnit(species) => EffectNode::TransformUnit {
            to_species: Sid::new(species),
        },
        EffectSpec::PushUnit { delta, clamp } => EffectNode::PushUnit(PushUnit {
            delta: *delta,
            clamp: *clamp,
        }),
        EffectSpec::ShuffleAllies { radius } => {
            EffectNode::ShuffleAllies(ShuffleAllies { radius: *radius })
        }
        EffectSpec::SummonUnit {
            species,
            count,
            offset,
        } => EffectNode::SummonUnit(SummonUnit {
            species: Sid::new(species),
            count: *count,
            position_offset: *offset,
        }),
        EffectSpec::CopyAbilityFrom {
            ability: copied,
            until_end_of_battle,
        } => EffectNode::CopyAbilityFrom(CopyAbilityFrom {
            ability: Sid::new(copied),
            until_end_of_battle: *until_end_of_battle,
        }),
        EffectSpec::SetLevel(level) => EffectNode::SetLevel(*level),
        EffectSpec::GiveExperience(xp) => EffectNode::GiveExperience(*xp),
        EffectSpec::ModifyGold { op, value } => {
            EffectNode::ModifyPlayerResource(ModifyPlayerResource {
                op: *op,
                value: *value,
            })
        }
        EffectSpec::ShopAddItem { item, count } => EffectNode::ShopAddItem(ShopAddItem {
            item: Sid::new(item),
            count: *count,
        }),
        EffectSpec::ShopDiscountUnits(discount) => EffectNode::ShopDiscountUnit(*discount),
        EffectSpec::ShopDiscountItems(discount) => EffectNode::ShopDiscountItem(*discount),
        EffectSpec::ShopRoll { times } => EffectNode::ShopRoll { times: *times },
        EffectSpec::ShopReplaceItems { from, to, all } => {
            EffectNode::ShopReplaceItems(ShopReplaceItems {
                from: sid_or_none(from.as_deref()),
                to: Sid::new(to),
                all: *all,
            })
        }
    };
    Ok(node)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use mechanics_core::{OpCode, RrStage};

    use super::*;

    fn spec(effects: Vec<EffectSpec>) -> AbilitySpec {
        AbilitySpec {
            name: "Test".to_string(),
            trigger: TriggerSpec {
                on: "on_cast".to_string(),
                event: None,
            },
            target: TargetSpec::Primary,
            effects,
            cooldown: 2.0,
            internal_cooldown: 0.0,
        }
    }

    fn delta(name: &str) -> StatDeltaSpec {
        StatDeltaSpec {
            stat: name.to_string(),
            add: 1.0,
            mul: 0.0,
        }
    }

    #[test]
    fn compiles_nested_effects() {
        let ability = compile_ability(
            &spec(vec![
                EffectSpec::DealDamage {
                    weapon_scalar: 1.1,
                    flat: BTreeMap::from([("cold".to_string(), 25.0)]),
                    weapon: false,
                },
                EffectSpec::LimitPerTurn {
                    max_times: 1,
                    key: None,
                    body: vec![EffectSpec::ModifyStats(vec![delta("max_hp")])],
                },
            ]),
            &EngineConfig::default(),
        )
        .unwrap();

        assert_eq!(ability.id, Sid::new("Test"));
        assert!(ability.is_armed());
        assert_eq!(ability.cooldown_sec, 2.0);
        let codes: Vec<_> = ability.graph.ops().iter().map(|op| op.code).collect();
        assert_eq!(codes, vec![OpCode::DealDamage, OpCode::LimitPerTurn, OpCode::ModifyStats]);
        assert_eq!(ability.graph.pools().limit_per_turn[0].key, Sid::new("Test"));
        assert_eq!(
            ability.graph.pools().deal_damage[0].bundle.get(DamageType::Cold),
            25.0
        );
    }

    #[test]
    fn unknown_names_reject_the_ability() {
        let config = EngineConfig::default();
        let bad_stat = compile_ability(&spec(vec![EffectSpec::ModifyStats(vec![delta("charisma")])]), &config);
        assert_eq!(bad_stat.unwrap_err(), CompileError::UnknownStat("charisma".to_string()));

        let bad_damage = compile_ability(
            &spec(vec![EffectSpec::ApplyRr {
                damage_type: "sonic".to_string(),
                stage: RrStage::Type3Flat,
                value: 5.0,
            }]),
            &config,
        );
        assert_eq!(bad_damage.unwrap_err().error_code(), "CONTENT_UNKNOWN_DAMAGE_TYPE");

        let mut bad_trigger = spec(Vec::new());
        bad_trigger.trigger.on = "on_sneeze".to_string();
        assert!(matches!(
            compile_ability(&bad_trigger, &config),
            Err(CompileError::UnknownTrigger(_))
        ));

        let mut bad_event = spec(Vec::new());
        bad_event.trigger = TriggerSpec {
            on: "on_event".to_string(),
            event: Some("lunch_break".to_string()),
        };
        assert!(matches!(
            compile_ability(&bad_event, &config),
            Err(CompileError::UnknownEventType(_))
        ));
    }

    #[test]
    fn limits_are_enforced() {
        let config = EngineConfig::default();
        let deltas = (0..9).map(|_| delta("spirit")).collect();
        assert_eq!(
            compile_ability(&spec(vec![EffectSpec::ModifyStats(deltas)]), &config).unwrap_err(),
            CompileError::TooManyDeltas { count: 9, max: 8 }
        );

        let repeat = EffectSpec::Repeat {
            count: config.max_repeat + 1,
            body: vec![EffectSpec::NoOp],
        };
        assert!(matches!(
            compile_ability(&spec(vec![repeat]), &config),
            Err(CompileError::Graph(GraphError::RepeatTooLarge { .. }))
        ));
    }

    #[test]
    fn passive_abilities_have_no_trigger() {
        let mut passive = spec(Vec::new());
        passive.trigger = TriggerSpec::default();
        let ability = compile_ability(&passive, &EngineConfig::default()).unwrap();
        assert!(ability.trigger.is_none());
        assert!(!ability.is_armed());
    }
}
