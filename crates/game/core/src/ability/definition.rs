use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::effect::CompiledEffectGraph;
use crate::event::Event;
use crate::ids::{EntityId, Sid};
use crate::targeting::TargetFn;

/// Decides whether an ability fires for `(event, context, owner)`.
pub type TriggerFn = Arc<dyn Fn(&Event, &mut Context<'_>, EntityId) -> bool + Send + Sync>;

/// Boxes a closure as a [`TriggerFn`].
pub fn trigger<F>(f: F) -> TriggerFn
where
    F: Fn(&Event, &mut Context<'_>, EntityId) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Immutable ability definition.
///
/// Remaining cooldowns are runtime state and live with the owner in
/// [`KnownAbilities`](crate::world::KnownAbilities).
#[derive(Clone)]
pub struct AbilityDef {
    pub id: Sid,
    pub name: String,
    pub trigger: Option<TriggerFn>,
    pub target: Option<TargetFn>,
    pub graph: CompiledEffectGraph,
    pub cooldown_sec: f32,
    pub internal_cooldown_sec: f32,
}

impl AbilityDef {
    /// Ability named `name` that never fires until given a trigger and a target.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Sid::new(&name),
            name,
            trigger: None,
            target: None,
            graph: CompiledEffectGraph::empty(),
            cooldown_sec: 0.0,
            internal_cooldown_sec: 0.0,
        }
    }

    pub fn with_trigger(mut self, trigger: TriggerFn) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_target(mut self, target: TargetFn) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_graph(mut self, graph: CompiledEffectGraph) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.cooldown_sec = seconds;
        self
    }

    pub fn with_internal_cooldown(mut self, seconds: f32) -> Self {
        self.internal_cooldown_sec = seconds;
        self
    }

    /// Both a trigger and a target function are set.
    pub fn is_armed(&self) -> bool {
        self.trigger.is_some() && self.target.is_some()
    }
}

impl fmt::Debug for AbilityDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbilityDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("trigger", &self.trigger.is_some())
            .field("target", &self.target.is_some())
            .field("ops", &self.graph.ops().len())
            .field("cooldown_sec", &self.cooldown_sec)
            .field("internal_cooldown_sec", &self.internal_cooldown_sec)
            .finish()
    }
}
