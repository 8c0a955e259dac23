//! Ordered publish/subscribe with deferred reentrant publishing.
//!
//! Listeners for an event kind fire in `(lane asc, priority desc, tiebreak asc)`
//! order; ties keep registration order. Events published while a dispatch is
//! running (through [`Context::publish`]) land in a FIFO queue that is drained
//! after the current dispatch returns, so no listener ever sees another event
//! mid-dispatch and cascades resolve breadth-first within the same step.

use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, error, trace};

use super::types::{EVENT_KINDS, Event, EventType};
use crate::combat::CombatError;
use crate::config::EngineConfig;
use crate::context::{BattleState, Context};
use crate::effect::EffectError;
use crate::error::{ErrorSeverity, MechanicsError};
use crate::services::EngineServices;
use crate::world::{ComponentError, World};

/// Failure reported by a listener. Logged; dispatch carries on.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error("{0}")]
    Other(String),
}

impl MechanicsError for ListenerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Component(e) => e.severity(),
            Self::Combat(e) => e.severity(),
            Self::Effect(e) => e.severity(),
            Self::Other(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Component(e) => e.error_code(),
            Self::Combat(e) => e.error_code(),
            Self::Effect(e) => e.error_code(),
            Self::Other(_) => "LISTENER_FAILED",
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Sort key of a listener.
///
/// - `lane`: bucket, negative = pre, 0 = normal, positive = post
/// - `priority`: higher fires first within a lane
/// - `tiebreak`: ascending, for listeners sharing lane and priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOrder {
    pub lane: i32,
    pub priority: i32,
    pub tiebreak: u32,
}

impl ListenerOrder {
    pub const fn new(lane: i32, priority: i32) -> Self {
        Self {
            lane,
            priority,
            tiebreak: 0,
        }
    }

    pub const fn with_tiebreak(mut self, tiebreak: u32) -> Self {
        self.tiebreak = tiebreak;
        self
    }

    fn cmp_key(&self, other: &Self) -> core::cmp::Ordering {
        self.lane
            .cmp(&other.lane)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

type Listener = Box<dyn FnMut(&Event, &mut Context<'_>) -> Result<(), ListenerError>>;

struct Registration {
    id: ListenerId,
    order: ListenerOrder,
    callback: Listener,
}

/// Event bus owning listeners and the deferred event queue.
pub struct EventBus {
    listeners: [Vec<Registration>; EVENT_KINDS],
    queue: VecDeque<Event>,
    next_id: u64,
    max_events_per_flush: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_limit(EngineConfig::DEFAULT_MAX_EVENTS_PER_FLUSH)
    }

    /// Bus that drains at most `max_events_per_flush` events per flush.
    pub fn with_limit(max_events_per_flush: usize) -> Self {
        Self {
            listeners: core::array::from_fn(|_| Vec::new()),
            queue: VecDeque::new(),
            next_id: 0,
            max_events_per_flush,
        }
    }

    pub fn subscribe<F>(&mut self, kind: EventType, order: ListenerOrder, listener: F) -> ListenerId
    where
        F: FnMut(&Event, &mut Context<'_>) -> Result<(), ListenerError> + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let slot = &mut self.listeners[kind.index()];
        slot.push(Registration {
            id,
            order,
            callback: Box::new(listener),
        });
        // stable: equal keys keep registration order
        slot.sort_by(|a, b| a.order.cmp_key(&b.order));
        debug!(
            target: "mechanics::events",
            event = %kind,
            lane = order.lane,
            priority = order.priority,
            tiebreak = order.tiebreak,
            "listener subscribed"
        );
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        for slot in self.listeners.iter_mut() {
            if let Some(pos) = slot.iter().position(|r| r.id == id) {
                slot.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn listener_count(&self, kind: EventType) -> usize {
        self.listeners[kind.index()].len()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queues an event without delivering it.
    pub fn enqueue(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Runs `f` with a context whose published events land in this bus's queue.
    ///
    /// Nothing is delivered until the next [`flush`](Self::flush).
    pub fn with_context<R>(
        &mut self,
        world: &mut World,
        battle: &mut BattleState,
        services: &mut dyn EngineServices,
        f: impl FnOnce(&mut Context<'_>) -> R,
    ) -> R {
        let mut cx = Context::new(world, battle, services, &mut self.queue);
        f(&mut cx)
    }

    /// Queues `event` and drains the queue. Returns the number of events delivered.
    pub fn publish(
        &mut self,
        event: Event,
        world: &mut World,
        battle: &mut BattleState,
        services: &mut dyn EngineServices,
    ) -> usize {
        self.queue.push_back(event);
        self.flush(world, battle, services)
    }

    /// Delivers pending events in FIFO order, including the ones listeners
    /// queue along the way.
    pub fn flush(
        &mut self,
        world: &mut World,
        battle: &mut BattleState,
        services: &mut dyn EngineServices,
    ) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.queue.pop_front() {
            if delivered >= self.max_events_per_flush {
                let dropped = self.queue.len() + 1;
                self.queue.clear();
                error!(
                    target: "mechanics::events",
                    limit = self.max_events_per_flush,
                    dropped,
                    "event cascade exceeded flush limit, dropping pending events"
                );
                break;
            }
            delivered += 1;
            self.dispatch(&event, world, battle, services);
        }
        delivered
    }

    fn dispatch(
        &mut self,
        event: &Event,
        world: &mut World,
        battle: &mut BattleState,
        services: &mut dyn EngineServices,
    ) {
        let Self {
            listeners, queue, ..
        } = self;

        trace!(
            target: "mechanics::events",
            event = %event.kind,
            source = ?event.source,
            target_entity = ?event.primary_target,
            "dispatch"
        );

        for registration in listeners[event.kind.index()].iter_mut() {
            let mut cx = Context::new(&mut *world, &mut *battle, &mut *services, &mut *queue);
            let callback = &mut *registration.callback;
            let outcome = catch_unwind(AssertUnwindSafe(|| callback(event, &mut cx)));

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(
                    target: "mechanics::events",
                    event = %event.kind,
                    listener = registration.id.0,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    error = %err,
                    "listener failed"
                ),
                Err(payload) => error!(
                    target: "mechanics::events",
                    event = %event.kind,
                    listener = registration.id.0,
                    panic = panic_message(payload.as_ref()),
                    "listener panicked"
                ),
            }
        }
    }

    /// Drops pending events, keeping listeners.
    pub fn clear_pending(&mut self) {
        self.queue.clear();
    }

    /// Drops every listener and every pending event.
    pub fn clear(&mut self) {
        for slot in self.listeners.iter_mut() {
            slot.clear();
        }
        self.queue.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn core::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}
