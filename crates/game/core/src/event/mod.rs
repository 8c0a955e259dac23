//! Events and the ordered, reentrancy-safe event bus.

mod bus;
mod types;

pub use bus::{EventBus, ListenerError, ListenerId, ListenerOrder};
pub use types::{EVENT_KINDS, Event, EventType};
