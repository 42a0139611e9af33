//! Named event listeners
//!
//! A small registry in the style of an event emitter: handlers subscribe to
//! an [`EventKind`], receive every matching event, and can be removed again.

use super::types::{EventKind, FetchEvent};
use std::collections::HashMap;
use std::fmt;

/// Handler invoked with each matching event
pub type Handler = Box<dyn FnMut(&FetchEvent) + Send>;

/// Identifies a registered handler for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Handlers keyed by event name, called in registration order
#[derive(Default)]
pub struct FetchListeners {
    next_id: u64,
    handlers: HashMap<EventKind, Vec<(ListenerId, Handler)>>,
}

impl FetchListeners {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of `kind`
    pub fn on<H>(&mut self, kind: EventKind, handler: H) -> ListenerId
    where
        H: FnMut(&FetchEvent) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a handler; returns whether it was registered
    pub fn off(&mut self, id: ListenerId) -> bool {
        for handlers in self.handlers.values_mut() {
            if let Some(pos) = handlers.iter().position(|(hid, _)| *hid == id) {
                handlers.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of handlers subscribed to `kind`
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver `event` to its subscribers; returns how many were called
    pub fn emit(&mut self, event: &FetchEvent) -> usize {
        let Some(handlers) = self.handlers.get_mut(&event.kind()) else {
            return 0;
        };
        for (_, handler) in handlers.iter_mut() {
            handler(event);
        }
        handlers.len()
    }
}

impl fmt::Debug for FetchListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<EventKind, usize> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (*kind, handlers.len()))
            .collect();
        f.debug_struct("FetchListeners")
            .field("handlers", &counts)
            .finish_non_exhaustive()
    }
}
