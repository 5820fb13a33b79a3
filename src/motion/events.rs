//! Per-manager publish / subscribe.
//!
//! Every motion manager owns its own dispatcher; there is no shared bus,
//! so one unit's listeners can never observe another unit's events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle events raised by a motion manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionEvent {
    /// The unit braked to a halt on its travel target.
    Arrive,
    /// The unit's facing reached the target code of the current command.
    Headed,
}

/// Handle returned on subscription; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub type Callback<E> = Box<dyn FnMut(E) + Send + Sync>;

struct Listener<E> {
    id: ListenerId,
    event: E,
    once: bool,
    callback: Callback<E>,
}

pub struct EventDispatcher<E = MotionEvent> {
    listeners: Vec<Listener<E>>,
    next_id: u64,
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Copy + PartialEq> EventDispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event_listener<F>(&mut self, event: E, callback: F) -> ListenerId
    where
        F: FnMut(E) + Send + Sync + 'static,
    {
        self.push(event, false, Box::new(callback))
    }

    /// Subscribe for a single delivery; the listener is dropped right after it fires.
    pub fn add_once_listener<F>(&mut self, event: E, callback: F) -> ListenerId
    where
        F: FnMut(E) + Send + Sync + 'static,
    {
        self.push(event, true, Box::new(callback))
    }

    /// Unsubscribe by id.  Returns `false` when nothing matched.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Call every subscriber of `event` in registration order.
    /// Returns how many callbacks ran.
    pub fn dispatch(&mut self, event: E) -> usize {
        let mut fired = 0;
        self.listeners.retain_mut(|l| {
            if l.event != event {
                return true;
            }
            (l.callback)(event);
            fired += 1;
            !l.once
        });
        fired
    }

    pub fn listener_count(&self, event: E) -> usize {
        self.listeners.iter().filter(|l| l.event == event).count()
    }

    fn push(&mut self, event: E, once: bool, callback: Callback<E>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            event,
            once,
            callback,
        });
        id
    }
}

impl<E> fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
