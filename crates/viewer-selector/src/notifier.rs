//! Publish/subscribe channel for host application listeners

use crate::errors::SelectorError;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Handle returned by [`Notifier::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

impl ListenerId {
    /// Raw numeric value, for handing across an FFI boundary
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Rebuild a handle from [`ListenerId::as_u32`]
    pub fn from_u32(raw: u32) -> Self {
        Self(raw)
    }
}

/// Shared listener callback
pub type Listener<P> = Rc<dyn Fn(&P)>;

/// Event subscription capability
pub trait Notifier<E, P> {
    /// Register `listener` for `event`
    fn on(&self, event: E, listener: Listener<P>) -> ListenerId;

    /// Remove a listener. Returns whether it was registered.
    fn off(&self, id: ListenerId) -> bool;

    /// Invoke every listener registered for `event`, returning how many ran
    fn emit(&self, event: &E, payload: &P) -> usize;

    /// Remove all listeners
    fn clear(&self);
}

/// Events the selector broadcasts to the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorEvent {
    /// A device profile was reported by the peer
    Profile,
}

impl SelectorEvent {
    /// Event name used by JavaScript subscribers
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorEvent::Profile => "profile",
        }
    }
}

impl fmt::Display for SelectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectorEvent {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(SelectorEvent::Profile),
            other => Err(SelectorError::invalid_config(format!(
                "Unknown selector event: {other}"
            ))),
        }
    }
}

/// Single-threaded event emitter.
///
/// Emission iterates over a snapshot, so listeners may subscribe,
/// unsubscribe or call back into their owner while it runs. A listener
/// removed by an earlier one (through `off` or `clear`) is skipped for the
/// rest of that emission; one added during it only sees later events.
pub struct EventEmitter<E, P> {
    listeners: RefCell<Vec<(ListenerId, E, Listener<P>)>>,
    next_id: Cell<u32>,
}

impl<E, P> EventEmitter<E, P> {
    /// Create an emitter with no listeners
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Number of registered listeners across all events
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|(existing, _, _)| *existing == id)
    }
}

impl<E, P> Default for EventEmitter<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PartialEq, P> Notifier<E, P> for EventEmitter<E, P> {
    fn on(&self, event: E, listener: Listener<P>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.listeners.borrow_mut().push((id, event, listener));
        id
    }

    fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        listeners.len() != before
    }

    fn emit(&self, event: &E, payload: &P) -> usize {
        let snapshot: Vec<(ListenerId, Listener<P>)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, registered, _)| registered == event)
            .map(|(id, _, listener)| (*id, Rc::clone(listener)))
            .collect();

        let mut notified = 0;
        for (id, listener) in &snapshot {
            if !self.is_registered(*id) {
                continue;
            }
            listener(payload);
            notified += 1;
        }
        notified
    }

    fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(SelectorEvent::Profile.to_string(), "profile");
        assert_eq!("profile".parse::<SelectorEvent>().unwrap(), SelectorEvent::Profile);
        assert!("ready".parse::<SelectorEvent>().is_err());
    }

    #[test]
    fn test_emit_runs_listeners_in_order() {
        let emitter: EventEmitter<SelectorEvent, i32> = EventEmitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            emitter.on(
                SelectorEvent::Profile,
                Rc::new(move |value: &i32| seen.borrow_mut().push((tag, *value))),
            );
        }

        assert_eq!(emitter.emit(&SelectorEvent::Profile, &7), 2);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_off_removes_listener() {
        let emitter: EventEmitter<SelectorEvent, ()> = EventEmitter::new();
        let id = emitter.on(SelectorEvent::Profile, Rc::new(|_: &()| {}));

        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        assert_eq!(emitter.emit(&SelectorEvent::Profile, &()), 0);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_listener_may_unsubscribe_during_emit() {
        let emitter: Rc<EventEmitter<SelectorEvent, ()>> = Rc::new(EventEmitter::new());
        let calls = Rc::new(Cell::new(0));
        let own_id = Rc::new(Cell::new(None));

        let listener = {
            let emitter = Rc::clone(&emitter);
            let calls = Rc::clone(&calls);
            let own_id = Rc::clone(&own_id);
            Rc::new(move |_: &()| {
                calls.set(calls.get() + 1);
                if let Some(id) = own_id.get() {
                    emitter.off(id);
                }
            })
        };
        own_id.set(Some(emitter.on(SelectorEvent::Profile, listener)));

        emitter.emit(&SelectorEvent::Profile, &());
        emitter.emit(&SelectorEvent::Profile, &());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_listener_removed_mid_emit_is_skipped() {
        let emitter: Rc<EventEmitter<SelectorEvent, ()>> = Rc::new(EventEmitter::new());
        let later_calls = Rc::new(Cell::new(0));
        let later_id = Rc::new(Cell::new(None));

        {
            let emitter_ref = Rc::clone(&emitter);
            let later_id = Rc::clone(&later_id);
            emitter.on(
                SelectorEvent::Profile,
                Rc::new(move |_: &()| {
                    if let Some(id) = later_id.get() {
                        emitter_ref.off(id);
                    }
                }),
            );
        }
        let counter = Rc::clone(&later_calls);
        later_id.set(Some(emitter.on(
            SelectorEvent::Profile,
            Rc::new(move |_: &()| counter.set(counter.get() + 1)),
        )));

        assert_eq!(emitter.emit(&SelectorEvent::Profile, &()), 1);
        assert_eq!(later_calls.get(), 0);
    }

    #[test]
    fn test_clear_mid_emit_stops_remaining_listeners() {
        let emitter: Rc<EventEmitter<SelectorEvent, ()>> = Rc::new(EventEmitter::new());
        let later_calls = Rc::new(Cell::new(0));

        let emitter_ref = Rc::clone(&emitter);
        emitter.on(SelectorEvent::Profile, Rc::new(move |_: &()| emitter_ref.clear()));
        let counter = Rc::clone(&later_calls);
        emitter.on(
            SelectorEvent::Profile,
            Rc::new(move |_: &()| counter.set(counter.get() + 1)),
        );

        assert_eq!(emitter.emit(&SelectorEvent::Profile, &()), 1);
        assert_eq!(later_calls.get(), 0);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_listener_added_mid_emit_waits_for_next_event() {
        let emitter: Rc<EventEmitter<SelectorEvent, ()>> = Rc::new(EventEmitter::new());
        let added_calls = Rc::new(Cell::new(0));
        let added = Rc::new(Cell::new(false));

        let emitter_ref = Rc::clone(&emitter);
        let counter = Rc::clone(&added_calls);
        emitter.on(
            SelectorEvent::Profile,
            Rc::new(move |_: &()| {
                if !added.replace(true) {
                    let counter = Rc::clone(&counter);
                    emitter_ref.on(
                        SelectorEvent::Profile,
                        Rc::new(move |_: &()| counter.set(counter.get() + 1)),
                    );
                }
            }),
        );

        emitter.emit(&SelectorEvent::Profile, &());
        assert_eq!(added_calls.get(), 0);
        emitter.emit(&SelectorEvent::Profile, &());
        assert_eq!(added_calls.get(), 1);
    }

    #[test]
    fn test_listener_id_round_trips_through_u32() {
        let emitter: EventEmitter<SelectorEvent, ()> = EventEmitter::new();
        let id = emitter.on(SelectorEvent::Profile, Rc::new(|_: &()| {}));
        assert!(emitter.off(ListenerId::from_u32(id.as_u32())));
    }
}
