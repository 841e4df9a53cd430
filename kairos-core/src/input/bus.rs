//! Event fan-out
//!
//! The encoder owns its listener list and hands every event out by value.
//! A failing listener is counted and skipped; delivery to the rest goes on.

use heapless::Vec;

use super::event::Event;

/// Errors a listener may report for a single delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListenerError {
    /// Downstream queue had no room, event dropped
    QueueFull,
    /// Listener refused the event
    Rejected,
}

/// Receiver of input events
///
/// Called synchronously from the task that decodes the encoder, so
/// implementations must not block.
pub trait Listener {
    fn on_event(&self, event: Event) -> Result<(), ListenerError>;
}

impl<F> Listener for F
where
    F: Fn(Event) -> Result<(), ListenerError>,
{
    fn on_event(&self, event: Event) -> Result<(), ListenerError> {
        self(event)
    }
}

/// Fixed-capacity list of listeners
pub struct EventBus<'a, const N: usize> {
    listeners: Vec<&'a dyn Listener, N>,
}

impl<'a, const N: usize> EventBus<'a, N> {
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener, handing it back if the list is full
    pub fn add_listener(&mut self, listener: &'a dyn Listener) -> Result<(), &'a dyn Listener> {
        self.listeners.push(listener)
    }

    /// Unregister by identity. Returns false if it was never registered.
    pub fn remove_listener(&mut self, listener: &dyn Listener) -> bool {
        let found = self
            .listeners
            .iter()
            .position(|l| core::ptr::addr_eq(*l, listener));
        match found {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver to every listener in registration order
    ///
    /// Returns the number of listeners that failed.
    pub fn notify(&self, event: Event) -> usize {
        let mut failed = 0;
        for listener in self.listeners.iter() {
            if let Err(e) = listener.on_event(event) {
                warn!("listener failed: {}", e);
                failed += 1;
            }
        }
        failed
    }
}

impl<const N: usize> Default for EventBus<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::EventKind;
    use core::cell::{Cell, RefCell};

    fn click() -> Event {
        Event::new(EventKind::Click, 0, false)
    }

    #[test]
    fn test_delivers_in_registration_order() {
        let order: RefCell<heapless::Vec<u8, 4>> = RefCell::new(heapless::Vec::new());
        let first = |_e: Event| -> Result<(), ListenerError> {
            let _ = order.borrow_mut().push(1);
            Ok(())
        };
        let second = |_e: Event| -> Result<(), ListenerError> {
            let _ = order.borrow_mut().push(2);
            Ok(())
        };

        let mut bus: EventBus<'_, 4> = EventBus::new();
        assert!(bus.add_listener(&first).is_ok());
        assert!(bus.add_listener(&second).is_ok());

        assert_eq!(bus.notify(click()), 0);
        assert_eq!(order.borrow().as_slice(), &[1, 2]);
    }

    #[test]
    fn test_failing_listener_is_isolated() {
        let seen = Cell::new(0u8);
        let broken = |_e: Event| -> Result<(), ListenerError> { Err(ListenerError::Rejected) };
        let counter = |_e: Event| -> Result<(), ListenerError> {
            seen.set(seen.get() + 1);
            Ok(())
        };

        let mut bus: EventBus<'_, 2> = EventBus::new();
        let _ = bus.add_listener(&broken);
        let _ = bus.add_listener(&counter);

        assert_eq!(bus.notify(click()), 1);
        assert_eq!(bus.notify(click()), 1);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_capacity_and_removal() {
        let hits = Cell::new(0u8);
        let a = |_e: Event| -> Result<(), ListenerError> {
            hits.set(hits.get() + 1);
            Ok(())
        };
        let b = |_e: Event| -> Result<(), ListenerError> {
            hits.set(hits.get() + 10);
            Ok(())
        };

        let mut bus: EventBus<'_, 1> = EventBus::new();
        assert!(bus.add_listener(&a).is_ok());
        assert!(bus.add_listener(&b).is_err());

        assert!(!bus.remove_listener(&b));
        assert_eq!(bus.notify(click()), 0);
        assert_eq!(hits.get(), 1);

        assert!(bus.remove_listener(&a));
        assert!(bus.is_empty());
        assert_eq!(bus.notify(click()), 0);
        assert_eq!(hits.get(), 1);
    }
}
