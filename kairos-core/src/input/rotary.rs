//! Rotary encoder with push button
//!
//! Combines the quadrature decoder, the value range policy and the button
//! classifier, and publishes the result on its own [`EventBus`].

use crate::config::{ButtonTiming, RangeMode, RotaryConfig};

use super::bus::{EventBus, Listener};
use super::button::ButtonClassifier;
use super::event::{Event, EventKind};
use super::quadrature::Decoder;

/// Apply `delta` wrapping modulo the range width
pub fn wrap(value: i32, delta: i32, min: i32, max: i32) -> i32 {
    let span = max - min + 1;
    if span <= 0 {
        return min;
    }
    min + (value + delta - min).rem_euclid(span)
}

/// Apply `delta` clamped to `[min, max]`
pub fn bound(value: i32, delta: i32, min: i32, max: i32) -> i32 {
    (value + delta).clamp(min, max.max(min))
}

/// Encoder front end
///
/// `N` is the listener capacity.
pub struct Rotary<'a, const N: usize> {
    config: RotaryConfig,
    value: i32,
    decoder: Decoder,
    button: ButtonClassifier,
    pressed: bool,
    bus: EventBus<'a, N>,
}

impl<'a, const N: usize> Rotary<'a, N> {
    pub fn new(config: RotaryConfig, timing: ButtonTiming) -> Self {
        Self {
            config,
            value: config.start,
            decoder: Decoder::new(config.half_step),
            button: ButtonClassifier::new(timing),
            pressed: false,
            bus: EventBus::new(),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn set_value(&mut self, value: i32) {
        self.value = value;
        self.decoder.reset();
    }

    pub fn reset(&mut self) {
        self.set_value(0);
    }

    /// Replace the range policy, keeping the current value
    pub fn reconfigure(&mut self, min: i32, max: i32, range: RangeMode, reverse: bool) {
        self.config.min = min;
        self.config.max = max;
        self.config.range = range;
        self.config.reverse = reverse;
        self.decoder.reset();
    }

    pub fn add_listener(&mut self, listener: &'a dyn Listener) -> Result<(), &'a dyn Listener> {
        self.bus.add_listener(listener)
    }

    pub fn remove_listener(&mut self, listener: &dyn Listener) -> bool {
        self.bus.remove_listener(listener)
    }

    /// Feed one sample of the two quadrature pins
    ///
    /// Publishes and returns a rotate event only when the value changed.
    pub fn process_pins(&mut self, clk: bool, dt: bool) -> Option<Event> {
        let direction = self.decoder.update(clk, dt)?;
        let mut delta = direction.delta();
        if self.config.reverse {
            delta = -delta;
        }

        let c = &self.config;
        let next = match c.range {
            RangeMode::Unbounded => self.value.wrapping_add(delta),
            RangeMode::Wrap => wrap(self.value, delta, c.min, c.max),
            RangeMode::Bounded => bound(self.value, delta, c.min, c.max),
        };
        if next == self.value {
            return None;
        }
        self.value = next;

        let kind = if delta > 0 {
            EventKind::RotateUp
        } else {
            EventKind::RotateDown
        };
        Some(self.publish(kind))
    }

    /// Feed a debounced switch level
    ///
    /// Repeated levels are ignored.
    pub fn process_switch(&mut self, pressed: bool, now_ms: u64) {
        if pressed == self.pressed {
            return;
        }
        self.pressed = pressed;

        if pressed {
            self.button.on_press(now_ms);
            self.publish(EventKind::ButtonDown);
        } else {
            if let Some(kind) = self.button.on_release(now_ms) {
                self.publish(kind);
            }
            self.publish(EventKind::ButtonUp);
        }
    }

    /// Publish any gesture whose window elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<Event> {
        let kind = self.button.poll(now_ms)?;
        Some(self.publish(kind))
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.button.next_deadline()
    }

    fn publish(&self, kind: EventKind) -> Event {
        let event = Event::new(kind, self.value, self.pressed);
        let failed = self.bus.notify(event);
        if failed > 0 {
            debug!("{} listener(s) dropped {}", failed, event);
        }
        event
    }
}
