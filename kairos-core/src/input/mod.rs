//! Rotary encoder input
//!
//! Raw pin samples go in, semantic [`Event`]s come out through the
//! [`EventBus`]. Nothing here touches the display or the dispatcher.

pub mod bus;
pub mod button;
pub mod event;
pub mod quadrature;
pub mod rotary;

pub use bus::{EventBus, Listener, ListenerError};
pub use button::ButtonClassifier;
pub use event::{Event, EventKind};
pub use quadrature::{Decoder, Direction};
pub use rotary::Rotary;
