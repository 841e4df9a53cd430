//! E-paper panel implementations

pub mod epd1in54;

pub use epd1in54::{Epd1in54, EpdConfig};
