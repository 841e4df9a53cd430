//! Board-agnostic core logic for the e-paper clock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (panel, RTC, sensor, buzzer)
//! - Rotary encoder decoding and button gesture classification
//! - Clock data model and calendar math
//! - Diff-based view rendering into a 1bpp frame buffer
//! - State variants and the dispatcher that drives them
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod state;
pub mod timer;
pub mod traits;
pub mod view;

pub use error::{Error, Fault};
