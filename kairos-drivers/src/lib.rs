//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in kairos-core, all on top of the blocking embedded-hal 1.0 traits:
//!
//! - RTC module (DS3231 clock, AT24C32 EEPROM as NVRAM)
//! - Environment sensor (BMP280)
//! - E-paper panel (1.54" 200x200, SSD1681 controller)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod display;
pub mod rtc;
pub mod sensor;

#[cfg(test)]
mod testing;
