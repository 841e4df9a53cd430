//! Clock data model
//!
//! The single shared record every state and the view read from, plus
//! calendar math, environment formatting and the NVRAM layout of the
//! timer durations.

pub mod data;
pub mod env;
pub mod nvram;

pub use data::{days_in_month, is_leap_year, weekday_of, ClockData, TimerSlot, MAX_TIMER_SECS};
