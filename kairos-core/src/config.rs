//! Configuration type definitions
//!
//! Timing constants and input policies. Everything has a `Default`
//! matching the shipped clock; boards override individual fields.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Button gesture timing windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonTiming {
    /// Continuous press that produces a long click
    pub long_click_ms: u32,
    /// Longest press that still counts as a click
    pub click_ms: u32,
    /// Window in which a following release merges into a double/triple click
    pub multi_click_ms: u32,
    /// Settle time applied to the switch pin before sampling
    pub debounce_ms: u32,
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            long_click_ms: 800,
            click_ms: 300,
            multi_click_ms: 450,
            debounce_ms: 50,
        }
    }
}

/// How the encoder value reacts to leaving `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RangeMode {
    /// No limits, min/max are ignored
    #[default]
    Unbounded,
    /// Wrap around modulo the range width
    Wrap,
    /// Clamp at the limits
    Bounded,
}

/// Rotary encoder value policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RotaryConfig {
    pub min: i32,
    pub max: i32,
    /// Initial value
    pub start: i32,
    /// Invert the sign of every decoded step
    pub reverse: bool,
    pub range: RangeMode,
    /// Use the half-step table (detent on both 00 and 11)
    pub half_step: bool,
}

impl Default for RotaryConfig {
    fn default() -> Self {
        Self {
            min: 0,
            max: 10,
            start: 0,
            reverse: true,
            range: RangeMode::Unbounded,
            half_step: false,
        }
    }
}

/// Clock behaviour constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Idle timeout of select and edit screens
    pub idle_timeout_ms: u32,
    /// How long the timer alarm rings before giving up
    pub alarm_window_ms: u32,
    /// Feedback pulse for accepted edits
    pub buzz_ms: u32,
    /// Countdown tick period
    pub countdown_period_ms: u32,
    /// Floor for the minute refresh when the redraw overran the boundary
    pub min_refresh_ms: u32,
    /// Floor for the latency-corrected countdown tick
    pub min_tick_ms: u32,
    /// Station elevation for the sea level pressure reduction
    pub elevation_m: u16,
    /// RTC dates before this year are treated as never set
    pub first_valid_year: u16,
    pub last_valid_year: u16,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 15_000,
            alarm_window_ms: 20_000,
            buzz_ms: 125,
            countdown_period_ms: 1_000,
            min_refresh_ms: 100,
            min_tick_ms: 50,
            elevation_m: 360,
            first_valid_year: 2020,
            last_valid_year: 2096,
        }
    }
}
