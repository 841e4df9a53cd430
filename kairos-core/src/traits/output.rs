//! Buzzer/motor output and time source

/// Audible and haptic feedback
///
/// Both calls return immediately; the pulse or pattern runs elsewhere.
pub trait Annunciator {
    /// Short feedback pulse
    fn buzz(&mut self, duration_ms: u32);

    /// Start or stop the timer alarm (buzzer and vibration motor)
    fn set_alarm(&mut self, active: bool);
}

/// Monotonic millisecond clock
pub trait Monotonic {
    fn now_ms(&self) -> u64;
}
