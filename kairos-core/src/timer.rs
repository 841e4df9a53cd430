//! One-shot deadline timers
//!
//! The core never owns hardware timers. Each timer is a deadline on the
//! millisecond clock that the owner polls; the firmware sleeps until the
//! earliest one.

/// A single-shot timer
///
/// Re-arming replaces the pending deadline and firing clears it before the
/// caller acts, so at most one expiry is ever outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OneShot {
    deadline: Option<u64>,
}

impl OneShot {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) to expire `period_ms` after `now_ms`
    pub fn arm(&mut self, now_ms: u64, period_ms: u32) {
        self.deadline = Some(now_ms.saturating_add(u64::from(period_ms)));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Consume the expiry if the deadline has passed
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(d) if now_ms >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Earlier of two optional deadlines
pub fn earliest(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
