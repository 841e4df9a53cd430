//! Error taxonomy
//!
//! [`Fault`] is the programming-error class: the firmware halts on it.
//! Panel errors abort one redraw and are reported; RTC and sensor errors
//! never leave the state that hit them.

use crate::state::StateId;
use crate::traits::PanelError;

/// Unrecoverable configuration or programming error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// A transition named a state that was never registered
    UnknownState(StateId),
    /// Active timer index outside 1..=3
    InvalidTimerSlot(u8),
    /// Countdown seeded with a duration of an hour or more
    CountdownOutOfRange(u32),
}

/// Anything a dispatcher call can fail with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Fault(Fault),
    Panel(PanelError),
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Fault(_))
    }
}

impl From<Fault> for Error {
    fn from(f: Fault) -> Self {
        Error::Fault(f)
    }
}

impl From<PanelError> for Error {
    fn from(e: PanelError) -> Self {
        Error::Panel(e)
    }
}
