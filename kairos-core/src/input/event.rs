//! Input events

/// What happened on the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Value increased by one step
    RotateUp,
    /// Value decreased by one step
    RotateDown,
    ButtonDown,
    ButtonUp,
    Click,
    DoubleClick,
    TripleClick,
    /// Button held past the long-click window
    LongClick,
}

/// A decoded input occurrence
///
/// Carries the encoder value and switch level at the time it was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    pub kind: EventKind,
    pub value: i32,
    pub button_pressed: bool,
}

impl Event {
    pub const fn new(kind: EventKind, value: i32, button_pressed: bool) -> Self {
        Self {
            kind,
            value,
            button_pressed,
        }
    }

    /// Any of the click family, including long clicks
    pub fn is_gesture(&self) -> bool {
        matches!(
            self.kind,
            EventKind::Click | EventKind::DoubleClick | EventKind::TripleClick | EventKind::LongClick
        )
    }
}
