//! State identifiers

/// Every screen the clock can be in
///
/// The discriminant doubles as the index into the dispatcher's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateId {
    Init,
    Normal,
    Timer1Select,
    Timer2Select,
    Timer3Select,
    TimerBackSelect,
    TimerStart,
    TimerAlarm,
    SetHour10,
    SetHour1,
    SetMinute10,
    SetMinute1,
    SetYear,
    SetMonth,
    SetDay,
    TimerSetMinute10,
    TimerSetMinute1,
    TimerSetSecond10,
    TimerSetSecond1,
}

impl StateId {
    pub const COUNT: usize = 19;

    pub const ALL: [StateId; Self::COUNT] = [
        StateId::Init,
        StateId::Normal,
        StateId::Timer1Select,
        StateId::Timer2Select,
        StateId::Timer3Select,
        StateId::TimerBackSelect,
        StateId::TimerStart,
        StateId::TimerAlarm,
        StateId::SetHour10,
        StateId::SetHour1,
        StateId::SetMinute10,
        StateId::SetMinute1,
        StateId::SetYear,
        StateId::SetMonth,
        StateId::SetDay,
        StateId::TimerSetMinute10,
        StateId::TimerSetMinute1,
        StateId::TimerSetSecond10,
        StateId::TimerSetSecond1,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Timer select ring, incrementing direction
    pub fn ring_next(self) -> Option<StateId> {
        match self {
            StateId::Timer1Select => Some(StateId::Timer2Select),
            StateId::Timer2Select => Some(StateId::Timer3Select),
            StateId::Timer3Select => Some(StateId::TimerBackSelect),
            StateId::TimerBackSelect => Some(StateId::Timer1Select),
            _ => None,
        }
    }

    /// Timer select ring, decrementing direction
    pub fn ring_prev(self) -> Option<StateId> {
        match self {
            StateId::Timer1Select => Some(StateId::TimerBackSelect),
            StateId::Timer2Select => Some(StateId::Timer1Select),
            StateId::Timer3Select => Some(StateId::Timer2Select),
            StateId::TimerBackSelect => Some(StateId::Timer3Select),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_table() {
        for (i, id) in StateId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_ring_is_closed() {
        let mut id = StateId::Timer1Select;
        for _ in 0..4 {
            let next = id.ring_next().unwrap();
            assert_eq!(next.ring_prev(), Some(id));
            id = next;
        }
        assert_eq!(id, StateId::Timer1Select);
        assert_eq!(StateId::Normal.ring_next(), None);
    }
}
