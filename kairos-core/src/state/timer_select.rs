//! Timer selection ring

use crate::clock::data::{ClockData, TimerSlot};
use crate::config::ClockConfig;
use crate::error::Fault;
use crate::input::{Event, EventKind};

use super::{State, StateContext, StateId, Timeout};

/// One member of the Timer1 → Timer2 → Timer3 → Back ring
///
/// `slot` is `None` for the back entry.
pub struct TimerSelectState {
    slot: Option<TimerSlot>,
}

impl TimerSelectState {
    pub const fn new(slot: Option<TimerSlot>) -> Self {
        Self { slot }
    }

    pub fn id_for(slot: Option<TimerSlot>) -> StateId {
        match slot {
            Some(TimerSlot::One) => StateId::Timer1Select,
            Some(TimerSlot::Two) => StateId::Timer2Select,
            Some(TimerSlot::Three) => StateId::Timer3Select,
            None => StateId::TimerBackSelect,
        }
    }
}

impl State for TimerSelectState {
    fn id(&self) -> StateId {
        Self::id_for(self.slot)
    }

    fn timeout(&self, _data: &ClockData, config: &ClockConfig) -> Option<Timeout> {
        Some(Timeout {
            after_ms: config.idle_timeout_ms,
            target: StateId::Normal,
        })
    }

    fn init_state(&mut self, ctx: &mut StateContext<'_>) -> Result<(), Fault> {
        let d = &mut *ctx.data;
        match self.slot {
            Some(slot) => {
                d.active_timer_selected = slot.index();
                d.active_timer_remaining = d.timer_duration(slot);
            }
            None => {
                d.active_timer_selected = 0;
                d.active_timer_remaining = 0;
            }
        }
        Ok(())
    }

    fn process_event(
        &mut self,
        event: Option<Event>,
        ctx: &mut StateContext<'_>,
    ) -> Result<StateId, Fault> {
        let id = self.id();
        let Some(event) = event else {
            return Ok(id);
        };

        let next = match (event.kind, self.slot) {
            (EventKind::RotateUp, _) => id.ring_next(),
            (EventKind::RotateDown, _) => id.ring_prev(),
            (EventKind::Click | EventKind::LongClick, None) => Some(StateId::Normal),
            (EventKind::Click, Some(slot)) if ctx.data.timer_duration(slot) > 0 => {
                Some(StateId::TimerStart)
            }
            (EventKind::Click | EventKind::LongClick, Some(_)) => Some(StateId::TimerSetMinute10),
            _ => None,
        };
        Ok(next.unwrap_or(id))
    }

    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool {
        ctx.view.draw_countdown(ctx.data)
    }
}
