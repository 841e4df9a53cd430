//! Running countdown

use crate::clock::data::MAX_TIMER_SECS;
use crate::error::Fault;
use crate::input::{Event, EventKind};

use super::{State, StateContext, StateId};

/// Counts the selected timer down once per second
///
/// The tick period is corrected for the redraw that follows each
/// decrement, so the displayed seconds do not drift.
pub struct CountdownState;

impl CountdownState {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for CountdownState {
    fn id(&self) -> StateId {
        StateId::TimerStart
    }

    fn init_state(&mut self, ctx: &mut StateContext<'_>) -> Result<(), Fault> {
        let slot = ctx
            .data
            .active_slot()?
            .ok_or(Fault::InvalidTimerSlot(ctx.data.active_timer_selected))?;
        let secs = ctx.data.timer_duration(slot);
        if secs >= MAX_TIMER_SECS {
            return Err(Fault::CountdownOutOfRange(u32::from(secs)));
        }
        ctx.data.active_timer_remaining = secs;
        ctx.schedule_tick(ctx.config.countdown_period_ms);
        Ok(())
    }

    fn process_event(
        &mut self,
        event: Option<Event>,
        _ctx: &mut StateContext<'_>,
    ) -> Result<StateId, Fault> {
        Ok(match event.map(|e| e.kind) {
            Some(EventKind::LongClick) => StateId::Normal,
            _ => StateId::TimerStart,
        })
    }

    fn on_tick(&mut self, ctx: &mut StateContext<'_>) -> Result<StateId, Fault> {
        let remaining = ctx.data.active_timer_remaining.saturating_sub(1);
        ctx.data.active_timer_remaining = remaining;
        if remaining == 0 {
            return Ok(StateId::TimerAlarm);
        }
        ctx.schedule_tick(ctx.config.countdown_period_ms);
        Ok(StateId::TimerStart)
    }

    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool {
        ctx.view.draw_countdown(ctx.data)
    }
}
