//! Home screen

use crate::error::Fault;
use crate::input::{Event, EventKind};

use super::{State, StateContext, StateId};

/// Live time, date and environment
///
/// Re-reads the RTC on every entry; the dispatcher's minute refresh
/// re-runs the entry as well.
pub struct NormalState;

impl State for NormalState {
    fn id(&self) -> StateId {
        StateId::Normal
    }

    fn init_state(&mut self, ctx: &mut StateContext<'_>) -> Result<(), Fault> {
        match ctx.rtc.read_datetime() {
            Ok(dt) => {
                let is_init = ctx.data.is_init;
                ctx.data.apply_datetime(&dt, ctx.config.first_valid_year);
                ctx.data.is_init |= is_init;
            }
            Err(e) => warn!("RTC read failed: {}", e),
        }
        Ok(())
    }

    fn process_event(
        &mut self,
        event: Option<Event>,
        _ctx: &mut StateContext<'_>,
    ) -> Result<StateId, Fault> {
        Ok(match event.map(|e| e.kind) {
            Some(EventKind::LongClick) => StateId::SetHour10,
            Some(EventKind::Click) => StateId::Timer1Select,
            _ => StateId::Normal,
        })
    }

    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool {
        ctx.view.draw_normal(ctx.data)
    }
}
