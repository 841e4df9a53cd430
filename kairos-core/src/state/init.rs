//! Boot state

use crate::clock::nvram;
use crate::error::Fault;
use crate::input::Event;

use super::{State, StateContext, StateId};

/// Shows the splash and decides where the clock starts
///
/// The dispatcher feeds it one synthetic event. It loads the time from the
/// RTC and the timer durations from NVRAM, then moves on to the home screen
/// or, when the RTC was never set, straight into time entry.
pub struct InitState;

impl State for InitState {
    fn id(&self) -> StateId {
        StateId::Init
    }

    fn process_event(
        &mut self,
        event: Option<Event>,
        ctx: &mut StateContext<'_>,
    ) -> Result<StateId, Fault> {
        if event.is_some() {
            return Ok(StateId::Init);
        }

        let plausible = match ctx.rtc.read_datetime() {
            Ok(dt) => {
                ctx.data.apply_datetime(&dt, ctx.config.first_valid_year)
                    && dt.year <= ctx.config.last_valid_year
            }
            Err(e) => {
                warn!("RTC read failed: {}", e);
                false
            }
        };
        ctx.data.is_init = plausible;

        if let Err(e) = nvram::load_durations(ctx.rtc, ctx.data) {
            warn!("timer durations not loaded: {}", e);
        }

        Ok(if plausible {
            StateId::Normal
        } else {
            StateId::SetHour10
        })
    }

    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool {
        ctx.view.draw_init()
    }
}
