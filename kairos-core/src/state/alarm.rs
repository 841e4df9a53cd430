//! Timer alarm

use crate::error::Fault;
use crate::input::{Event, EventKind};

use super::{State, StateContext, StateId};

/// Rings until acknowledged or the alarm window runs out
///
/// Every way out switches the outputs off.
pub struct AlarmState;

impl AlarmState {
    fn stop(ctx: &mut StateContext<'_>) -> StateId {
        ctx.annunciator.set_alarm(false);
        StateId::Normal
    }
}

impl State for AlarmState {
    fn id(&self) -> StateId {
        StateId::TimerAlarm
    }

    fn init_state(&mut self, ctx: &mut StateContext<'_>) -> Result<(), Fault> {
        ctx.data.active_timer_remaining = 0;
        ctx.annunciator.set_alarm(true);
        ctx.schedule_tick(ctx.config.alarm_window_ms);
        Ok(())
    }

    fn process_event(
        &mut self,
        event: Option<Event>,
        ctx: &mut StateContext<'_>,
    ) -> Result<StateId, Fault> {
        Ok(match event {
            Some(e) if e.kind == EventKind::ButtonDown || e.is_gesture() => Self::stop(ctx),
            _ => StateId::TimerAlarm,
        })
    }

    fn on_tick(&mut self, ctx: &mut StateContext<'_>) -> Result<StateId, Fault> {
        Ok(Self::stop(ctx))
    }

    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool {
        ctx.view.draw_countdown(ctx.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::context::fakes::Bench;

    #[test]
    fn test_rings_for_window() {
        let mut bench = Bench::default();
        let mut ctx = bench.ctx();
        AlarmState.init_state(&mut ctx).unwrap();
        assert_eq!(ctx.requests().tick_ms, Some(20_000));
        assert_eq!(AlarmState.on_tick(&mut ctx), Ok(StateId::Normal));
        drop(ctx);
        assert_eq!(bench.beeper.alarm, [true, false]);
    }

    #[test]
    fn test_any_button_interaction_acknowledges() {
        for kind in [EventKind::ButtonDown, EventKind::Click, EventKind::DoubleClick, EventKind::TripleClick, EventKind::LongClick] {
            let mut bench = Bench::default();
            let next = AlarmState.process_event(Some(Event::new(kind, 0, false)), &mut bench.ctx());
            assert_eq!(next, Ok(StateId::Normal));
            assert_eq!(bench.beeper.alarm, [false]);
        }
    }

    #[test]
    fn test_rotation_does_not_acknowledge() {
        let mut bench = Bench::default();
        let next = AlarmState.process_event(Some(Event::new(EventKind::RotateUp, 1, false)), &mut bench.ctx());
        assert_eq!(next, Ok(StateId::TimerAlarm));
        assert!(bench.beeper.alarm.is_empty());
    }
}
