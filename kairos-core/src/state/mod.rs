//! Screen states and the dispatcher that runs them
//!
//! Each screen implements [`State`]. The dispatcher owns one instance per
//! [`StateId`] in a fixed table, feeds it input events and timer expiries,
//! and applies the [`StateId`] it returns.

mod alarm;
mod context;
mod countdown;
mod dispatcher;
mod edit_clock;
mod edit_timer;
mod id;
mod init;
mod normal;
mod timer_select;

pub use alarm::AlarmState;
pub use context::StateContext;
pub use countdown::CountdownState;
pub use dispatcher::{Dispatcher, Hardware};
pub use edit_clock::{ClockField, EditClockState};
pub use edit_timer::{EditTimerState, TimerDigit};
pub use id::StateId;
pub use init::InitState;
pub use normal::NormalState;
pub use timer_select::TimerSelectState;

use crate::clock::data::{ClockData, TimerSlot};
use crate::config::ClockConfig;
use crate::error::Fault;
use crate::input::Event;

/// Where a state goes when left idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout {
    pub after_ms: u32,
    pub target: StateId,
}

/// Capabilities every screen provides
pub trait State {
    fn id(&self) -> StateId;

    /// Idle timeout armed on entry and on [`StateContext::reset_timeout`]
    fn timeout(&self, _data: &ClockData, _config: &ClockConfig) -> Option<Timeout> {
        None
    }

    /// Runs on every entry, after the previous state's timers were cancelled
    fn init_state(&mut self, _ctx: &mut StateContext<'_>) -> Result<(), Fault> {
        Ok(())
    }

    /// Handle an input event, `None` for a synthetic one
    fn process_event(
        &mut self,
        event: Option<Event>,
        ctx: &mut StateContext<'_>,
    ) -> Result<StateId, Fault>;

    /// A tick requested with [`StateContext::schedule_tick`] expired
    fn on_tick(&mut self, _ctx: &mut StateContext<'_>) -> Result<StateId, Fault> {
        Ok(self.id())
    }

    /// Draw into the view, returning whether any pixel changed
    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool;
}

/// Closed set of state implementations
pub enum AnyState {
    Init(InitState),
    Normal(NormalState),
    TimerSelect(TimerSelectState),
    Countdown(CountdownState),
    Alarm(AlarmState),
    EditClock(EditClockState),
    EditTimer(EditTimerState),
}

macro_rules! delegate {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            AnyState::Init($s) => $e,
            AnyState::Normal($s) => $e,
            AnyState::TimerSelect($s) => $e,
            AnyState::Countdown($s) => $e,
            AnyState::Alarm($s) => $e,
            AnyState::EditClock($s) => $e,
            AnyState::EditTimer($s) => $e,
        }
    };
}

impl AnyState {
    /// The stock implementation of `id`
    pub fn for_id(id: StateId) -> Self {
        match id {
            StateId::Init => AnyState::Init(InitState),
            StateId::Normal => AnyState::Normal(NormalState),
            StateId::Timer1Select => AnyState::TimerSelect(TimerSelectState::new(Some(TimerSlot::One))),
            StateId::Timer2Select => AnyState::TimerSelect(TimerSelectState::new(Some(TimerSlot::Two))),
            StateId::Timer3Select => {
                AnyState::TimerSelect(TimerSelectState::new(Some(TimerSlot::Three)))
            }
            StateId::TimerBackSelect => AnyState::TimerSelect(TimerSelectState::new(None)),
            StateId::TimerStart => AnyState::Countdown(CountdownState::new()),
            StateId::TimerAlarm => AnyState::Alarm(AlarmState),
            StateId::SetHour10 => AnyState::EditClock(EditClockState::new(ClockField::Hour10)),
            StateId::SetHour1 => AnyState::EditClock(EditClockState::new(ClockField::Hour1)),
            StateId::SetMinute10 => AnyState::EditClock(EditClockState::new(ClockField::Minute10)),
            StateId::SetMinute1 => AnyState::EditClock(EditClockState::new(ClockField::Minute1)),
            StateId::SetYear => AnyState::EditClock(EditClockState::new(ClockField::Year)),
            StateId::SetMonth => AnyState::EditClock(EditClockState::new(ClockField::Month)),
            StateId::SetDay => AnyState::EditClock(EditClockState::new(ClockField::Day)),
            StateId::TimerSetMinute10 => AnyState::EditTimer(EditTimerState::new(TimerDigit::Minute10)),
            StateId::TimerSetMinute1 => AnyState::EditTimer(EditTimerState::new(TimerDigit::Minute1)),
            StateId::TimerSetSecond10 => AnyState::EditTimer(EditTimerState::new(TimerDigit::Second10)),
            StateId::TimerSetSecond1 => AnyState::EditTimer(EditTimerState::new(TimerDigit::Second1)),
        }
    }
}

/// One stock instance of every state
pub fn all_states() -> [AnyState; StateId::COUNT] {
    StateId::ALL.map(AnyState::for_id)
}

impl State for AnyState {
    fn id(&self) -> StateId {
        delegate!(self, s => s.id())
    }

    fn timeout(&self, data: &ClockData, config: &ClockConfig) -> Option<Timeout> {
        delegate!(self, s => s.timeout(data, config))
    }

    fn init_state(&mut self, ctx: &mut StateContext<'_>) -> Result<(), Fault> {
        delegate!(self, s => s.init_state(ctx))
    }

    fn process_event(
        &mut self,
        event: Option<Event>,
        ctx: &mut StateContext<'_>,
    ) -> Result<StateId, Fault> {
        delegate!(self, s => s.process_event(event, ctx))
    }

    fn on_tick(&mut self, ctx: &mut StateContext<'_>) -> Result<StateId, Fault> {
        delegate!(self, s => s.on_tick(ctx))
    }

    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool {
        delegate!(self, s => s.prepare_view(ctx))
    }
}
