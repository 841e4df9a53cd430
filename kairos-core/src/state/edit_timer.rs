//! Timer duration entry

use crate::clock::data::{ClockData, TimerSlot};
use crate::clock::nvram;
use crate::config::ClockConfig;
use crate::error::Fault;
use crate::input::rotary::bound;
use crate::input::{Event, EventKind};
use crate::view::{EditFrame, Highlight};

use super::{State, StateContext, StateId, Timeout, TimerSelectState};

/// Digit of `MM:SS` a [`EditTimerState`] edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerDigit {
    Minute10,
    Minute1,
    Second10,
    Second1,
}

impl TimerDigit {
    fn position(self) -> u8 {
        match self {
            TimerDigit::Minute10 => 0,
            TimerDigit::Minute1 => 1,
            TimerDigit::Second10 => 2,
            TimerDigit::Second1 => 3,
        }
    }

    fn max(self) -> i32 {
        match self {
            TimerDigit::Minute10 | TimerDigit::Second10 => 5,
            TimerDigit::Minute1 | TimerDigit::Second1 => 9,
        }
    }
}

fn split(secs: u16) -> [u8; 4] {
    let (m, s) = ((secs / 60) as u8, (secs % 60) as u8);
    [m / 10, m % 10, s / 10, s % 10]
}

fn join(digits: [u8; 4]) -> u16 {
    let m = u16::from(digits[0]) * 10 + u16::from(digits[1]);
    let s = u16::from(digits[2]) * 10 + u16::from(digits[3]);
    m * 60 + s
}

/// Edits one digit of the selected timer's duration
///
/// Digits go into `ClockData::timer_draft`. Only the last digit takes the
/// draft over as the timer's duration and persists it to NVRAM, then starts
/// the timer or goes back to the selection when the duration ended up zero.
/// An edit abandoned by the idle timeout leaves the timer untouched.
pub struct EditTimerState {
    digit: TimerDigit,
    value: u8,
}

impl EditTimerState {
    pub const fn new(digit: TimerDigit) -> Self {
        Self { digit, value: 0 }
    }

    fn slot(data: &ClockData) -> Result<TimerSlot, Fault> {
        data.active_slot()?
            .ok_or(Fault::InvalidTimerSlot(data.active_timer_selected))
    }

    fn next(&self) -> Option<StateId> {
        match self.digit {
            TimerDigit::Minute10 => Some(StateId::TimerSetMinute1),
            TimerDigit::Minute1 => Some(StateId::TimerSetSecond10),
            TimerDigit::Second10 => Some(StateId::TimerSetSecond1),
            TimerDigit::Second1 => None,
        }
    }

    fn commit(&self, ctx: &mut StateContext<'_>) -> Result<StateId, Fault> {
        let slot = Self::slot(ctx.data)?;
        let mut digits = split(ctx.data.timer_draft);
        digits[usize::from(self.digit.position())] = self.value;
        let secs = join(digits);
        ctx.data.timer_draft = secs;

        if let Some(next) = self.next() {
            return Ok(next);
        }
        ctx.data.set_timer_duration(slot, secs);
        ctx.data.active_timer_remaining = secs;
        if let Err(e) = nvram::store_duration(ctx.rtc, slot, secs) {
            warn!("timer {} not persisted: {}", slot.index(), e);
        }
        Ok(if secs > 0 {
            StateId::TimerStart
        } else {
            TimerSelectState::id_for(Some(slot))
        })
    }
}

impl State for EditTimerState {
    fn id(&self) -> StateId {
        match self.digit {
            TimerDigit::Minute10 => StateId::TimerSetMinute10,
            TimerDigit::Minute1 => StateId::TimerSetMinute1,
            TimerDigit::Second10 => StateId::TimerSetSecond10,
            TimerDigit::Second1 => StateId::TimerSetSecond1,
        }
    }

    fn timeout(&self, _data: &ClockData, config: &ClockConfig) -> Option<Timeout> {
        Some(Timeout {
            after_ms: config.idle_timeout_ms,
            target: StateId::Normal,
        })
    }

    fn init_state(&mut self, ctx: &mut StateContext<'_>) -> Result<(), Fault> {
        let slot = Self::slot(ctx.data)?;
        if self.digit == TimerDigit::Minute10 {
            ctx.data.timer_draft = ctx.data.timer_duration(slot);
        }
        let current = split(ctx.data.timer_draft)[usize::from(self.digit.position())];
        self.value = current.min(self.digit.max() as u8);
        Ok(())
    }

    fn process_event(
        &mut self,
        event: Option<Event>,
        ctx: &mut StateContext<'_>,
    ) -> Result<StateId, Fault> {
        let delta = match event.map(|e| e.kind) {
            Some(EventKind::RotateUp) => 1,
            Some(EventKind::RotateDown) => -1,
            Some(EventKind::Click) => {
                let next = self.commit(ctx)?;
                ctx.buzz();
                return Ok(next);
            }
            _ => return Ok(self.id()),
        };

        let value = i32::from(self.value);
        let next = bound(value, delta, 0, self.digit.max());
        if next != value {
            self.value = next as u8;
            ctx.buzz();
        }
        ctx.reset_timeout();
        Ok(self.id())
    }

    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool {
        let mut digits = split(ctx.data.timer_draft);
        let position = self.digit.position();
        digits[usize::from(position)] = self.value;
        let frame = EditFrame {
            digits,
            date: None,
            highlight: Highlight::Digit(position),
        };
        ctx.view.draw_edit(ctx.data, &frame)
    }
}
