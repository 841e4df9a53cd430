//! Time and date entry, one field per state

use crate::clock::data::ClockData;
use crate::config::ClockConfig;
use crate::error::Fault;
use crate::input::rotary::bound;
use crate::input::{Event, EventKind};
use crate::view::{EditFrame, Highlight};

use super::{State, StateContext, StateId, Timeout};

/// The field a [`EditClockState`] edits, in entry order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockField {
    Hour10,
    Hour1,
    Minute10,
    Minute1,
    Year,
    Month,
    Day,
}

/// Edits one field of the clock
///
/// Hour and minute digits are edited on a local copy and written back on
/// click; year, month and day are edited in place. Committing the day
/// writes the RTC and marks the clock as set.
pub struct EditClockState {
    field: ClockField,
    digit: u8,
}

impl EditClockState {
    pub const fn new(field: ClockField) -> Self {
        Self { field, digit: 0 }
    }

    pub fn field(&self) -> ClockField {
        self.field
    }

    fn next(&self) -> StateId {
        match self.field {
            ClockField::Hour10 => StateId::SetHour1,
            ClockField::Hour1 => StateId::SetMinute10,
            ClockField::Minute10 => StateId::SetMinute1,
            ClockField::Minute1 => StateId::SetYear,
            ClockField::Year => StateId::SetMonth,
            ClockField::Month => StateId::SetDay,
            ClockField::Day => StateId::Normal,
        }
    }

    /// Valid values given what was entered so far
    fn range(&self, data: &ClockData, config: &ClockConfig) -> (i32, i32) {
        match self.field {
            ClockField::Hour10 => (0, 2),
            ClockField::Hour1 if data.hour / 10 == 2 => (0, 3),
            ClockField::Hour1 | ClockField::Minute1 => (0, 9),
            ClockField::Minute10 => (0, 5),
            ClockField::Year => (
                i32::from(config.first_valid_year),
                i32::from(config.last_valid_year),
            ),
            ClockField::Month => (1, 12),
            ClockField::Day => (1, i32::from(data.days_in_month().max(1))),
        }
    }

    fn value(&self, data: &ClockData) -> i32 {
        match self.field {
            ClockField::Year => i32::from(data.year),
            ClockField::Month => i32::from(data.month),
            ClockField::Day => i32::from(data.day),
            _ => i32::from(self.digit),
        }
    }

    fn set_value(&mut self, data: &mut ClockData, value: i32) {
        let (y, m, d) = (data.year, data.month, data.day);
        match self.field {
            ClockField::Year => data.set_date(value as u16, m, d),
            ClockField::Month => data.set_date(y, value as u8, d),
            ClockField::Day => data.set_date(y, m, value as u8),
            _ => self.digit = value as u8,
        }
    }

    fn commit(&self, ctx: &mut StateContext<'_>) {
        let d = &mut *ctx.data;
        match self.field {
            ClockField::Hour10 => d.hour = (self.digit * 10 + d.hour % 10).min(23),
            ClockField::Hour1 => d.hour = d.hour / 10 * 10 + self.digit,
            ClockField::Minute10 => d.minute = self.digit * 10 + d.minute % 10,
            ClockField::Minute1 => d.minute = d.minute / 10 * 10 + self.digit,
            ClockField::Year | ClockField::Month => {}
            ClockField::Day => {
                d.recompute_weekday();
                d.second = 0;
                d.is_init = true;
                if let Err(e) = ctx.rtc.write_datetime(&d.to_datetime()) {
                    warn!("RTC write failed: {}", e);
                }
            }
        }
    }

    fn frame(&self, data: &ClockData) -> EditFrame {
        let mut digits = [data.hour / 10, data.hour % 10, data.minute / 10, data.minute % 10];
        let highlight = match self.field {
            ClockField::Hour10 => Highlight::Digit(0),
            ClockField::Hour1 => Highlight::Digit(1),
            ClockField::Minute10 => Highlight::Digit(2),
            ClockField::Minute1 => Highlight::Digit(3),
            ClockField::Year => Highlight::Year,
            ClockField::Month => Highlight::Month,
            ClockField::Day => Highlight::Day,
        };
        if let Highlight::Digit(n) = highlight {
            digits[usize::from(n)] = self.digit;
        }
        EditFrame {
            digits,
            date: Some((data.year, data.month, data.day)),
            highlight,
        }
    }
}

impl State for EditClockState {
    fn id(&self) -> StateId {
        match self.field {
            ClockField::Hour10 => StateId::SetHour10,
            ClockField::Hour1 => StateId::SetHour1,
            ClockField::Minute10 => StateId::SetMinute10,
            ClockField::Minute1 => StateId::SetMinute1,
            ClockField::Year => StateId::SetYear,
            ClockField::Month => StateId::SetMonth,
            ClockField::Day => StateId::SetDay,
        }
    }

    /// Only a clock that was set before may be abandoned half-way
    fn timeout(&self, data: &ClockData, config: &ClockConfig) -> Option<Timeout> {
        data.is_init.then_some(Timeout {
            after_ms: config.idle_timeout_ms,
            target: StateId::Normal,
        })
    }

    fn init_state(&mut self, ctx: &mut StateContext<'_>) -> Result<(), Fault> {
        self.digit = match self.field {
            ClockField::Hour10 => ctx.data.hour / 10,
            ClockField::Hour1 => ctx.data.hour % 10,
            ClockField::Minute10 => ctx.data.minute / 10,
            ClockField::Minute1 => ctx.data.minute % 10,
            _ => 0,
        };
        let (min, max) = self.range(ctx.data, ctx.config);
        let value = self.value(ctx.data);
        if !(min..=max).contains(&value) {
            self.set_value(ctx.data, value.clamp(min, max));
        }
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
                self.commit(ctx);
                ctx.buzz();
                return Ok(self.next());
            }
            _ => return Ok(self.id()),
        };

        let (min, max) = self.range(ctx.data, ctx.config);
        let value = self.value(ctx.data);
        let next = bound(value, delta, min, max);
        if next != value {
            self.set_value(ctx.data, next);
            ctx.buzz();
        }
        ctx.reset_timeout();
        Ok(self.id())
    }

    fn prepare_view(&mut self, ctx: &mut StateContext<'_>) -> bool {
        let frame = self.frame(ctx.data);
        ctx.view.draw_edit(ctx.data, &frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::context::fakes::Bench;

    fn rotate(s: &mut EditClockState, bench: &mut Bench, kind: EventKind, times: usize) {
        for _ in 0..times {
            let id = s.process_event(Some(Event::new(kind, 0, false)), &mut bench.ctx());
            assert_eq!(id, Ok(s.id()));
        }
    }

    fn click(s: &mut EditClockState, bench: &mut Bench) -> StateId {
        s.process_event(Some(Event::new(EventKind::Click, 0, false)), &mut bench.ctx())
            .unwrap()
    }

    #[test]
    fn test_hour_tens_clamps_at_two() {
        let mut bench = Bench::default();
        let mut s = EditClockState::new(ClockField::Hour10);
        s.init_state(&mut bench.ctx()).unwrap();
        rotate(&mut s, &mut bench, EventKind::RotateUp, 5);
        assert_eq!(s.digit, 2);
        // Two accepted steps buzz, the clamped ones stay silent
        assert_eq!(bench.beeper.buzzes, 2);
        rotate(&mut s, &mut bench, EventKind::RotateDown, 5);
        assert_eq!(s.digit, 0);
    }

    #[test]
    fn test_hour_ones_limit_follows_tens() {
        let mut bench = Bench::default();
        bench.data.hour = 20;
        let mut s = EditClockState::new(ClockField::Hour1);
        s.init_state(&mut bench.ctx()).unwrap();
        rotate(&mut s, &mut bench, EventKind::RotateUp, 9);
        assert_eq!(s.digit, 3);

        bench.data.hour = 10;
        s.init_state(&mut bench.ctx()).unwrap();
        rotate(&mut s, &mut bench, EventKind::RotateUp, 12);
        assert_eq!(s.digit, 9);
    }

    #[test]
    fn test_hour_tens_commit_keeps_hour_valid() {
        let mut bench = Bench::default();
        bench.data.hour = 9;
        let mut s = EditClockState::new(ClockField::Hour10);
        s.init_state(&mut bench.ctx()).unwrap();
        rotate(&mut s, &mut bench, EventKind::RotateUp, 2);
        assert_eq!(click(&mut s, &mut bench), StateId::SetHour1);
        assert_eq!(bench.data.hour, 23);
    }

    #[test]
    fn test_minute_digits_commit() {
        let mut bench = Bench::default();
        bench.data.minute = 7;
        let mut tens = EditClockState::new(ClockField::Minute10);
        tens.init_state(&mut bench.ctx()).unwrap();
        rotate(&mut tens, &mut bench, EventKind::RotateUp, 4);
        assert_eq!(click(&mut tens, &mut bench), StateId::SetMinute1);
        assert_eq!(bench.data.minute, 47);

        let mut ones = EditClockState::new(ClockField::Minute1);
        ones.init_state(&mut bench.ctx()).unwrap();
        assert_eq!(ones.digit, 7);
        rotate(&mut ones, &mut bench, EventKind::RotateDown, 2);
        assert_eq!(click(&mut ones, &mut bench), StateId::SetYear);
        assert_eq!(bench.data.minute, 45);
    }

    #[test]
    fn test_leap_day_bound() {
        let mut bench = Bench::default();
        bench.data.set_date(2024, 2, 28);
        let mut s = EditClockState::new(ClockField::Day);
        s.init_state(&mut bench.ctx()).unwrap();
        rotate(&mut s, &mut bench, EventKind::RotateUp, 3);
        assert_eq!(bench.data.day, 29);

        bench.data.set_date(2023, 2, 28);
        s.init_state(&mut bench.ctx()).unwrap();
        rotate(&mut s, &mut bench, EventKind::RotateUp, 3);
        assert_eq!(bench.data.day, 28);
    }

    #[test]
    fn test_entering_day_clamps_to_month() {
        let mut bench = Bench::default();
        bench.data.set_date(2023, 4, 31);
        EditClockState::new(ClockField::Day)
            .init_state(&mut bench.ctx())
            .unwrap();
        assert_eq!(bench.data.day, 30);
    }

    #[test]
    fn test_day_commit_writes_rtc() {
        let mut bench = Bench::default();
        bench.data.set_date(2024, 2, 29);
        bench.data.hour = 6;
        bench.data.second = 41;
        let mut s = EditClockState::new(ClockField::Day);
        s.init_state(&mut bench.ctx()).unwrap();

        assert_eq!(click(&mut s, &mut bench), StateId::Normal);
        assert!(bench.data.is_init);
        assert_eq!(bench.data.weekday(), 4);
        let written = bench.rtc.written.unwrap();
        assert_eq!((written.year, written.month, written.day), (2024, 2, 29));
        assert_eq!((written.hour, written.second, written.weekday), (6, 0, 4));
    }

    #[test]
    fn test_rtc_write_failure_still_commits() {
        let mut bench = Bench::default();
        bench.rtc.fail = true;
        let mut s = EditClockState::new(ClockField::Day);
        s.init_state(&mut bench.ctx()).unwrap();
        assert_eq!(click(&mut s, &mut bench), StateId::Normal);
        assert!(bench.data.is_init);
    }

    #[test]
    fn test_timeout_only_after_first_setup() {
        let s = EditClockState::new(ClockField::Year);
        let mut data = ClockData::new();
        let config = ClockConfig::default();
        assert_eq!(s.timeout(&data, &config), None);
        data.is_init = true;
        assert_eq!(
            s.timeout(&data, &config),
            Some(Timeout {
                after_ms: 15_000,
                target: StateId::Normal
            })
        );
    }

    #[test]
    fn test_year_range() {
        let mut bench = Bench::default();
        bench.data.set_date(2095, 3, 1);
        let mut s = EditClockState::new(ClockField::Year);
        s.init_state(&mut bench.ctx()).unwrap();
        rotate(&mut s, &mut bench, EventKind::RotateUp, 4);
        assert_eq!(bench.data.year, 2096);
    }
}
