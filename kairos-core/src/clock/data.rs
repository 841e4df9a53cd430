//! Clock data model and calendar math

use core::fmt::Write;

use heapless::String;

use crate::error::Fault;
use crate::traits::DateTime;

/// Longest timer duration plus one, in seconds
pub const MAX_TIMER_SECS: u16 = 3600;

const WEEKDAY_NAMES: [&str; 7] = ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];
const MONTH_OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

/// Gregorian leap year
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12), 0 for an invalid month
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Day of week, 0 = Sunday (Sakamoto)
pub fn weekday_of(year: u16, month: u8, day: u8) -> u8 {
    let month = month.clamp(1, 12);
    let y = if month < 3 { year.saturating_sub(1) } else { year };
    let sum = y + y / 4 - y / 100 + y / 400 + MONTH_OFFSETS[usize::from(month - 1)] + u16::from(day);
    (sum % 7) as u8
}

/// Two-letter German weekday
pub fn weekday_name(weekday: u8) -> &'static str {
    WEEKDAY_NAMES[usize::from(weekday % 7)]
}

/// Three-letter German month, empty for an invalid month
pub fn month_name(month: u8) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[usize::from(month - 1)],
        _ => "",
    }
}

/// Index of one of the three countdown timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerSlot {
    One,
    Two,
    Three,
}

impl TimerSlot {
    pub const ALL: [TimerSlot; 3] = [TimerSlot::One, TimerSlot::Two, TimerSlot::Three];

    /// From the 1-based index kept in [`ClockData::active_timer_selected`]
    pub fn from_index(index: u8) -> Result<Self, Fault> {
        match index {
            1 => Ok(TimerSlot::One),
            2 => Ok(TimerSlot::Two),
            3 => Ok(TimerSlot::Three),
            other => Err(Fault::InvalidTimerSlot(other)),
        }
    }

    /// 1-based index
    pub fn index(self) -> u8 {
        match self {
            TimerSlot::One => 1,
            TimerSlot::Two => 2,
            TimerSlot::Three => 3,
        }
    }

    pub(crate) fn position(self) -> usize {
        usize::from(self.index() - 1)
    }
}

/// Everything the screens show, shared by all states
///
/// `weekday` is private: it only ever changes by recomputation from the
/// date.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockData {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// 0.1°C, `None` when no sensor answered
    pub temperature_x10: Option<i16>,
    /// Sea level pressure in 0.1 hPa, `None` when no sensor answered
    pub pressure_x10: Option<u16>,
    /// Battery charge in percent, `None` while unknown
    pub battery: Option<u8>,
    /// Timer durations in seconds, each below [`MAX_TIMER_SECS`]
    pub timer_durations: [u16; 3],
    /// 0 for none/back, otherwise 1..=3
    pub active_timer_selected: u8,
    /// Seconds left on the running or previewed countdown
    pub active_timer_remaining: u16,
    /// Duration being entered on the timer edit screens, seeded from the
    /// selected timer on the first digit
    pub timer_draft: u16,
    /// Time was read from a set RTC or entered by the user
    pub is_init: bool,
}

impl Default for ClockData {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockData {
    pub const fn new() -> Self {
        Self {
            year: 2020,
            month: 6,
            day: 15,
            weekday: 1,
            hour: 0,
            minute: 0,
            second: 0,
            temperature_x10: None,
            pressure_x10: None,
            battery: None,
            timer_durations: [0; 3],
            active_timer_selected: 0,
            active_timer_remaining: 0,
            timer_draft: 0,
            is_init: false,
        }
    }

    pub fn weekday(&self) -> u8 {
        self.weekday
    }

    pub fn recompute_weekday(&mut self) {
        self.weekday = weekday_of(self.year, self.month, self.day);
    }

    /// Set the date and recompute the weekday
    pub fn set_date(&mut self, year: u16, month: u8, day: u8) {
        self.year = year;
        self.month = month;
        self.day = day;
        self.recompute_weekday();
    }

    pub fn days_in_month(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// Take over an RTC reading
    ///
    /// Returns whether the date is plausible (year at least
    /// `first_valid_year`), which also becomes `is_init`.
    pub fn apply_datetime(&mut self, dt: &DateTime, first_valid_year: u16) -> bool {
        self.set_date(dt.year, dt.month, dt.day);
        self.hour = dt.hour;
        self.minute = dt.minute;
        self.second = dt.second;
        self.is_init = dt.year >= first_valid_year;
        self.is_init
    }

    pub fn to_datetime(&self) -> DateTime {
        DateTime {
            year: self.year,
            month: self.month,
            day: self.day,
            weekday: self.weekday,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        }
    }

    pub fn timer_duration(&self, slot: TimerSlot) -> u16 {
        self.timer_durations[slot.position()]
    }

    pub fn set_timer_duration(&mut self, slot: TimerSlot, secs: u16) {
        self.timer_durations[slot.position()] = secs;
    }

    /// The selected timer, `None` for the back entry
    pub fn active_slot(&self) -> Result<Option<TimerSlot>, Fault> {
        match self.active_timer_selected {
            0 => Ok(None),
            i => TimerSlot::from_index(i).map(Some),
        }
    }

    /// "Do, 29. Feb 2024"
    pub fn date_string(&self) -> String<20> {
        let mut s = String::new();
        let _ = write!(
            s,
            "{}, {:02}. {} {:04}",
            weekday_name(self.weekday),
            self.day,
            month_name(self.month),
            self.year
        );
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(2100));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn test_february_length() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 13), 0);
    }

    #[test]
    fn test_weekday_known_dates() {
        // 2024-02-29 was a Thursday, 2020-06-15 a Monday, 2023-01-01 a Sunday
        assert_eq!(weekday_of(2024, 2, 29), 4);
        assert_eq!(weekday_of(2020, 6, 15), 1);
        assert_eq!(weekday_of(2023, 1, 1), 0);
    }

    #[test]
    fn test_date_string_is_german() {
        let mut cd = ClockData::new();
        cd.set_date(2024, 2, 29);
        assert_eq!(cd.date_string().as_str(), "Do, 29. Feb 2024");
        cd.set_date(2023, 10, 3);
        assert_eq!(cd.date_string().as_str(), "Di, 03. Okt 2023");
    }

    #[test]
    fn test_apply_datetime_validates_year() {
        let mut cd = ClockData::new();
        let dt = DateTime {
            year: 2000,
            month: 1,
            day: 1,
            weekday: 6,
            ..DateTime::default()
        };
        assert!(!cd.apply_datetime(&dt, 2020));
        assert!(!cd.is_init);
        assert_eq!(cd.weekday(), 6);

        let dt = DateTime {
            year: 2024,
            month: 3,
            day: 1,
            hour: 12,
            weekday: 0, // wrong on purpose, recomputed
            ..DateTime::default()
        };
        assert!(cd.apply_datetime(&dt, 2020));
        assert_eq!(cd.weekday(), 5);
        assert_eq!(cd.hour, 12);
    }

    #[test]
    fn test_timer_slots() {
        let mut cd = ClockData::new();
        cd.set_timer_duration(TimerSlot::Two, 90);
        assert_eq!(cd.timer_durations, [0, 90, 0]);
        assert_eq!(TimerSlot::from_index(4), Err(Fault::InvalidTimerSlot(4)));

        cd.active_timer_selected = 2;
        assert_eq!(cd.active_slot(), Ok(Some(TimerSlot::Two)));
        cd.active_timer_selected = 0;
        assert_eq!(cd.active_slot(), Ok(None));
        cd.active_timer_selected = 9;
        assert!(cd.active_slot().is_err());
    }
}
