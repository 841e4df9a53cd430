//! What a state may touch while it runs

use crate::clock::data::ClockData;
use crate::config::ClockConfig;
use crate::traits::{Annunciator, Rtc};
use crate::view::ClockView;

/// Timer and timeout changes a state asked for
///
/// Collected during a call and applied by the dispatcher after the redraw,
/// so the redraw latency can be taken out of the next period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Requests {
    pub reset_timeout: bool,
    pub tick_ms: Option<u32>,
    pub refresh: bool,
}

/// Borrowed view of the dispatcher for one state call
pub struct StateContext<'a> {
    pub data: &'a mut ClockData,
    pub view: &'a mut ClockView,
    pub rtc: &'a mut dyn Rtc,
    pub annunciator: &'a mut dyn Annunciator,
    pub config: &'a ClockConfig,
    pub now_ms: u64,
    requests: Requests,
}

impl<'a> StateContext<'a> {
    pub fn new(
        data: &'a mut ClockData,
        view: &'a mut ClockView,
        rtc: &'a mut dyn Rtc,
        annunciator: &'a mut dyn Annunciator,
        config: &'a ClockConfig,
        now_ms: u64,
    ) -> Self {
        Self {
            data,
            view,
            rtc,
            annunciator,
            config,
            now_ms,
            requests: Requests::default(),
        }
    }

    /// Restart the current state's idle timeout
    pub fn reset_timeout(&mut self) {
        self.requests.reset_timeout = true;
    }

    /// Call `on_tick` in `period_ms`, replacing any pending tick
    ///
    /// The period counts from the start of the current call; the time the
    /// following redraw takes is subtracted.
    pub fn schedule_tick(&mut self, period_ms: u32) {
        self.requests.tick_ms = Some(period_ms);
    }

    /// Short confirmation pulse
    pub fn buzz(&mut self) {
        self.annunciator.buzz(self.config.buzz_ms);
    }

    pub(crate) fn requests(&self) -> Requests {
        self.requests
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Collaborators for state unit tests

    use std::vec::Vec;

    use crate::traits::{Annunciator, DateTime, Rtc, RtcError};

    #[derive(Default)]
    pub struct MemRtc {
        pub now: DateTime,
        pub nvram: [u8; 16],
        pub written: Option<DateTime>,
        pub fail: bool,
    }

    impl Rtc for MemRtc {
        fn read_datetime(&mut self) -> Result<DateTime, RtcError> {
            if self.fail {
                return Err(RtcError::Bus);
            }
            Ok(self.now)
        }

        fn write_datetime(&mut self, dt: &DateTime) -> Result<(), RtcError> {
            if self.fail {
                return Err(RtcError::Bus);
            }
            self.written = Some(*dt);
            Ok(())
        }

        fn read_nvram(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), RtcError> {
            let start = usize::from(offset);
            let src = self.nvram.get(start..start + buf.len()).ok_or(RtcError::OutOfRange)?;
            buf.copy_from_slice(src);
            Ok(())
        }

        fn write_nvram(&mut self, offset: u16, data: &[u8]) -> Result<(), RtcError> {
            let start = usize::from(offset);
            let dst = self.nvram.get_mut(start..start + data.len()).ok_or(RtcError::OutOfRange)?;
            dst.copy_from_slice(data);
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct Beeper {
        pub buzzes: usize,
        pub alarm: Vec<bool>,
    }

    impl Annunciator for Beeper {
        fn buzz(&mut self, _duration_ms: u32) {
            self.buzzes += 1;
        }

        fn set_alarm(&mut self, active: bool) {
            self.alarm.push(active);
        }
    }

    /// Everything a [`StateContext`](super::StateContext) borrows
    #[derive(Default)]
    pub struct Bench {
        pub data: crate::clock::ClockData,
        pub view: crate::view::ClockView,
        pub rtc: MemRtc,
        pub beeper: Beeper,
        pub config: crate::config::ClockConfig,
    }

    impl Bench {
        pub fn ctx(&mut self) -> super::StateContext<'_> {
            super::StateContext::new(
                &mut self.data,
                &mut self.view,
                &mut self.rtc,
                &mut self.beeper,
                &self.config,
                0,
            )
        }
    }
}
