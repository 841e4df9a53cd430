//! Push-button gesture classification
//!
//! Driven purely by timestamps: the owner reports press/release edges and
//! polls with the current time. A single pending deadline covers the
//! long-click, click-merge and double-click-merge windows, mirroring how
//! one hardware timer would be shared.
//!
//! Timeline for a double click:
//! ```text
//! press   release          press   release                    deadline
//!   |--<=click--|--<multi---|-------|----------multi_click------>| DoubleClick
//! ```

use crate::config::ButtonTiming;

use super::event::EventKind;

/// Which gesture the pending deadline will emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Pending {
    LongClick,
    Click,
    DoubleClick,
}

/// Button gesture state machine
#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    timing: ButtonTiming,
    pending: Option<(u64, Pending)>,
    down_at: Option<u64>,
    last_click: Option<u64>,
    last_double: Option<u64>,
    long_fired: bool,
}

impl ButtonClassifier {
    pub const fn new(timing: ButtonTiming) -> Self {
        Self {
            timing,
            pending: None,
            down_at: None,
            last_click: None,
            last_double: None,
            long_fired: false,
        }
    }

    /// Button went down
    ///
    /// Cancels any merge window still waiting and starts the long-click
    /// window.
    pub fn on_press(&mut self, now_ms: u64) {
        self.down_at = Some(now_ms);
        self.long_fired = false;
        self.arm(now_ms, self.timing.long_click_ms, Pending::LongClick);
    }

    /// Button came up
    ///
    /// Returns a triple click if this release completes one; every other
    /// gesture is deferred to [`poll`](Self::poll).
    pub fn on_release(&mut self, now_ms: u64) -> Option<EventKind> {
        self.pending = None;
        let down_at = self.down_at.take();

        if self.long_fired {
            self.long_fired = false;
            self.last_click = None;
            self.last_double = None;
            return None;
        }

        if self.within(self.last_double, now_ms) {
            self.last_click = None;
            self.last_double = None;
            return Some(EventKind::TripleClick);
        }

        if self.within(self.last_click, now_ms) {
            self.last_double = Some(now_ms);
            self.arm(now_ms, self.timing.multi_click_ms, Pending::DoubleClick);
        } else if down_at.is_some_and(|d| now_ms.saturating_sub(d) <= u64::from(self.timing.click_ms)) {
            self.last_click = Some(now_ms);
            self.arm(now_ms, self.timing.multi_click_ms, Pending::Click);
        }
        None
    }

    /// Emit the pending gesture once its window has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<EventKind> {
        let (deadline, what) = self.pending?;
        if now_ms < deadline {
            return None;
        }
        self.pending = None;

        match what {
            Pending::LongClick => {
                self.long_fired = true;
                Some(EventKind::LongClick)
            }
            Pending::Click => {
                self.last_click = None;
                Some(EventKind::Click)
            }
            Pending::DoubleClick => {
                self.last_click = None;
                self.last_double = None;
                Some(EventKind::DoubleClick)
            }
        }
    }

    /// When [`poll`](Self::poll) next has something to do
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.map(|(deadline, _)| deadline)
    }

    fn arm(&mut self, now_ms: u64, period_ms: u32, what: Pending) {
        self.pending = Some((now_ms + u64::from(period_ms), what));
    }

    fn within(&self, since: Option<u64>, now_ms: u64) -> bool {
        since.is_some_and(|t| now_ms.saturating_sub(t) < u64::from(self.timing.multi_click_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    /// Drive press/release pairs and collect everything up to `until`
    fn run(presses: &[(u64, u64)], until: u64) -> Vec<(u64, EventKind)> {
        let mut b = ButtonClassifier::new(ButtonTiming::default());
        let mut out = Vec::new();
        let mut edges: Vec<(u64, bool)> = Vec::new();
        for &(down, up) in presses {
            edges.push((down, true));
            edges.push((up, false));
        }
        let mut edges = edges.into_iter().peekable();

        for now in 0..=until {
            if let Some(kind) = b.poll(now) {
                out.push((now, kind));
            }
            while let Some(&(t, pressed)) = edges.peek() {
                if t != now {
                    break;
                }
                edges.next();
                if pressed {
                    b.on_press(now);
                } else if let Some(kind) = b.on_release(now) {
                    out.push((now, kind));
                }
            }
        }
        out
    }

    #[test]
    fn test_single_click_fires_after_merge_window() {
        let events = run(&[(100, 250)], 2000);
        assert_eq!(events, [(700, EventKind::Click)]);
    }

    #[test]
    fn test_slow_release_is_not_a_click() {
        let events = run(&[(100, 500)], 2000);
        assert!(events.is_empty());
    }

    #[test]
    fn test_double_click_replaces_two_clicks() {
        let events = run(&[(100, 200), (400, 500)], 2000);
        assert_eq!(events, [(950, EventKind::DoubleClick)]);
    }

    #[test]
    fn test_triple_click_is_immediate() {
        let events = run(&[(100, 200), (300, 400), (500, 600)], 2000);
        assert_eq!(events, [(600, EventKind::TripleClick)]);
    }

    #[test]
    fn test_long_click_suppresses_click() {
        let events = run(&[(100, 1500)], 3000);
        assert_eq!(events, [(900, EventKind::LongClick)]);
    }

    #[test]
    fn test_long_click_after_click_cancels_merge() {
        let events = run(&[(100, 200), (400, 1400)], 3000);
        assert_eq!(events, [(1200, EventKind::LongClick)]);
    }

    #[test]
    fn test_separate_clicks_after_window() {
        let events = run(&[(100, 200), (1000, 1100)], 3000);
        assert_eq!(events, [(650, EventKind::Click), (1550, EventKind::Click)]);
    }

    #[test]
    fn test_next_deadline_tracks_pending_window() {
        let mut b = ButtonClassifier::new(ButtonTiming::default());
        assert_eq!(b.next_deadline(), None);
        b.on_press(10);
        assert_eq!(b.next_deadline(), Some(810));
        assert_eq!(b.on_release(100), None);
        assert_eq!(b.next_deadline(), Some(550));
    }
}
