//! State machine dispatcher

use crate::clock::data::ClockData;
use crate::clock::env::sea_level_pressure_x10;
use crate::config::ClockConfig;
use crate::error::{Error, Fault};
use crate::input::Event;
use crate::timer::{earliest, OneShot};
use crate::traits::{Annunciator, EnvSensor, Monotonic, Panel, PanelError, Refresh, Rtc};
use crate::view::ClockView;

use super::context::Requests;
use super::{all_states, AnyState, State, StateContext, StateId};

/// Hardware handles the dispatcher owns
pub struct Hardware<P, R, E, A, M> {
    pub panel: P,
    pub rtc: R,
    /// `None` when no sensor answered at boot
    pub sensor: Option<E>,
    pub annunciator: A,
    pub clock: M,
}

struct Redraw {
    latency_ms: u32,
    panel: Result<(), PanelError>,
}

/// Runs the registered states
///
/// Owns the clock data, the view, the hardware and three one-shot timers:
/// the current state's idle timeout, a tick the current state may request,
/// and the minute refresh of the home screen. The owner feeds it input
/// events through [`process_event`](Self::process_event) and calls
/// [`poll`](Self::poll) once [`next_deadline`](Self::next_deadline) passes.
pub struct Dispatcher<P, R, E, A, M> {
    hw: Hardware<P, R, E, A, M>,
    config: ClockConfig,
    data: ClockData,
    view: ClockView,
    states: [Option<AnyState>; StateId::COUNT],
    current: Option<StateId>,
    timeout: OneShot,
    timeout_target: Option<StateId>,
    tick: OneShot,
    tick_owner: Option<StateId>,
    refresh: OneShot,
    last_redraw_ms: u32,
    full_refresh_hour: Option<u8>,
}

impl<P, R, E, A, M> Dispatcher<P, R, E, A, M>
where
    P: Panel,
    R: Rtc,
    E: EnvSensor,
    A: Annunciator,
    M: Monotonic,
{
    pub fn new(hw: Hardware<P, R, E, A, M>, config: ClockConfig) -> Self {
        Self {
            hw,
            config,
            data: ClockData::new(),
            view: ClockView::new(),
            states: core::array::from_fn(|_| None),
            current: None,
            timeout: OneShot::new(),
            timeout_target: None,
            tick: OneShot::new(),
            tick_owner: None,
            refresh: OneShot::new(),
            last_redraw_ms: 0,
            full_refresh_hour: None,
        }
    }

    /// Add or replace the implementation of `state.id()`
    pub fn register(&mut self, state: AnyState) {
        let index = state.id().index();
        self.states[index] = Some(state);
    }

    /// Register the stock implementation of every state
    pub fn register_all(&mut self) {
        for state in all_states() {
            self.register(state);
        }
    }

    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    pub fn data(&self) -> &ClockData {
        &self.data
    }

    pub fn view(&self) -> &ClockView {
        &self.view
    }

    pub fn hardware(&self) -> &Hardware<P, R, E, A, M> {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut Hardware<P, R, E, A, M> {
        &mut self.hw
    }

    /// Duration of the last panel refresh sequence
    pub fn last_redraw_ms(&self) -> u32 {
        self.last_redraw_ms
    }

    /// Battery level for the next redraw, `None` while unknown
    pub fn set_battery(&mut self, percent: Option<u8>) {
        self.data.battery = percent;
    }

    /// Earliest armed timer
    pub fn next_deadline(&self) -> Option<u64> {
        let d = earliest(self.timeout.deadline(), self.tick.deadline());
        earliest(d, self.refresh.deadline())
    }

    /// Start the machine in `Init` and let it pick the first real state
    ///
    /// A panel error while showing the splash is reported only after
    /// startup went through.
    pub fn init(&mut self) -> Result<(), Error> {
        self.update_sensor();
        self.current = None;
        let splash = self.handle_state_change(StateId::Init, Requests::default());
        if let Err(Error::Fault(f)) = splash {
            return Err(f.into());
        }
        self.process_event(None)?;
        splash
    }

    /// Route an input event, `None` for a synthetic one
    pub fn process_event(&mut self, event: Option<Event>) -> Result<(), Error> {
        let Some(id) = self.current else {
            debug!("event before init dropped");
            return Ok(());
        };
        let (next, requests) = self.call(id, |s, ctx| s.process_event(event, ctx))?;
        self.handle_state_change(next?, requests)
    }

    /// Fire every expired timer
    pub fn poll(&mut self) -> Result<(), Error> {
        let now = self.hw.clock.now_ms();

        if self.timeout.fire(now) {
            if let Some(target) = self.timeout_target.take() {
                debug!("timeout -> {}", target);
                self.handle_state_change(target, Requests::default())?;
            }
        }

        if self.tick.fire(now) {
            match (self.tick_owner.take(), self.current) {
                (Some(owner), Some(current)) if owner == current => {
                    let (next, requests) = self.call(current, |s, ctx| s.on_tick(ctx))?;
                    self.handle_state_change(next?, requests)?;
                }
                (owner, _) => debug!("stale tick of {} dropped", owner),
            }
        }

        if self.refresh.fire(now) {
            if self.current == Some(StateId::Normal) {
                self.refresh_idle()?;
            } else {
                debug!("refresh outside home screen dropped");
            }
        }
        Ok(())
    }

    /// Enter `id` even if it is already current
    ///
    /// Pending timers of the old entry are dropped, so exactly one timeout
    /// is armed afterwards, counted from this entry.
    pub fn enter_state(&mut self, id: StateId) -> Result<(), Error> {
        let requests = self.enter(id)?;
        self.finish(requests)
    }

    fn handle_state_change(&mut self, next: StateId, requests: Requests) -> Result<(), Error> {
        if self.states[next.index()].is_none() {
            return Err(Fault::UnknownState(next).into());
        }
        // Requests made by a state that is being left do not carry over
        let requests = if self.current == Some(next) {
            requests
        } else {
            self.enter(next)?
        };
        self.finish(requests)
    }

    fn enter(&mut self, id: StateId) -> Result<Requests, Error> {
        if self.states[id.index()].is_none() {
            return Err(Fault::UnknownState(id).into());
        }
        self.timeout.cancel();
        self.timeout_target = None;
        self.tick.cancel();
        self.tick_owner = None;

        debug!("enter {}", id);
        self.current = Some(id);
        self.view.force_update();

        let (result, mut requests) = self.call(id, |s, ctx| s.init_state(ctx))?;
        result?;
        requests.reset_timeout = true;
        requests.refresh = id == StateId::Normal;
        Ok(requests)
    }

    /// Minute refresh of the home screen
    fn refresh_idle(&mut self) -> Result<(), Error> {
        self.update_sensor();
        let (result, mut requests) = self.call(StateId::Normal, |s, ctx| s.init_state(ctx))?;
        result?;
        requests.refresh = true;
        self.finish(requests)
    }

    /// Redraw if needed, then arm what the state asked for
    ///
    /// Timers are armed even when the panel failed; the panel error is
    /// returned afterwards.
    fn finish(&mut self, requests: Requests) -> Result<(), Error> {
        let Some(id) = self.current else {
            return Ok(());
        };
        let drawn = self.redraw(id)?;
        self.apply(id, requests, drawn.latency_ms)?;
        drawn.panel.map_err(Error::from)
    }

    fn redraw(&mut self, id: StateId) -> Result<Redraw, Fault> {
        let started = self.hw.clock.now_ms();
        let (changed, _) = self.call(id, |s, ctx| s.prepare_view(ctx))?;
        if !changed {
            return Ok(Redraw {
                latency_ms: 0,
                panel: Ok(()),
            });
        }

        let refresh = if self.full_refresh_hour == Some(self.data.hour) {
            Refresh::Partial
        } else {
            Refresh::Full
        };
        let panel = push_frame(&mut self.hw.panel, self.view.frame().as_bytes(), refresh);
        let elapsed = self.hw.clock.now_ms().saturating_sub(started);
        self.last_redraw_ms = u32::try_from(elapsed).unwrap_or(u32::MAX);

        match panel {
            Ok(()) if refresh == Refresh::Full => self.full_refresh_hour = Some(self.data.hour),
            Ok(()) => {}
            Err(e) => {
                warn!("panel refresh failed: {}", e);
                self.full_refresh_hour = None;
                self.view.force_update();
            }
        }
        Ok(Redraw {
            latency_ms: self.last_redraw_ms,
            panel,
        })
    }

    fn apply(&mut self, id: StateId, requests: Requests, latency_ms: u32) -> Result<(), Fault> {
        let now = self.hw.clock.now_ms();

        if requests.reset_timeout {
            let state = self.states[id.index()]
                .as_ref()
                .ok_or(Fault::UnknownState(id))?;
            match state.timeout(&self.data, &self.config) {
                Some(t) => {
                    self.timeout.arm(now, t.after_ms);
                    self.timeout_target = Some(t.target);
                }
                None => {
                    self.timeout.cancel();
                    self.timeout_target = None;
                }
            }
        }

        if let Some(period) = requests.tick_ms {
            let period = period.saturating_sub(latency_ms).max(self.config.min_tick_ms);
            self.tick.arm(now, period);
            self.tick_owner = Some(id);
        }

        if requests.refresh {
            let to_minute = u32::from(60u8.saturating_sub(self.data.second)) * 1000;
            let period = to_minute
                .saturating_sub(latency_ms)
                .max(self.config.min_refresh_ms);
            self.refresh.arm(now, period);
        }
        Ok(())
    }

    fn update_sensor(&mut self) {
        let Some(sensor) = self.hw.sensor.as_mut() else {
            self.data.temperature_x10 = None;
            self.data.pressure_x10 = None;
            return;
        };
        self.data.temperature_x10 = match sensor.read_temperature_x10() {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("temperature read failed: {}", e);
                None
            }
        };
        self.data.pressure_x10 = match sensor.read_pressure_pa() {
            Ok(pa) => Some(sea_level_pressure_x10(pa, self.config.elevation_m)),
            Err(e) => {
                warn!("pressure read failed: {}", e);
                None
            }
        };
    }

    /// Run `f` on state `id` with a context borrowing the dispatcher
    fn call<T>(
        &mut self,
        id: StateId,
        f: impl FnOnce(&mut AnyState, &mut StateContext<'_>) -> T,
    ) -> Result<(T, Requests), Fault> {
        let now_ms = self.hw.clock.now_ms();
        let state = self.states[id.index()]
            .as_mut()
            .ok_or(Fault::UnknownState(id))?;
        let mut ctx = StateContext::new(
            &mut self.data,
            &mut self.view,
            &mut self.hw.rtc,
            &mut self.hw.annunciator,
            &self.config,
            now_ms,
        );
        let out = f(state, &mut ctx);
        Ok((out, ctx.requests()))
    }
}

/// Wait, wake, push, sleep; stops at the first failure
fn push_frame<P: Panel>(panel: &mut P, frame: &[u8], refresh: Refresh) -> Result<(), PanelError> {
    panel.wait_until_ready()?;
    panel.init()?;
    panel.show(frame, refresh)?;
    panel.sleep()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct Log {
        calls: Vec<&'static str>,
        fail_init: bool,
    }

    impl Panel for Log {
        fn is_ready(&mut self) -> bool {
            true
        }

        fn wait_until_ready(&mut self) -> Result<(), PanelError> {
            self.calls.push("wait");
            Ok(())
        }

        fn init(&mut self) -> Result<(), PanelError> {
            self.calls.push("init");
            if self.fail_init {
                return Err(PanelError::Bus);
            }
            Ok(())
        }

        fn show(&mut self, _frame: &[u8], _refresh: Refresh) -> Result<(), PanelError> {
            self.calls.push("show");
            Ok(())
        }

        fn sleep(&mut self) -> Result<(), PanelError> {
            self.calls.push("sleep");
            Ok(())
        }
    }

    #[test]
    fn test_push_frame_sequence() {
        let mut panel = Log::default();
        push_frame(&mut panel, &[0xFF; 4], Refresh::Full).unwrap();
        assert_eq!(panel.calls, ["wait", "init", "show", "sleep"]);
    }

    #[test]
    fn test_push_frame_stops_after_failed_init() {
        let mut panel = Log {
            fail_init: true,
            ..Log::default()
        };
        assert_eq!(push_frame(&mut panel, &[0xFF; 4], Refresh::Partial), Err(PanelError::Bus));
        assert_eq!(panel.calls, ["wait", "init"]);
    }
}
