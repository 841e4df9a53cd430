//! Clock task
//!
//! Owns the dispatcher. Sleeps until an input event arrives, a battery
//! reading comes in or the dispatcher's earliest timer is due.

use defmt::*;
use embassy_futures::select::{select3, Either3};

use kairos_core::Error;

use super::sleep_until;
use crate::board::ClockDispatcher;
use crate::channels::{BATTERY, INPUT_CHANNEL};

#[embassy_executor::task]
pub async fn clock_task(dispatcher: &'static mut ClockDispatcher) {
    info!("Clock task started");

    dispatcher.register_all();
    report(dispatcher.init());
    info!("Started in {}", dispatcher.current());

    loop {
        let wake = select3(
            INPUT_CHANNEL.receive(),
            sleep_until(dispatcher.next_deadline()),
            BATTERY.wait(),
        )
        .await;

        match wake {
            Either3::First(event) => {
                trace!("input {}", event);
                report(dispatcher.process_event(Some(event)));
            }
            Either3::Second(()) => report(dispatcher.poll()),
            Either3::Third(percent) => {
                debug!("battery {}", percent);
                dispatcher.set_battery(percent);
            }
        }
    }
}

/// Log recoverable errors, halt on faults
fn report(result: Result<(), Error>) {
    match result {
        Ok(()) => {}
        Err(Error::Panel(e)) => error!("Panel update failed: {}", e),
        Err(Error::Fault(f)) => defmt::panic!("Fault: {}", f),
    }
}
