//! Buzzer and vibration motor task
//!
//! A buzz pulses the motor once. While the alarm is on, buzzer and motor
//! toggle together until it is switched off.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Level, Output};
use embassy_time::Timer;

use crate::channels::{OutputCommand, OUTPUT_CMD};

/// Half period of the alarm pattern
const ALARM_PHASE_MS: u64 = 500;

#[embassy_executor::task]
pub async fn output_task(mut buzzer: Output<'static>, mut motor: Output<'static>) {
    info!("Output task started");

    let mut alarm = false;
    let mut phase = false;

    loop {
        let cmd = if alarm {
            match select(OUTPUT_CMD.receive(), Timer::after_millis(ALARM_PHASE_MS)).await {
                Either::First(cmd) => Some(cmd),
                Either::Second(()) => None,
            }
        } else {
            Some(OUTPUT_CMD.receive().await)
        };

        match cmd {
            Some(OutputCommand::Buzz(ms)) => {
                motor.set_high();
                Timer::after_millis(u64::from(ms)).await;
                motor.set_level(Level::from(alarm && phase));
            }
            Some(OutputCommand::Alarm(on)) => {
                info!("Alarm {}", if on { "on" } else { "off" });
                alarm = on;
                phase = on;
                buzzer.set_level(Level::from(phase));
                motor.set_level(Level::from(phase));
            }
            None => {
                phase = !phase;
                buzzer.set_level(Level::from(phase));
                motor.set_level(Level::from(phase));
            }
        }
    }
}
