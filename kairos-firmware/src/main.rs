//! Kairos - E-Paper Desk Clock Firmware
//!
//! Main firmware binary for RP2040-based clock boards: a 1.54" e-paper
//! panel, a rotary encoder with push button, a DS3231 RTC module and an
//! optional BMP280.
//!
//! The clock task owns the dispatcher and everything on the I2C and SPI
//! buses. Input decoding, feedback outputs and battery sampling run in
//! their own tasks and talk to it through the statics in [`channels`].

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use embedded_hal_bus::i2c::RefCellDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kairos_core::config::{ButtonTiming, ClockConfig, RotaryConfig};
use kairos_core::state::{Dispatcher, Hardware};
use kairos_drivers::rtc::RtcModule;
use kairos_drivers::sensor::Bmp280;

use crate::board::{Board, ClockDispatcher};
use crate::hw::{Outputs, Uptime};

mod board;
mod channels;
mod hw;
mod tasks;

static DISPATCHER: StaticCell<ClockDispatcher> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Kairos firmware starting...");

    let p = embassy_rp::init(Default::default());
    let board = Board::new(p);
    info!("Peripherals initialized");

    let mut rtc = RtcModule::new(
        RefCellDevice::new(board.i2c),
        RefCellDevice::new(board.i2c),
        Delay,
    );
    match rtc.clock.lost_power() {
        Ok(true) => warn!("RTC oscillator stopped, time must be set"),
        Ok(false) => {}
        Err(e) => warn!("RTC not answering: {}", e),
    }

    let sensor = match Bmp280::new(RefCellDevice::new(board.i2c), Delay) {
        Ok(sensor) => {
            info!("BMP280 found");
            Some(sensor)
        }
        Err(e) => {
            warn!("No environment sensor ({}), readings disabled", e);
            None
        }
    };

    let hw = Hardware {
        panel: board.panel,
        rtc,
        sensor,
        annunciator: Outputs,
        clock: Uptime,
    };
    let dispatcher = DISPATCHER.init(Dispatcher::new(hw, ClockConfig::default()));

    spawner
        .spawn(tasks::input_task(
            board.encoder,
            RotaryConfig::default(),
            ButtonTiming::default(),
        ))
        .unwrap();
    spawner
        .spawn(tasks::output_task(board.buzzer, board.motor))
        .unwrap();
    spawner.spawn(tasks::battery_task(board.battery)).unwrap();
    spawner.spawn(tasks::clock_task(dispatcher)).unwrap();

    info!("All tasks spawned, firmware running");
}
