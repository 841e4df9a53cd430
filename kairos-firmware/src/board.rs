//! Pin assignment and concrete device types
//!
//! ```text
//! GPIO2/3    I2C1 SDA/SCL: DS3231 0x68, AT24C32 0x57, BMP280 0x76
//! GPIO8      e-paper DC
//! GPIO9      e-paper CS
//! GPIO10/11  SPI1 SCK/MOSI
//! GPIO12     e-paper RST
//! GPIO13     e-paper BUSY
//! GPIO14     buzzer
//! GPIO16/17  encoder CLK/DT (pull-up)
//! GPIO18     encoder switch (active low, pull-up)
//! GPIO19     vibration motor
//! GPIO26     battery sense, ADC0 behind a 1:2 divider
//! ```

use core::cell::RefCell;

use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C1, SPI1};
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_rp::{bind_interrupts, Peripherals};
use embassy_time::Delay;
use embedded_hal_bus::i2c::RefCellDevice;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use static_cell::StaticCell;

use kairos_core::state::Dispatcher;
use kairos_drivers::display::Epd1in54;
use kairos_drivers::rtc::RtcModule;
use kairos_drivers::sensor::Bmp280;

use crate::hw::{Outputs, Uptime};

bind_interrupts!(pub struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
});

/// 100 kHz keeps the breakout pull-ups happy
const I2C_FREQUENCY: u32 = 100_000;
/// SSD1681 allows 20 MHz for writes
const SPI_FREQUENCY: u32 = 4_000_000;

pub type I2cBus = I2c<'static, I2C1, i2c::Blocking>;
pub type SharedI2c = RefCellDevice<'static, I2cBus>;
pub type BoardPanel = Epd1in54<
    ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, NoDelay>,
    Output<'static>,
    Output<'static>,
    Input<'static>,
    Delay,
>;
pub type BoardRtc = RtcModule<SharedI2c, SharedI2c, Delay>;
pub type BoardSensor = Bmp280<SharedI2c, Delay>;
pub type ClockDispatcher = Dispatcher<BoardPanel, BoardRtc, BoardSensor, Outputs, Uptime>;

static I2C_BUS: StaticCell<RefCell<I2cBus>> = StaticCell::new();

/// Encoder pins, handed to the input task
pub struct Encoder {
    pub clk: Input<'static>,
    pub dt: Input<'static>,
    pub switch: Input<'static>,
}

/// Battery sense, handed to the battery task
pub struct BatterySense {
    pub adc: Adc<'static, adc::Async>,
    pub channel: adc::Channel<'static>,
}

/// Everything the tasks need, split out of the peripherals
pub struct Board {
    pub panel: BoardPanel,
    pub i2c: &'static RefCell<I2cBus>,
    pub encoder: Encoder,
    pub buzzer: Output<'static>,
    pub motor: Output<'static>,
    pub battery: BatterySense,
}

impl Board {
    pub fn new(p: Peripherals) -> Self {
        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = I2C_FREQUENCY;
        let i2c = I2c::new_blocking(p.I2C1, p.PIN_3, p.PIN_2, i2c_config);

        let mut spi_config = spi::Config::default();
        spi_config.frequency = SPI_FREQUENCY;
        let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
        let cs = Output::new(p.PIN_9, Level::High);
        // CS is a plain GPIO, setting it cannot fail
        let spi = ExclusiveDevice::new_no_delay(spi, cs).unwrap();

        let panel = Epd1in54::new(
            spi,
            Output::new(p.PIN_8, Level::Low),
            Output::new(p.PIN_12, Level::High),
            Input::new(p.PIN_13, Pull::None),
            Delay,
            Default::default(),
        );

        Self {
            panel,
            i2c: I2C_BUS.init(RefCell::new(i2c)),
            encoder: Encoder {
                clk: Input::new(p.PIN_16, Pull::Up),
                dt: Input::new(p.PIN_17, Pull::Up),
                switch: Input::new(p.PIN_18, Pull::Up),
            },
            buzzer: Output::new(p.PIN_14, Level::Low),
            motor: Output::new(p.PIN_19, Level::Low),
            battery: BatterySense {
                adc: Adc::new(p.ADC, Irqs, adc::Config::default()),
                channel: adc::Channel::new_pin(p.PIN_26, Pull::None),
            },
        }
    }
}
