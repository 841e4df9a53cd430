//! Real-time clock module
//!
//! The common DS3231 breakout carries an AT24C32 EEPROM on the same bus;
//! [`RtcModule`] pairs the two so the EEPROM serves as the clock's NVRAM.

pub mod at24c32;
pub mod ds3231;

pub use at24c32::At24c32;
pub use ds3231::Ds3231;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use kairos_core::traits::{DateTime, Rtc, RtcError};

/// DS3231 clock plus AT24C32 storage
pub struct RtcModule<C, E, D> {
    pub clock: Ds3231<C>,
    pub eeprom: At24c32<E, D>,
}

impl<C: I2c, E: I2c, D: DelayNs> RtcModule<C, E, D> {
    /// Create from two handles on the shared bus
    pub fn new(clock_bus: C, eeprom_bus: E, delay: D) -> Self {
        Self {
            clock: Ds3231::new(clock_bus),
            eeprom: At24c32::new(eeprom_bus, delay),
        }
    }
}

impl<C: I2c, E: I2c, D: DelayNs> Rtc for RtcModule<C, E, D> {
    fn read_datetime(&mut self) -> Result<DateTime, RtcError> {
        self.clock.read_datetime()
    }

    fn write_datetime(&mut self, dt: &DateTime) -> Result<(), RtcError> {
        self.clock.write_datetime(dt)
    }

    fn read_nvram(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), RtcError> {
        self.eeprom.read(offset, buf)
    }

    fn write_nvram(&mut self, offset: u16, data: &[u8]) -> Result<(), RtcError> {
        self.eeprom.write(offset, data)
    }
}
