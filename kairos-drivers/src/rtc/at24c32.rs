//! AT24C32 4 KiB I2C EEPROM

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use kairos_core::traits::RtcError;

/// Address with A0-A2 pulled high, as on DS3231 breakouts
pub const ADDRESS: u8 = 0x57;
pub const CAPACITY: usize = 4096;
pub const PAGE_SIZE: usize = 32;
/// Internal write cycle
const WRITE_CYCLE_MS: u32 = 10;

/// AT24C32 on an I2C bus
///
/// Writes are split at page boundaries and wait out the write cycle after
/// each page.
pub struct At24c32<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> At24c32<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    pub fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), RtcError> {
        check_range(offset, buf.len())?;
        self.i2c
            .write_read(ADDRESS, &offset.to_be_bytes(), buf)
            .map_err(|_| RtcError::Bus)
    }

    pub fn write(&mut self, offset: u16, data: &[u8]) -> Result<(), RtcError> {
        check_range(offset, data.len())?;

        let mut addr = usize::from(offset);
        let mut rest = data;
        while !rest.is_empty() {
            let room = PAGE_SIZE - addr % PAGE_SIZE;
            let (chunk, tail) = rest.split_at(room.min(rest.len()));

            let mut buf = [0u8; 2 + PAGE_SIZE];
            buf[..2].copy_from_slice(&(addr as u16).to_be_bytes());
            buf[2..2 + chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(ADDRESS, &buf[..2 + chunk.len()])
                .map_err(|_| RtcError::Bus)?;
            self.delay.delay_ms(WRITE_CYCLE_MS);

            addr += chunk.len();
            rest = tail;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn bus(&self) -> &I2C {
        &self.i2c
    }
}

fn check_range(offset: u16, len: usize) -> Result<(), RtcError> {
    if usize::from(offset) + len > CAPACITY {
        return Err(RtcError::OutOfRange);
    }
    Ok(())
}
