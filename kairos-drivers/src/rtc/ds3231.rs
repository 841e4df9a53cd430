//! DS3231 temperature-compensated RTC
//!
//! Time registers 0x00-0x06 hold BCD seconds, minutes, hours, day of week
//! (1-7), date, month with the century flag in bit 7, and the two-digit
//! year. The clock always runs in 24 hour mode here.

use embedded_hal::i2c::I2c;
use kairos_core::traits::{DateTime, RtcError};

/// Fixed 7-bit bus address
pub const ADDRESS: u8 = 0x68;

/// DS3231 register addresses
pub mod reg {
    pub const SECONDS: u8 = 0x00;
    pub const CONTROL: u8 = 0x0E;
    /// Oscillator-stop flag in bit 7
    pub const STATUS: u8 = 0x0F;
}

const HOUR_12H: u8 = 0x40;
const CENTURY: u8 = 0x80;
const OSF: u8 = 0x80;

pub fn bcd_to_bin(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

pub fn bin_to_bcd(bin: u8) -> u8 {
    ((bin / 10) << 4) | (bin % 10)
}

/// Decode the seven time registers
pub fn decode(regs: &[u8; 7]) -> Result<DateTime, RtcError> {
    let hour = if regs[2] & HOUR_12H != 0 {
        let h = bcd_to_bin(regs[2] & 0x1F) % 12;
        if regs[2] & 0x20 != 0 {
            h + 12
        } else {
            h
        }
    } else {
        bcd_to_bin(regs[2] & 0x3F)
    };
    let century = if regs[5] & CENTURY != 0 { 100 } else { 0 };

    let dt = DateTime {
        second: bcd_to_bin(regs[0] & 0x7F),
        minute: bcd_to_bin(regs[1] & 0x7F),
        hour,
        weekday: (regs[3] & 0x07).saturating_sub(1),
        day: bcd_to_bin(regs[4] & 0x3F),
        month: bcd_to_bin(regs[5] & 0x1F),
        year: 2000 + century + u16::from(bcd_to_bin(regs[6])),
    };

    let valid = dt.second < 60
        && dt.minute < 60
        && dt.hour < 24
        && (1..=12).contains(&dt.month)
        && (1..=31).contains(&dt.day);
    if valid {
        Ok(dt)
    } else {
        Err(RtcError::InvalidData)
    }
}

/// Encode into the seven time registers
pub fn encode(dt: &DateTime) -> Result<[u8; 7], RtcError> {
    let offset = dt.year.checked_sub(2000).ok_or(RtcError::OutOfRange)?;
    if offset >= 200 {
        return Err(RtcError::OutOfRange);
    }
    let century = if offset >= 100 { CENTURY } else { 0 };
    Ok([
        bin_to_bcd(dt.second),
        bin_to_bcd(dt.minute),
        bin_to_bcd(dt.hour),
        dt.weekday % 7 + 1,
        bin_to_bcd(dt.day),
        bin_to_bcd(dt.month) | century,
        bin_to_bcd((offset % 100) as u8),
    ])
}

/// DS3231 on an I2C bus
pub struct Ds3231<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn read_datetime(&mut self) -> Result<DateTime, RtcError> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(ADDRESS, &[reg::SECONDS], &mut regs)
            .map_err(|_| RtcError::Bus)?;
        decode(&regs)
    }

    /// Set the time and clear the oscillator-stop flag
    pub fn write_datetime(&mut self, dt: &DateTime) -> Result<(), RtcError> {
        let regs = encode(dt)?;
        let mut buf = [0u8; 8];
        buf[0] = reg::SECONDS;
        buf[1..].copy_from_slice(&regs);
        self.i2c.write(ADDRESS, &buf).map_err(|_| RtcError::Bus)?;

        let status = self.read_reg(reg::STATUS)?;
        self.write_reg(reg::STATUS, status & !OSF)
    }

    /// The oscillator stopped since the time was last set
    pub fn lost_power(&mut self) -> Result<bool, RtcError> {
        Ok(self.read_reg(reg::STATUS)? & OSF != 0)
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, RtcError> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[reg], &mut value)
            .map_err(|_| RtcError::Bus)?;
        Ok(value[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), RtcError> {
        self.i2c.write(ADDRESS, &[reg, value]).map_err(|_| RtcError::Bus)
    }

    #[cfg(test)]
    pub(crate) fn bus(&self) -> &I2C {
        &self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RegisterBus;

    fn sample() -> DateTime {
        DateTime {
            year: 2024,
            month: 2,
            day: 29,
            weekday: 4,
            hour: 23,
            minute: 59,
            second: 58,
        }
    }

    #[test]
    fn test_bcd() {
        assert_eq!(bcd_to_bin(0x59), 59);
        assert_eq!(bin_to_bcd(47), 0x47);
    }

    #[test]
    fn test_encode_layout() {
        let regs = encode(&sample()).unwrap();
        assert_eq!(regs, [0x58, 0x59, 0x23, 5, 0x29, 0x02, 0x24]);
        assert_eq!(encode(&DateTime { year: 1999, ..sample() }), Err(RtcError::OutOfRange));
    }

    #[test]
    fn test_decode_12h_and_century() {
        // 11 PM in 12 hour mode, year 2124
        let regs = [0x00, 0x30, HOUR_12H | 0x20 | 0x11, 1, 0x01, CENTURY | 0x03, 0x24];
        let dt = decode(&regs).unwrap();
        assert_eq!((dt.year, dt.month, dt.hour, dt.weekday), (2124, 3, 23, 0));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let regs = [0x00, 0x00, 0x00, 1, 0x00, 0x01, 0x24];
        assert_eq!(decode(&regs), Err(RtcError::InvalidData));
    }

    #[test]
    fn test_write_then_read() {
        let mut bus = RegisterBus::new(ADDRESS, 1, 0x13);
        bus.mem[reg::STATUS as usize] = 0x88;
        let mut rtc = Ds3231::new(bus);
        assert!(rtc.lost_power().unwrap());

        rtc.write_datetime(&sample()).unwrap();
        assert_eq!(rtc.read_datetime().unwrap(), sample());
        assert!(!rtc.lost_power().unwrap());
        assert_eq!(rtc.bus().mem[reg::STATUS as usize], 0x08);
    }

    #[test]
    fn test_bus_error_maps() {
        let mut bus = RegisterBus::new(ADDRESS, 1, 0x13);
        bus.fail = true;
        let mut rtc = Ds3231::new(bus);
        assert_eq!(rtc.read_datetime(), Err(RtcError::Bus));
    }
}
