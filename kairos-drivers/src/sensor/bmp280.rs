//! Bosch BMP280 barometric pressure and temperature sensor
//!
//! Runs in forced mode: every measurement triggers one conversion at x1
//! oversampling and the chip returns to sleep afterwards. Compensation
//! uses the integer formulas from the datasheet, 32-bit for temperature
//! and 64-bit for pressure.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use kairos_core::traits::{EnvSensor, SensorError};

/// Address with SDO pulled low
pub const ADDRESS: u8 = 0x76;
pub const CHIP_ID: u8 = 0x58;

/// BMP280 register addresses
pub mod reg {
    /// First of 24 calibration bytes
    pub const CALIB: u8 = 0x88;
    pub const ID: u8 = 0xD0;
    pub const STATUS: u8 = 0xF3;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    /// press_msb..temp_xlsb
    pub const DATA: u8 = 0xF7;
}

/// osrs_t x1, osrs_p x1, forced mode
const CTRL_FORCED: u8 = 0x25;
const STATUS_MEASURING: u8 = 0x08;
const POLL_MS: u32 = 2;
const MAX_POLLS: u8 = 10;

/// Factory trimming parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
}

impl Calibration {
    pub fn from_bytes(b: &[u8; 24]) -> Self {
        let u = |i: usize| u16::from_le_bytes([b[i], b[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([b[i], b[i + 1]]);
        Self {
            t1: u(0),
            t2: s(2),
            t3: s(4),
            p1: u(6),
            p2: s(8),
            p3: s(10),
            p4: s(12),
            p5: s(14),
            p6: s(16),
            p7: s(18),
            p8: s(20),
            p9: s(22),
        }
    }

    /// Fine temperature used by the pressure formula
    pub fn t_fine(&self, adc_t: i32) -> i32 {
        let t1 = i32::from(self.t1);
        let var1 = (((adc_t >> 3) - (t1 << 1)) * i32::from(self.t2)) >> 11;
        let d = (adc_t >> 4) - t1;
        let var2 = (((d * d) >> 12) * i32::from(self.t3)) >> 14;
        var1 + var2
    }

    /// Temperature in 0.01°C
    pub fn temperature_x100(t_fine: i32) -> i32 {
        (t_fine * 5 + 128) >> 8
    }

    /// Pressure in pascal, 0 when the calibration is degenerate
    pub fn pressure_pa(&self, adc_p: i32, t_fine: i32) -> u32 {
        let mut var1 = i64::from(t_fine) - 128_000;
        let mut var2 = var1 * var1 * i64::from(self.p6);
        var2 += (var1 * i64::from(self.p5)) << 17;
        var2 += i64::from(self.p4) << 35;
        var1 = ((var1 * var1 * i64::from(self.p3)) >> 8) + ((var1 * i64::from(self.p2)) << 12);
        var1 = (((1i64 << 47) + var1) * i64::from(self.p1)) >> 33;
        if var1 == 0 {
            return 0;
        }

        let mut p = 1_048_576 - i64::from(adc_p);
        p = (((p << 31) - var2) * 3125) / var1;
        let var1 = (i64::from(self.p9) * (p >> 13) * (p >> 13)) >> 25;
        let var2 = (i64::from(self.p8) * p) >> 19;
        p = ((p + var1 + var2) >> 8) + (i64::from(self.p7) << 4);

        // Q24.8
        (p >> 8).clamp(0, i64::from(u32::MAX)) as u32
    }
}

/// One compensated conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub temperature_x100: i32,
    pub pressure_pa: u32,
}

/// BMP280 on an I2C bus
pub struct Bmp280<I2C, D> {
    i2c: I2C,
    delay: D,
    calib: Calibration,
    /// Conversion not yet handed out as pressure
    pending: Option<Measurement>,
}

impl<I2C: I2c, D: DelayNs> Bmp280<I2C, D> {
    /// Probe the chip and read its calibration
    pub fn new(mut i2c: I2C, delay: D) -> Result<Self, SensorError> {
        let mut id = [0u8; 1];
        i2c.write_read(ADDRESS, &[reg::ID], &mut id)
            .map_err(|_| SensorError::Bus)?;
        if id[0] != CHIP_ID {
            return Err(SensorError::NotFound);
        }

        let mut raw = [0u8; 24];
        i2c.write_read(ADDRESS, &[reg::CALIB], &mut raw)
            .map_err(|_| SensorError::Bus)?;
        // Filter off, standby irrelevant in forced mode
        i2c.write(ADDRESS, &[reg::CONFIG, 0x00])
            .map_err(|_| SensorError::Bus)?;

        Ok(Self {
            i2c,
            delay,
            calib: Calibration::from_bytes(&raw),
            pending: None,
        })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calib
    }

    /// Trigger a forced conversion and compensate it
    pub fn measure(&mut self) -> Result<Measurement, SensorError> {
        self.i2c
            .write(ADDRESS, &[reg::CTRL_MEAS, CTRL_FORCED])
            .map_err(|_| SensorError::Bus)?;

        for _ in 0..MAX_POLLS {
            self.delay.delay_ms(POLL_MS);
            let mut status = [0u8; 1];
            self.i2c
                .write_read(ADDRESS, &[reg::STATUS], &mut status)
                .map_err(|_| SensorError::Bus)?;
            if status[0] & STATUS_MEASURING == 0 {
                break;
            }
        }

        let mut data = [0u8; 6];
        self.i2c
            .write_read(ADDRESS, &[reg::DATA], &mut data)
            .map_err(|_| SensorError::Bus)?;
        let adc_p = raw20(data[0], data[1], data[2]);
        let adc_t = raw20(data[3], data[4], data[5]);

        let t_fine = self.calib.t_fine(adc_t);
        Ok(Measurement {
            temperature_x100: Calibration::temperature_x100(t_fine),
            pressure_pa: self.calib.pressure_pa(adc_p, t_fine),
        })
    }
}

fn raw20(msb: u8, lsb: u8, xlsb: u8) -> i32 {
    (i32::from(msb) << 12) | (i32::from(lsb) << 4) | (i32::from(xlsb) >> 4)
}

impl<I2C: I2c, D: DelayNs> EnvSensor for Bmp280<I2C, D> {
    fn read_temperature_x10(&mut self) -> Result<i16, SensorError> {
        let m = self.measure()?;
        self.pending = Some(m);
        let t = m.temperature_x100;
        let rounded = if t >= 0 { (t + 5) / 10 } else { (t - 5) / 10 };
        Ok(rounded.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16)
    }

    /// Reuses the conversion of the preceding temperature read
    fn read_pressure_pa(&mut self) -> Result<u32, SensorError> {
        match self.pending.take() {
            Some(m) => Ok(m.pressure_pa),
            None => Ok(self.measure()?.pressure_pa),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{NoDelay, RegisterBus};

    const SAMPLE: Calibration = Calibration {
        t1: 27504,
        t2: 26435,
        t3: -1000,
        p1: 36477,
        p2: -10685,
        p3: 3024,
        p4: 2855,
        p5: 140,
        p6: -7,
        p7: 15500,
        p8: -14600,
        p9: 6000,
    };

    fn calib_bytes(c: &Calibration) -> [u8; 24] {
        let words: [[u8; 2]; 12] = [
            c.t1.to_le_bytes(),
            c.t2.to_le_bytes(),
            c.t3.to_le_bytes(),
            c.p1.to_le_bytes(),
            c.p2.to_le_bytes(),
            c.p3.to_le_bytes(),
            c.p4.to_le_bytes(),
            c.p5.to_le_bytes(),
            c.p6.to_le_bytes(),
            c.p7.to_le_bytes(),
            c.p8.to_le_bytes(),
            c.p9.to_le_bytes(),
        ];
        let mut out = [0u8; 24];
        for (i, w) in words.iter().enumerate() {
            out[i * 2..i * 2 + 2].copy_from_slice(w);
        }
        out
    }

    fn chip() -> RegisterBus {
        let mut bus = RegisterBus::new(ADDRESS, 1, 0x100);
        bus.mem[reg::ID as usize] = CHIP_ID;
        bus.mem[0x88..0x88 + 24].copy_from_slice(&calib_bytes(&SAMPLE));
        // adc_P = 415148, adc_T = 519888
        bus.mem[0xF7..0xF7 + 6].copy_from_slice(&[0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00]);
        bus
    }

    #[test]
    fn test_datasheet_example() {
        let t_fine = SAMPLE.t_fine(519888);
        assert_eq!(t_fine, 128422);
        assert_eq!(Calibration::temperature_x100(t_fine), 2508);
        let p = SAMPLE.pressure_pa(415148, t_fine);
        assert!((100_650..=100_656).contains(&p), "pressure {}", p);
    }

    #[test]
    fn test_calibration_parse() {
        assert_eq!(Calibration::from_bytes(&calib_bytes(&SAMPLE)), SAMPLE);
    }

    #[test]
    fn test_probe_rejects_wrong_chip() {
        let mut bus = chip();
        bus.mem[reg::ID as usize] = 0x60;
        assert!(matches!(Bmp280::new(bus, NoDelay), Err(SensorError::NotFound)));
    }

    #[test]
    fn test_temperature_then_pressure_share_conversion() {
        let mut sensor = Bmp280::new(chip(), NoDelay).unwrap();
        assert_eq!(sensor.calibration(), &SAMPLE);
        assert_eq!(sensor.read_temperature_x10(), Ok(251));
        let forced = |s: &Bmp280<RegisterBus, NoDelay>| {
            s.i2c.writes.iter().filter(|w| w.as_slice() == [reg::CTRL_MEAS, CTRL_FORCED]).count()
        };
        assert_eq!(forced(&sensor), 1);

        let p = sensor.read_pressure_pa().unwrap();
        assert!((100_650..=100_656).contains(&p));
        assert_eq!(forced(&sensor), 1);

        // Without a preceding temperature read, pressure converts on its own
        sensor.read_pressure_pa().unwrap();
        assert_eq!(forced(&sensor), 2);
    }

    #[test]
    fn test_bus_failure() {
        let mut sensor = Bmp280::new(chip(), NoDelay).unwrap();
        sensor.i2c.fail = true;
        assert_eq!(sensor.read_temperature_x10(), Err(SensorError::Bus));
    }
}
