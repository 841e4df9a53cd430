//! Environment readings: sea level reduction and display strings

use core::fmt::Write;

use heapless::String;
use micromath::F32Ext;

/// Reduce station pressure to sea level, in 0.1 hPa
///
/// Barometric formula with the standard atmosphere exponent.
pub fn sea_level_pressure_x10(station_pa: u32, elevation_m: u16) -> u16 {
    let factor = (1.0 - f32::from(elevation_m) / 44_330.0).powf(5.255);
    let hpa_x10 = station_pa as f32 / factor / 10.0;
    (hpa_x10 + 0.5).clamp(0.0, u16::MAX as f32) as u16
}

/// "21.5°C", "-0.4°C"
pub fn temperature_text(temp_x10: i16) -> String<10> {
    let mut s = String::new();
    let sign = if temp_x10 < 0 { "-" } else { "" };
    let abs = temp_x10.unsigned_abs();
    let _ = write!(s, "{}{}.{}\u{b0}C", sign, abs / 10, abs % 10);
    s
}

/// "1013.2 hPa"
pub fn pressure_text(pressure_x10: u16) -> String<12> {
    let mut s = String::new();
    let _ = write!(s, "{}.{} hPa", pressure_x10 / 10, pressure_x10 % 10);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sea_level_reduction() {
        // 360 m raises the reading by roughly 4.4 %
        let p = sea_level_pressure_x10(97_000, 360);
        assert!((10_120..=10_140).contains(&p), "got {}", p);
        assert_eq!(sea_level_pressure_x10(101_325, 0), 10_133);
    }

    #[test]
    fn test_temperature_text() {
        assert_eq!(temperature_text(215).as_str(), "21.5\u{b0}C");
        assert_eq!(temperature_text(-4).as_str(), "-0.4\u{b0}C");
        assert_eq!(temperature_text(-123).as_str(), "-12.3\u{b0}C");
    }

    #[test]
    fn test_pressure_text() {
        assert_eq!(pressure_text(10_132).as_str(), "1013.2 hPa");
    }
}
