//! Real-time clock trait

/// Errors that can occur with the RTC or its NVRAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// I2C transfer failed
    Bus,
    /// Register contents are not a valid date/time
    InvalidData,
    /// NVRAM access beyond the device
    OutOfRange,
}

/// Calendar date and wall-clock time as kept by the RTC
///
/// `weekday` is 0 for Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Battery-backed clock plus a small persistent byte region
pub trait Rtc {
    fn read_datetime(&mut self) -> Result<DateTime, RtcError>;

    fn write_datetime(&mut self, dt: &DateTime) -> Result<(), RtcError>;

    /// Read `buf.len()` bytes of NVRAM starting at `offset`
    fn read_nvram(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), RtcError>;

    /// Write `data` to NVRAM starting at `offset`
    fn write_nvram(&mut self, offset: u16, data: &[u8]) -> Result<(), RtcError>;
}
