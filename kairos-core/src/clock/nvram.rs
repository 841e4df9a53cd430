//! Timer durations in RTC NVRAM
//!
//! Three 3-byte little-endian integers at offsets 0, 3 and 6. Anything at
//! or above an hour is treated as garbage (fresh EEPROMs read 0xFF).

use crate::traits::{Rtc, RtcError};

use super::data::{ClockData, TimerSlot, MAX_TIMER_SECS};

const RECORD_LEN: usize = 3;

/// Byte offset of a slot's record
pub fn offset(slot: TimerSlot) -> u16 {
    (slot.position() * RECORD_LEN) as u16
}

pub fn encode(secs: u32) -> [u8; RECORD_LEN] {
    let b = secs.to_le_bytes();
    [b[0], b[1], b[2]]
}

pub fn decode(bytes: [u8; RECORD_LEN]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0])
}

/// Load all three durations into `data`
///
/// Implausible records are zeroed in memory and rewritten.
pub fn load_durations(rtc: &mut dyn Rtc, data: &mut ClockData) -> Result<(), RtcError> {
    for slot in TimerSlot::ALL {
        let mut raw = [0u8; RECORD_LEN];
        rtc.read_nvram(offset(slot), &mut raw)?;
        let secs = decode(raw);
        if secs < u32::from(MAX_TIMER_SECS) {
            data.set_timer_duration(slot, secs as u16);
        } else {
            warn!("timer {} NVRAM value {} reset", slot.index(), secs);
            data.set_timer_duration(slot, 0);
            store_duration(rtc, slot, 0)?;
        }
    }
    Ok(())
}

pub fn store_duration(rtc: &mut dyn Rtc, slot: TimerSlot, secs: u16) -> Result<(), RtcError> {
    rtc.write_nvram(offset(slot), &encode(u32::from(secs)))
}
