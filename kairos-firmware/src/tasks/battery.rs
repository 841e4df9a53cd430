//! Battery sampling task
//!
//! The cell sits behind a 1:2 divider on ADC0. 3.0 V reads as empty and
//! 4.2 V as full; anything below 1 V means no cell is fitted (USB power).

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::board::BatterySense;
use crate::channels::BATTERY;

const SAMPLE_INTERVAL_S: u64 = 60;
const VREF_MV: u32 = 3300;
const ADC_MAX: u32 = 4095;
const DIVIDER: u32 = 2;
const EMPTY_MV: u32 = 3000;
const FULL_MV: u32 = 4200;
const ABSENT_MV: u32 = 1000;

/// Cell voltage in mV from a raw 12-bit sample
fn cell_mv(raw: u16) -> u32 {
    u32::from(raw) * VREF_MV * DIVIDER / ADC_MAX
}

/// Linear charge estimate
fn percent(mv: u32) -> Option<u8> {
    if mv < ABSENT_MV {
        return None;
    }
    let clamped = mv.clamp(EMPTY_MV, FULL_MV);
    Some(((clamped - EMPTY_MV) * 100 / (FULL_MV - EMPTY_MV)) as u8)
}

#[embassy_executor::task]
pub async fn battery_task(mut sense: BatterySense) {
    info!("Battery task started");

    let mut ticker = Ticker::every(Duration::from_secs(SAMPLE_INTERVAL_S));

    loop {
        match sense.adc.read(&mut sense.channel).await {
            Ok(raw) => {
                let mv = cell_mv(raw);
                let level = percent(mv);
                debug!("Battery {} mV -> {}", mv, level);
                BATTERY.signal(level);
            }
            Err(e) => {
                warn!("Battery ADC read failed: {}", e);
                BATTERY.signal(None);
            }
        }

        ticker.next().await;
    }
}
