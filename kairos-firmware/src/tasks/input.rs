//! Encoder input task
//!
//! Wakes on any edge of the three encoder pins. Quadrature samples go
//! straight into the decoder; the switch is sampled again once it has
//! settled for the debounce time. Events leave through the rotary's
//! listener into [`INPUT_CHANNEL`]; nothing here touches the dispatcher.

use defmt::*;
use embassy_futures::select::{select4, Either4};
use embassy_time::Instant;

use kairos_core::config::{ButtonTiming, RotaryConfig};
use kairos_core::input::{Event, ListenerError, Rotary};
use kairos_core::timer::earliest;

use super::sleep_until;
use crate::board::Encoder;
use crate::channels::INPUT_CHANNEL;

#[embassy_executor::task]
pub async fn input_task(encoder: Encoder, config: RotaryConfig, timing: ButtonTiming) {
    info!("Input task started");

    let Encoder {
        mut clk,
        mut dt,
        mut switch,
    } = encoder;

    let forward = |event: Event| -> Result<(), ListenerError> {
        INPUT_CHANNEL
            .try_send(event)
            .map_err(|_| ListenerError::QueueFull)
    };
    let mut rotary: Rotary<'_, 1> = Rotary::new(config, timing);
    if rotary.add_listener(&forward).is_err() {
        error!("Encoder listener list full");
    }

    let debounce_ms = u64::from(timing.debounce_ms);
    let mut settle: Option<u64> = None;

    loop {
        let deadline = earliest(rotary.next_deadline(), settle);
        let wake = select4(
            clk.wait_for_any_edge(),
            dt.wait_for_any_edge(),
            switch.wait_for_any_edge(),
            sleep_until(deadline),
        )
        .await;

        let now = Instant::now().as_millis();
        match wake {
            Either4::First(()) | Either4::Second(()) => {
                rotary.process_pins(clk.is_high(), dt.is_high());
            }
            Either4::Third(()) => settle = Some(now + debounce_ms),
            Either4::Fourth(()) => {}
        }

        if settle.is_some_and(|t| now >= t) {
            settle = None;
            // Active low
            rotary.process_switch(switch.is_low(), now);
        }
        rotary.poll(now);
    }
}
