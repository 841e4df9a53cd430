//! Core collaborator traits backed by embassy

use defmt::*;
use embassy_time::Instant;

use kairos_core::traits::{Annunciator, Monotonic};

use crate::channels::{OutputCommand, OUTPUT_CMD};

/// Milliseconds since boot
pub struct Uptime;

impl Monotonic for Uptime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// Forwards feedback requests to the output task
pub struct Outputs;

impl Outputs {
    fn send(&self, cmd: OutputCommand) {
        if OUTPUT_CMD.try_send(cmd).is_err() {
            warn!("output queue full, {} dropped", cmd);
        }
    }
}

impl Annunciator for Outputs {
    fn buzz(&mut self, duration_ms: u32) {
        self.send(OutputCommand::Buzz(duration_ms));
    }

    fn set_alarm(&mut self, active: bool) {
        self.send(OutputCommand::Alarm(active));
    }
}
