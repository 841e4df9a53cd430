//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use kairos_core::input::Event;

/// Channel capacity for encoder events
const INPUT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for output commands
const OUTPUT_CHANNEL_SIZE: usize = 4;

/// Decoded encoder events, queued for the clock task
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, Event, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Buzzer and motor requests from the clock task
pub static OUTPUT_CMD: Channel<CriticalSectionRawMutex, OutputCommand, OUTPUT_CHANNEL_SIZE> =
    Channel::new();

/// Latest battery charge in percent, `None` while not measurable
pub static BATTERY: Signal<CriticalSectionRawMutex, Option<u8>> = Signal::new();

/// Request for the output task
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum OutputCommand {
    /// Single motor pulse
    Buzz(u32),
    /// Start or stop the pulsing alarm pattern
    Alarm(bool),
}
