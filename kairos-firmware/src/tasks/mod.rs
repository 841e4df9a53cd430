//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod battery;
pub mod clock;
pub mod input;
pub mod output;

pub use battery::battery_task;
pub use clock::clock_task;
pub use input::input_task;
pub use output::output_task;

use embassy_time::{Instant, Timer};

/// Sleep until `deadline` in uptime milliseconds, forever for `None`
pub async fn sleep_until(deadline: Option<u64>) {
    match deadline {
        Some(ms) => Timer::at(Instant::from_millis(ms)).await,
        None => core::future::pending::<()>().await,
    }
}
