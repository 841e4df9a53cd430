//! Hardware abstraction traits
//!
//! These traits define the interface between the clock logic and the
//! board-specific drivers. All of them are object safe; states see the
//! RTC and the annunciator as `dyn` references.

pub mod output;
pub mod panel;
pub mod rtc;
pub mod sensor;

pub use output::{Annunciator, Monotonic};
pub use panel::{Panel, PanelError, Refresh};
pub use rtc::{DateTime, Rtc, RtcError};
pub use sensor::{EnvSensor, NoSensor, SensorError};
