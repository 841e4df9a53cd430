//! E-paper panel trait

/// Errors that can occur talking to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// SPI transfer failed
    Bus,
    /// Control pin (DC, RST, BUSY) could not be driven or read
    Pin,
    /// BUSY never released
    Timeout,
}

/// Waveform used when pushing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Refresh {
    /// Full waveform, clears ghosting, visibly flashes
    Full,
    /// Fast partial update
    Partial,
}

/// A slow, power-hungry bitmap panel
///
/// The dispatcher only sequences these calls: wait, init, show, sleep.
/// A failed step aborts the sequence.
pub trait Panel {
    /// BUSY line released
    fn is_ready(&mut self) -> bool;

    /// Block until the panel accepts commands
    fn wait_until_ready(&mut self) -> Result<(), PanelError>;

    /// Wake from deep sleep and set up RAM addressing
    fn init(&mut self) -> Result<(), PanelError>;

    /// Write a full frame buffer and run the refresh waveform
    fn show(&mut self, frame: &[u8], refresh: Refresh) -> Result<(), PanelError>;

    /// Enter deep sleep
    fn sleep(&mut self) -> Result<(), PanelError>;
}
