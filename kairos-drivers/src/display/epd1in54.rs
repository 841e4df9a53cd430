//! 1.54" 200x200 e-paper panel with SSD1681 controller
//!
//! Write-only SPI with a separate data/command line. The BUSY output is
//! high while the controller runs a waveform or a reset.
//!
//! # RAM layout
//!
//! Two 5000 byte planes, one bit per pixel, MSB first, 1 = white:
//! - 0x24 holds the new image
//! - 0x26 holds the previous image, the base of the partial waveform
//!
//! A full refresh loads both planes with the frame. A partial refresh
//! loads the new plane, runs the fast waveform and then brings the base
//! plane in line so the next partial update diffs against the screen.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use kairos_core::traits::{Panel, PanelError, Refresh};

/// SSD1681 commands
pub mod cmd {
    pub const DRIVER_OUTPUT: u8 = 0x01;
    pub const DEEP_SLEEP: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const TEMP_SENSOR: u8 = 0x18;
    pub const MASTER_ACTIVATION: u8 = 0x20;
    pub const UPDATE_CONTROL_2: u8 = 0x22;
    pub const WRITE_RAM_BW: u8 = 0x24;
    pub const WRITE_RAM_BASE: u8 = 0x26;
    pub const BORDER_WAVEFORM: u8 = 0x3C;
    pub const RAM_X_RANGE: u8 = 0x44;
    pub const RAM_Y_RANGE: u8 = 0x45;
    pub const RAM_X_COUNTER: u8 = 0x4E;
    pub const RAM_Y_COUNTER: u8 = 0x4F;
}

/// Display update sequences for [`cmd::UPDATE_CONTROL_2`]
const SEQ_FULL: u8 = 0xF7;
const SEQ_PARTIAL: u8 = 0xFF;

/// Timing knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EpdConfig {
    /// Interval between BUSY polls
    pub poll_ms: u32,
    /// Polls before giving up, a full waveform takes about 2 s
    pub max_polls: u32,
}

impl Default for EpdConfig {
    fn default() -> Self {
        Self {
            poll_ms: 10,
            max_polls: 500,
        }
    }
}

/// SSD1681 panel
pub struct Epd1in54<SPI, DC, RST, BUSY, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    busy: BUSY,
    delay: D,
    config: EpdConfig,
}

impl<SPI, DC, RST, BUSY, D> Epd1in54<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, delay: D, config: EpdConfig) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            delay,
            config,
        }
    }

    fn hardware_reset(&mut self) -> Result<(), PanelError> {
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        self.delay.delay_ms(10);
        self.rst.set_low().map_err(|_| PanelError::Pin)?;
        self.delay.delay_ms(2);
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        self.delay.delay_ms(10);
        Ok(())
    }

    fn command(&mut self, command: u8) -> Result<(), PanelError> {
        self.dc.set_low().map_err(|_| PanelError::Pin)?;
        self.spi.write(&[command]).map_err(|_| PanelError::Bus)
    }

    fn data(&mut self, data: &[u8]) -> Result<(), PanelError> {
        self.dc.set_high().map_err(|_| PanelError::Pin)?;
        self.spi.write(data).map_err(|_| PanelError::Bus)
    }

    fn command_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), PanelError> {
        self.command(command)?;
        self.data(data)
    }

    fn write_plane(&mut self, plane: u8, frame: &[u8]) -> Result<(), PanelError> {
        self.command_with_data(cmd::RAM_X_COUNTER, &[0x00])?;
        self.command_with_data(cmd::RAM_Y_COUNTER, &[0x00, 0x00])?;
        self.command_with_data(plane, frame)
    }

    fn activate(&mut self, sequence: u8) -> Result<(), PanelError> {
        self.command_with_data(cmd::UPDATE_CONTROL_2, &[sequence])?;
        self.command(cmd::MASTER_ACTIVATION)?;
        self.wait_until_ready()
    }
}

impl<SPI, DC, RST, BUSY, D> Panel for Epd1in54<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    fn is_ready(&mut self) -> bool {
        self.busy.is_low().unwrap_or(false)
    }

    fn wait_until_ready(&mut self) -> Result<(), PanelError> {
        for _ in 0..self.config.max_polls {
            if self.busy.is_low().map_err(|_| PanelError::Pin)? {
                return Ok(());
            }
            self.delay.delay_ms(self.config.poll_ms);
        }
        Err(PanelError::Timeout)
    }

    fn init(&mut self) -> Result<(), PanelError> {
        self.hardware_reset()?;
        self.wait_until_ready()?;
        self.command(cmd::SW_RESET)?;
        self.wait_until_ready()?;

        // 200 gate lines, scan order 0 -> 199
        self.command_with_data(cmd::DRIVER_OUTPUT, &[0xC7, 0x00, 0x00])?;
        // X increment, Y increment
        self.command_with_data(cmd::DATA_ENTRY_MODE, &[0x03])?;
        self.command_with_data(cmd::RAM_X_RANGE, &[0x00, 0x18])?;
        self.command_with_data(cmd::RAM_Y_RANGE, &[0x00, 0x00, 0xC7, 0x00])?;
        self.command_with_data(cmd::BORDER_WAVEFORM, &[0x05])?;
        // Internal temperature sensor
        self.command_with_data(cmd::TEMP_SENSOR, &[0x80])?;
        self.command_with_data(cmd::RAM_X_COUNTER, &[0x00])?;
        self.command_with_data(cmd::RAM_Y_COUNTER, &[0x00, 0x00])?;
        self.wait_until_ready()
    }

    fn show(&mut self, frame: &[u8], refresh: Refresh) -> Result<(), PanelError> {
        match refresh {
            Refresh::Full => {
                self.write_plane(cmd::WRITE_RAM_BW, frame)?;
                self.write_plane(cmd::WRITE_RAM_BASE, frame)?;
                self.activate(SEQ_FULL)
            }
            Refresh::Partial => {
                self.write_plane(cmd::WRITE_RAM_BW, frame)?;
                self.activate(SEQ_PARTIAL)?;
                self.write_plane(cmd::WRITE_RAM_BASE, frame)
            }
        }
    }

    fn sleep(&mut self) -> Result<(), PanelError> {
        // Mode 1 keeps RAM
        self.command_with_data(cmd::DEEP_SLEEP, &[0x01])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BusyPin, DcPin, FakeSpi, LevelPin, NoDelay, Wire};
    use std::vec::Vec;

    type TestEpd = Epd1in54<FakeSpi, DcPin, LevelPin, BusyPin, NoDelay>;

    fn panel(busy_polls: u32) -> (TestEpd, Wire) {
        let wire = Wire::default();
        let epd = Epd1in54::new(
            FakeSpi {
                wire: wire.clone(),
                fail: false,
            },
            DcPin(wire.clone()),
            LevelPin::default(),
            BusyPin {
                busy_polls,
                stuck: false,
            },
            NoDelay,
            EpdConfig::default(),
        );
        (epd, wire)
    }

    #[test]
    fn test_init_sequence() {
        let (mut epd, wire) = panel(3);
        epd.init().unwrap();

        assert_eq!(epd.rst.history, [true, false, true]);
        assert_eq!(
            wire.commands(),
            [
                cmd::SW_RESET,
                cmd::DRIVER_OUTPUT,
                cmd::DATA_ENTRY_MODE,
                cmd::RAM_X_RANGE,
                cmd::RAM_Y_RANGE,
                cmd::BORDER_WAVEFORM,
                cmd::TEMP_SENSOR,
                cmd::RAM_X_COUNTER,
                cmd::RAM_Y_COUNTER,
            ]
        );
        assert_eq!(wire.data_after(cmd::DRIVER_OUTPUT, 0), [0xC7, 0x00, 0x00]);
        assert_eq!(wire.data_after(cmd::RAM_Y_RANGE, 0), [0x00, 0x00, 0xC7, 0x00]);
    }

    #[test]
    fn test_full_show_loads_both_planes() {
        let (mut epd, wire) = panel(0);
        let frame: Vec<u8> = (0..5000).map(|i| i as u8).collect();
        epd.show(&frame, Refresh::Full).unwrap();

        assert_eq!(wire.data_after(cmd::WRITE_RAM_BW, 0), frame);
        assert_eq!(wire.data_after(cmd::WRITE_RAM_BASE, 0), frame);
        assert_eq!(wire.data_after(cmd::UPDATE_CONTROL_2, 0), [SEQ_FULL]);
        let cmds = wire.commands();
        assert_eq!(cmds.last(), Some(&cmd::MASTER_ACTIVATION));
    }

    #[test]
    fn test_partial_show_updates_base_after_waveform() {
        let (mut epd, wire) = panel(0);
        let frame = [0xAAu8; 5000];
        epd.show(&frame, Refresh::Partial).unwrap();

        assert_eq!(wire.data_after(cmd::UPDATE_CONTROL_2, 0), [SEQ_PARTIAL]);
        let cmds = wire.commands();
        let activation = cmds.iter().position(|c| *c == cmd::MASTER_ACTIVATION).unwrap();
        let base = cmds.iter().position(|c| *c == cmd::WRITE_RAM_BASE).unwrap();
        assert!(base > activation);
        assert_eq!(wire.data_after(cmd::WRITE_RAM_BASE, 0).len(), 5000);
    }

    #[test]
    fn test_busy_timeout() {
        let (mut epd, _wire) = panel(0);
        epd.busy.stuck = true;
        assert!(!epd.is_ready());
        assert_eq!(epd.wait_until_ready(), Err(PanelError::Timeout));
        assert_eq!(epd.init(), Err(PanelError::Timeout));
    }

    #[test]
    fn test_sleep_and_bus_error() {
        let (mut epd, wire) = panel(0);
        epd.sleep().unwrap();
        assert_eq!(wire.data_after(cmd::DEEP_SLEEP, 0), [0x01]);

        epd.spi.fail = true;
        assert_eq!(epd.sleep(), Err(PanelError::Bus));
    }
}
