//! Fake buses and pins for driver tests

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, Operation};
use embedded_hal::spi::{self, SpiDevice};

/// Register-file I2C device
///
/// Writes start with an `addr_bytes` big-endian register pointer followed
/// by data; reads continue from the pointer.
pub struct RegisterBus {
    pub device: u8,
    pub addr_bytes: usize,
    pub mem: Vec<u8>,
    pub pointer: usize,
    pub writes: Vec<Vec<u8>>,
    pub fail: bool,
}

impl RegisterBus {
    pub fn new(device: u8, addr_bytes: usize, size: usize) -> Self {
        Self {
            device,
            addr_bytes,
            mem: vec![0; size],
            pointer: 0,
            writes: Vec::new(),
            fail: false,
        }
    }
}

#[derive(Debug)]
pub struct BusError;

impl i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for RegisterBus {
    type Error = BusError;
}

impl I2c for RegisterBus {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if self.fail || address != self.device {
            return Err(BusError);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.writes.push(bytes.to_vec());
                    let (ptr, data) = bytes.split_at(self.addr_bytes.min(bytes.len()));
                    self.pointer = ptr.iter().fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
                    for b in data {
                        let len = self.mem.len();
                        self.mem[self.pointer % len] = *b;
                        self.pointer += 1;
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.mem[self.pointer % self.mem.len()];
                        self.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

pub struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Bytes clocked out on SPI, tagged with the DC level at the time
#[derive(Clone, Default)]
pub struct Wire {
    pub dc: Rc<Cell<bool>>,
    pub log: Rc<RefCell<Vec<(bool, Vec<u8>)>>>,
}

impl Wire {
    /// Command bytes in order
    pub fn commands(&self) -> Vec<u8> {
        self.log
            .borrow()
            .iter()
            .filter(|(dc, _)| !dc)
            .flat_map(|(_, bytes)| bytes.clone())
            .collect()
    }

    /// Data sent after the `nth` occurrence of `cmd`
    pub fn data_after(&self, cmd: u8, nth: usize) -> Vec<u8> {
        let log = self.log.borrow();
        let mut seen = 0;
        let mut out = Vec::new();
        let mut collecting = false;
        for (dc, bytes) in log.iter() {
            if !dc {
                if collecting {
                    break;
                }
                if bytes.as_slice() == [cmd] {
                    if seen == nth {
                        collecting = true;
                    }
                    seen += 1;
                }
            } else if collecting {
                out.extend_from_slice(bytes);
            }
        }
        out
    }
}

#[derive(Debug)]
pub struct SpiFail;

impl spi::Error for SpiFail {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

pub struct FakeSpi {
    pub wire: Wire,
    pub fail: bool,
}

impl spi::ErrorType for FakeSpi {
    type Error = SpiFail;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [spi::Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(SpiFail);
        }
        for op in operations {
            if let spi::Operation::Write(bytes) = op {
                self.wire.log.borrow_mut().push((self.wire.dc.get(), bytes.to_vec()));
            }
        }
        Ok(())
    }
}

/// Data/command select, high for data
pub struct DcPin(pub Wire);

impl digital::ErrorType for DcPin {
    type Error = Infallible;
}

impl OutputPin for DcPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.dc.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.dc.set(true);
        Ok(())
    }
}

/// Output pin recording every level driven
#[derive(Default)]
pub struct LevelPin {
    pub history: Vec<bool>,
}

impl digital::ErrorType for LevelPin {
    type Error = Infallible;
}

impl OutputPin for LevelPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.history.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.history.push(true);
        Ok(())
    }
}

/// BUSY line high for the next `busy_polls` reads, or forever when stuck
pub struct BusyPin {
    pub busy_polls: u32,
    pub stuck: bool,
}

impl digital::ErrorType for BusyPin {
    type Error = Infallible;
}

impl InputPin for BusyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.stuck {
            return Ok(true);
        }
        if self.busy_polls > 0 {
            self.busy_polls -= 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
