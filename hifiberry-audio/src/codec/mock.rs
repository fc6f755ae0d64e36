//! Test doubles shared by the codec and board drivers.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorType, I2c, Operation};

use super::registers::{page_base, PAGE_SELECT};

#[derive(Debug, PartialEq)]
pub(crate) struct MockError;

impl i2c::Error for MockError {
    fn kind(&self) -> i2c::ErrorKind {
        i2c::ErrorKind::Other
    }
}

/// Status bits a chip reports on top of the stored register value.
pub(crate) type StatusFn = fn(&MockI2c, u16, u8) -> u8;

/// Stored value, no status bits.
pub(crate) fn plain(_: &MockI2c, _register: u16, stored: u8) -> u8 {
    stored
}

/// Mock paged 8-bit device: register file keyed by virtual address plus
/// a chronological write log.
pub(crate) struct MockI2c {
    /// Flag expected on every register address byte.
    pub flag: u8,
    pub page: u8,
    regs: [(u16, u8); 128],
    reg_count: usize,
    /// Register writes in order (page selects excluded).
    pub log: [(u16, u8); 128],
    pub log_count: usize,
    /// Address bytes seen without `flag`.
    pub unflagged: usize,
    status: StatusFn,
}

impl MockI2c {
    pub fn new(flag: u8, status: StatusFn) -> Self {
        Self {
            flag,
            page: 0,
            regs: [(0, 0); 128],
            reg_count: 0,
            log: [(0, 0); 128],
            log_count: 0,
            unflagged: 0,
            status,
        }
    }

    /// Stored register value, 0 if never written.
    pub fn read_reg(&self, addr: u16) -> u8 {
        for i in 0..self.reg_count {
            if self.regs[i].0 == addr {
                return self.regs[i].1;
            }
        }
        0
    }

    /// Set a register value (update or insert).
    pub fn set_reg(&mut self, addr: u16, val: u8) {
        for i in 0..self.reg_count {
            if self.regs[i].0 == addr {
                self.regs[i].1 = val;
                return;
            }
        }
        self.regs[self.reg_count] = (addr, val);
        self.reg_count += 1;
    }

    /// Get the (register, value) of the nth write.
    pub fn write_at(&self, idx: usize) -> (u16, u8) {
        self.log[idx]
    }

    /// Index of the first logged write matching `pred`.
    pub fn position(&self, pred: impl Fn((u16, u8)) -> bool) -> Option<usize> {
        (0..self.log_count).find(|&i| pred(self.log[i]))
    }

    /// Number of logged writes to `register`.
    pub fn writes_to(&self, register: u16) -> usize {
        (0..self.log_count)
            .filter(|&i| self.log[i].0 == register)
            .count()
    }

    fn offset(&mut self, byte: u8) -> u8 {
        if byte & self.flag != self.flag {
            self.unflagged += 1;
        }
        byte & !self.flag
    }
}

impl ErrorType for MockI2c {
    type Error = MockError;
}

impl I2c for MockI2c {
    fn read(&mut self, _addr: u8, _buf: &mut [u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, _addr: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if bytes.len() == 2 {
            let offset = self.offset(bytes[0]);
            if offset == PAGE_SELECT {
                self.page = bytes[1];
                return Ok(());
            }
            let register = page_base(self.page) + u16::from(offset);
            self.set_reg(register, bytes[1]);
            self.log[self.log_count] = (register, bytes[1]);
            self.log_count += 1;
        }
        Ok(())
    }

    fn write_read(&mut self, _addr: u8, wr: &[u8], rd: &mut [u8]) -> Result<(), Self::Error> {
        if wr.len() == 1 && rd.len() == 1 {
            let offset = self.offset(wr[0]);
            let register = page_base(self.page) + u16::from(offset);
            rd[0] = (self.status)(self, register, self.read_reg(register));
        }
        Ok(())
    }

    fn transaction(&mut self, _addr: u8, _ops: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Delay that only accumulates the requested time.
pub(crate) struct MockDelay {
    pub ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self { ns: 0 }
    }

    pub fn ms(&self) -> u64 {
        self.ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.ns += u64::from(ns);
    }
}
