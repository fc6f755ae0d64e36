//! Paged 8-bit register transport over I2C.
//!
//! Both the PCM186x and the PCM512x expose 8-bit registers in 256-byte
//! pages selected through register 0. [`PagedI2c`] hides the paging behind
//! 16-bit virtual addresses (see [`registers::page_base`](super::registers::page_base))
//! and caches the selected page so consecutive accesses on one page cost a
//! single transfer each.

use embedded_hal::i2c::I2c;

use super::registers::{PAGE_LEN, PAGE_SELECT, VIRT_BASE};
use crate::control::RegisterProgrammer;

/// Paged register access to one I2C device.
pub struct PagedI2c<I2C> {
    i2c: I2C,
    address: u8,
    /// OR-ed into every register address byte on the wire.
    address_flag: u8,
    /// Page currently selected on the device, if known.
    page: Option<u8>,
}

impl<I2C: I2c> PagedI2c<I2C> {
    /// Wrap `i2c` for the device at 7-bit `address`.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            address_flag: 0,
            page: None,
        }
    }

    /// Set a flag OR-ed into every register address byte.
    pub fn with_address_flag(mut self, flag: u8) -> Self {
        self.address_flag = flag;
        self
    }

    /// Device I2C address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Forget the cached page; the next access re-selects it.
    ///
    /// Call after anything that may have reset the device.
    pub fn invalidate_page(&mut self) {
        self.page = None;
    }

    /// Release the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Split a register address into (page, offset), selecting the page.
    ///
    /// Addresses below [`VIRT_BASE`] are passed through unpaged.
    fn locate(&mut self, register: u16) -> Result<u8, I2C::Error> {
        if register < VIRT_BASE {
            return Ok(register as u8);
        }
        let page = ((register - VIRT_BASE) / PAGE_LEN) as u8;
        if self.page != Some(page) {
            self.page = None;
            self.i2c
                .write(self.address, &[PAGE_SELECT | self.address_flag, page])?;
            self.page = Some(page);
        }
        Ok((register % PAGE_LEN) as u8)
    }

    fn write_raw(&mut self, register: u16, value: u8) -> Result<(), I2C::Error> {
        let offset = self.locate(register)?;
        self.i2c
            .write(self.address, &[offset | self.address_flag, value])?;
        // Raw page-select writes move the device's page under us
        if register < VIRT_BASE && offset == PAGE_SELECT {
            self.page = Some(value);
        }
        Ok(())
    }
}

impl<I2C: I2c> RegisterProgrammer for PagedI2c<I2C> {
    type Error = I2C::Error;

    fn read(&mut self, register: u16) -> Result<u8, Self::Error> {
        let offset = self.locate(register)?;
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[offset | self.address_flag], &mut buf)?;
        Ok(buf[0])
    }

    /// Read-modify-write; the write is skipped when nothing changes and the
    /// read is skipped for full-width writes.
    fn update_bits(&mut self, register: u16, mask: u8, value: u8) -> Result<(), Self::Error> {
        if mask == 0xFF {
            return self.write_raw(register, value);
        }
        let current = self.read(register)?;
        let new = (current & !mask) | (value & mask);
        if new != current {
            self.write_raw(register, new)?;
        }
        Ok(())
    }
}
