//! Register access abstraction shared by the codec and board drivers.

/// One masked register write: `new = (current & !mask) | (value & mask)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    /// Virtual register address (`page * 0x100 + 0x100 + offset`).
    pub register: u16,
    /// Bits of the register touched by this write.
    pub mask: u8,
    /// New value of the masked bits.
    pub value: u8,
}

impl RegisterWrite {
    /// Full-width write of `value`.
    pub const fn full(register: u16, value: u8) -> Self {
        Self { register, mask: 0xFF, value }
    }

    /// Write of the bits selected by `mask`.
    pub const fn masked(register: u16, mask: u8, value: u8) -> Self {
        Self { register, mask, value }
    }
}

/// Trait for anything that can read and program codec registers.
///
/// Clock solvers never touch this; drivers receive one by value and apply
/// the solver's [`RegisterWrite`] lists through it.
pub trait RegisterProgrammer {
    /// Error type for register transfers.
    type Error;

    /// Read one register.
    fn read(&mut self, register: u16) -> Result<u8, Self::Error>;

    /// Update the bits in `mask` to `value`.
    fn update_bits(&mut self, register: u16, mask: u8, value: u8) -> Result<(), Self::Error>;

    /// Write the whole register.
    fn write(&mut self, register: u16, value: u8) -> Result<(), Self::Error> {
        self.update_bits(register, 0xFF, value)
    }

    /// Apply a list of writes in order, stopping at the first failure.
    fn apply(&mut self, writes: &[RegisterWrite]) -> Result<(), Self::Error> {
        for w in writes {
            self.update_bits(w.register, w.mask, w.value)?;
        }
        Ok(())
    }
}
