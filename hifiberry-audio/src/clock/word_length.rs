//! Sample width → PCM format / frame divider mapping.

use super::ClockError;
use crate::codec::registers as reg;

/// Supported sample widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordLength {
    /// 16-bit samples.
    Bits16,
    /// 24-bit samples.
    Bits24,
}

impl WordLength {
    /// Width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits16 => 16,
            Self::Bits24 => 24,
        }
    }
}

impl TryFrom<u32> for WordLength {
    type Error = ClockError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(Self::Bits16),
            24 => Ok(Self::Bits24),
            other => Err(ClockError::InvalidBitWidth(other)),
        }
    }
}

/// Word-length dependent register values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WordLengthConfig {
    /// RX_WLEN / TX_WLEN bits of PCM_FORMAT (masked by [`reg::PCM_FORMAT_WLEN_MASK`]).
    pub format_bits: u8,
    /// BCK → LRCK divider, zero-based (bit clocks per frame − 1).
    pub frame_divider: u8,
}

/// Register mapping for a raw sample width.
///
/// Only 16 and 24 bits are wired up on the boards; everything else is
/// [`ClockError::InvalidBitWidth`].
pub fn word_length_config(bits_per_sample: u32) -> Result<WordLengthConfig, ClockError> {
    WordLength::try_from(bits_per_sample).map(config_for)
}

pub(crate) const fn config_for(word_length: WordLength) -> WordLengthConfig {
    match word_length {
        WordLength::Bits16 => WordLengthConfig {
            format_bits: reg::PCM_FORMAT_WLEN_16,
            frame_divider: 31,
        },
        WordLength::Bits24 => WordLengthConfig {
            format_bits: reg::PCM_FORMAT_WLEN_24,
            frame_divider: 47,
        },
    }
}
