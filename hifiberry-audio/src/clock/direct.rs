//! Direct (no-PLL) system clock path.

use super::WordLength;
use crate::constants::MAX_BIT_CLOCK_RATIO;

/// Result of the direct-divide path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectDivide {
    /// SCK → BCK divider, zero-based register value (ratio − 1).
    pub bit_clock_divider: u8,
}

impl DirectDivide {
    /// The SCK → BCK ratio, `bit_clock_divider + 1`.
    pub const fn ratio(&self) -> u32 {
        self.bit_clock_divider as u32 + 1
    }
}

/// Use the master clock directly as system clock, if it divides down exactly.
///
/// Available when `master_clock_hz` is an exact multiple of the stereo bit
/// clock `sample_rate_hz × bits × 2` and the ratio is in `1..=128`.
pub fn try_direct_divide(
    master_clock_hz: u32,
    sample_rate_hz: u32,
    word_length: WordLength,
) -> Option<DirectDivide> {
    let word_clock = u64::from(sample_rate_hz) * u64::from(word_length.bits());
    if master_clock_hz == 0 || word_clock == 0 {
        return None;
    }
    let mclk = u64::from(master_clock_hz);
    let bit_clock = word_clock * 2;
    if mclk % bit_clock != 0 {
        return None;
    }

    let ratio = mclk / bit_clock;
    if ratio == 0 || ratio > u64::from(MAX_BIT_CLOCK_RATIO) {
        trace!("direct divide: ratio {} out of range", ratio);
        return None;
    }

    Some(DirectDivide {
        bit_clock_divider: (ratio - 1) as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mclk_24576k_48k_16bit() {
        // 24 576 000 / (48 000 × 16 × 2) − 1 = 15
        let d = try_direct_divide(24_576_000, 48_000, WordLength::Bits16).unwrap();
        assert_eq!(d.bit_clock_divider, 15);
        assert_eq!(d.ratio(), 16);
    }

    #[test]
    fn mclk_24576k_48k_24bit() {
        // 24 576 000 / 1 152 000 = 21.33… → not exact
        assert!(try_direct_divide(24_576_000, 48_000, WordLength::Bits24).is_none());
    }

    #[test]
    fn mclk_24576k_96k_24bit() {
        // 24 576 000 / (96 000 × 24) = 10.67 → not exact
        assert!(try_direct_divide(24_576_000, 96_000, WordLength::Bits24).is_none());
        // 24 576 000 / (32 000 × 24) = 32 → ratio 16
        let d = try_direct_divide(24_576_000, 32_000, WordLength::Bits24).unwrap();
        assert_eq!(d.bit_clock_divider, 15);
    }

    #[test]
    fn mclk_24576k_44k1_unavailable() {
        assert!(try_direct_divide(24_576_000, 44_100, WordLength::Bits16).is_none());
        assert!(try_direct_divide(24_576_000, 44_100, WordLength::Bits24).is_none());
    }

    #[test]
    fn dacpro_44k1_oscillator() {
        // 22 579 200 / (44 100 × 16 × 2) = 16
        let d = try_direct_divide(22_579_200, 44_100, WordLength::Bits16).unwrap();
        assert_eq!(d.bit_clock_divider, 15);
    }

    #[test]
    fn odd_multiple_of_word_clock_unavailable() {
        // 19 200 000 / (32 000 × 24) = 25: BCK would run at 1.6 MHz, not 1.536 MHz
        assert!(try_direct_divide(19_200_000, 32_000, WordLength::Bits24).is_none());
        // 19 200 000 / (48 000 × 16) = 25
        assert!(try_direct_divide(19_200_000, 48_000, WordLength::Bits16).is_none());
        // 24 000 000 / (8 000 × 24) = 125
        assert!(try_direct_divide(24_000_000, 8_000, WordLength::Bits24).is_none());
        // 19 200 000 / (40 000 × 16 × 2) = 15
        let d = try_direct_divide(19_200_000, 40_000, WordLength::Bits16).unwrap();
        assert_eq!(d.ratio(), 15);
    }

    #[test]
    fn ratio_below_one_rejected() {
        // MCLK == fs × bits gives a stereo ratio of 0
        assert!(try_direct_divide(768_000, 48_000, WordLength::Bits16).is_none());
    }

    #[test]
    fn ratio_above_field_rejected() {
        // 129 × 2 × 8000 × 16
        assert!(try_direct_divide(33_024_000, 8_000, WordLength::Bits16).is_none());
        // 128 × 2 × 8000 × 16 is the last one that fits
        let d = try_direct_divide(32_768_000, 8_000, WordLength::Bits16).unwrap();
        assert_eq!(d.bit_clock_divider, 127);
    }

    #[test]
    fn zero_rates_unavailable() {
        assert!(try_direct_divide(0, 48_000, WordLength::Bits16).is_none());
        assert!(try_direct_divide(24_576_000, 0, WordLength::Bits16).is_none());
    }
}
