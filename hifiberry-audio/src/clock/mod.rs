//! PCM186x clock configuration.
//!
//! Everything in this module is a pure function of its inputs: no register
//! access, no state. The result of [`setup_clocks`] is a [`ClockConfig`]
//! whose [`writes()`](ClockConfig::writes) a driver applies through a
//! [`RegisterProgrammer`](crate::control::RegisterProgrammer).
//!
//! The system clock can be derived in two ways:
//!
//! | Path | When | Module |
//! |------|------|--------|
//! | Direct divide | MCLK is an exact multiple of `fs × bits` | [`direct`] |
//! | PLL | otherwise | [`pll`] |
//!
//! The direct path is always preferred: no lock latency, no PLL jitter.

pub mod direct;
pub mod pll;
pub mod setup;
pub mod word_length;

pub use direct::{try_direct_divide, DirectDivide};
pub use pll::{
    pll_output_hz, solve_pll, validate, PllCoefficients, PllDividers, PllRejection,
    SearchFailure,
};
pub use setup::{setup_clocks, ClockConfig, ClockSource, PllFields};
pub use word_length::{word_length_config, WordLength, WordLengthConfig};

/// Stream clocking request: what the stream negotiation layer asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockRequest {
    /// Master clock (SCK) frequency in Hz. Zero means the clock is unknown.
    pub master_clock_hz: u32,
    /// Target sample rate (LRCK) in Hz.
    pub sample_rate_hz: u32,
    /// Sample width in bits (16 or 24).
    pub bits_per_sample: u32,
}

impl ClockRequest {
    /// Build a request.
    pub const fn new(master_clock_hz: u32, sample_rate_hz: u32, bits_per_sample: u32) -> Self {
        Self {
            master_clock_hz,
            sample_rate_hz,
            bits_per_sample,
        }
    }
}

/// Clock configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Sample width other than 16 or 24 bits.
    InvalidBitWidth(u32),
    /// No (R, J, D, P) combination satisfies the PLL operating envelope.
    NoValidPllFound,
    /// Master clock rate is zero / was never set.
    MasterClockUnset,
    /// Sample rate is zero.
    SampleRateUnset,
}

#[cfg(feature = "std")]
impl std::error::Error for ClockError {}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidBitWidth(bits) => write!(f, "unsupported sample width: {bits} bits"),
            Self::NoValidPllFound => write!(f, "no valid PLL configuration found"),
            Self::MasterClockUnset => write!(f, "master clock rate is not set"),
            Self::SampleRateUnset => write!(f, "sample rate is zero"),
        }
    }
}

impl From<SearchFailure> for ClockError {
    fn from(_: SearchFailure) -> Self {
        Self::NoValidPllFound
    }
}

/// Greatest common divisor (Euclid).
pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_basic() {
        assert_eq!(gcd(67_737_600, 24_576_000), 153_600);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(13, 7), 1);
    }

    #[test]
    fn search_failure_collapses_to_no_valid_pll() {
        let failure = SearchFailure {
            last_rejection: Some(PllRejection::OutputLow),
        };
        assert_eq!(ClockError::from(failure), ClockError::NoValidPllFound);
    }
}
