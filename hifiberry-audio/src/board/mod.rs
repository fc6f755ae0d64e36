//! HiFiBerry board glue: which clocks exist, who is clock master, and what
//! bit-clock ratio the host I2S controller must run at.

#[cfg(feature = "pcm186x")]
pub mod adc;

#[cfg(feature = "dacplus")]
pub mod dacplus;

#[cfg(feature = "pcm186x")]
pub use adc::{AdcHwParams, HifiberryAdc};

#[cfg(feature = "dacplus")]
pub use dacplus::{
    clock_for_rate, rate_fraction, sample_rate_index, DacHwParams, DacPlus, ProClock,
    RateFraction,
};

/// Negotiated PCM stream parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamParams {
    pub sample_rate_hz: u32,
    /// Physical sample width in bits.
    pub bits_per_sample: u32,
    pub channels: u32,
}

impl StreamParams {
    /// Stereo stream.
    pub const fn stereo(sample_rate_hz: u32, bits_per_sample: u32) -> Self {
        Self {
            sample_rate_hz,
            bits_per_sample,
            channels: 2,
        }
    }
}
