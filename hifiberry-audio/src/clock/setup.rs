//! Clock-setup orchestration: request in, register field values out.

use heapless::Vec;

use super::direct::try_direct_divide;
use super::pll::{solve_pll, PllDividers};
use super::word_length::{config_for, WordLength};
use super::{ClockError, ClockRequest};
use crate::codec::registers as reg;
use crate::constants::PLL_SCK_DIVIDER;
use crate::control::RegisterWrite;

/// Maximum number of register writes in a [`ClockConfig`].
pub const MAX_CLOCK_WRITES: usize = 12;

/// Where the codec's system clock comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// SCK pin, divided directly.
    MasterClock,
    /// PLL output ÷ 8.
    Pll,
}

/// PLL divider register fields (already register encoded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllFields {
    /// PLL_P_DIVIDER: P − 1.
    pub p: u8,
    /// PLL_R_DIVIDER: R − 1.
    pub r: u8,
    /// PLL_J_DIVIDER: J.
    pub j: u8,
    /// PLL_D1_DIVIDER: D bits 7:0.
    pub d_lsb: u8,
    /// PLL_D2_DIVIDER: D bits 13:8.
    pub d_msb: u8,
}

impl From<&PllDividers> for PllFields {
    fn from(d: &PllDividers) -> Self {
        Self {
            p: d.p.saturating_sub(1) & reg::PLL_P_MASK,
            r: d.r.saturating_sub(1) & reg::PLL_R_MASK,
            j: d.j & reg::PLL_J_MASK,
            d_lsb: (d.d & 0xFF) as u8,
            d_msb: ((d.d >> 8) as u8) & reg::PLL_D_MSB_MASK,
        }
    }
}

/// Register field values for one clock configuration.
///
/// Produced by [`setup_clocks`]; applied by the codec driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// System clock source selector.
    pub source: ClockSource,
    /// PLL dividers; `Some` exactly when the PLL is enabled.
    pub pll: Option<PllFields>,
    /// SCK → BCK divider (zero-based).
    pub bit_clock_divider: u8,
    /// BCK → LRCK divider (zero-based).
    pub frame_divider: u8,
    /// PCM_FORMAT word-length bits.
    pub format_bits: u8,
}

impl ClockConfig {
    /// Whether the PLL enable bit is set.
    pub const fn pll_enabled(&self) -> bool {
        self.pll.is_some()
    }

    /// Ordered register writes realising this configuration.
    ///
    /// The PLL is disabled before its dividers change and enabled only after
    /// all of them are written; the clock-source switch comes after that.
    pub fn writes(&self) -> Vec<RegisterWrite, MAX_CLOCK_WRITES> {
        let mut out = Vec::new();
        match self.pll {
            Some(pll) => out.extend([
                RegisterWrite::masked(reg::PLL_STATUS, reg::PLL_STATUS_EN, 0),
                RegisterWrite::full(reg::PLL_P_DIVIDER, pll.p),
                RegisterWrite::full(reg::PLL_R_DIVIDER, pll.r),
                RegisterWrite::full(reg::PLL_J_DIVIDER, pll.j),
                RegisterWrite::full(reg::PLL_D1_DIVIDER, pll.d_lsb),
                RegisterWrite::full(reg::PLL_D2_DIVIDER, pll.d_msb),
                RegisterWrite::full(reg::PLL_SCK_DIVIDER, (PLL_SCK_DIVIDER - 1) as u8),
                RegisterWrite::masked(reg::PLL_STATUS, reg::PLL_STATUS_EN, reg::PLL_STATUS_EN),
                RegisterWrite::masked(
                    reg::CLK_SELECT,
                    reg::CLK_SELECT_SRC_MASK,
                    reg::CLK_SELECT_SRC_PLL,
                ),
            ]),
            None => out.extend([
                RegisterWrite::masked(reg::CLK_SELECT, reg::CLK_SELECT_SRC_MASK, 0),
                RegisterWrite::masked(reg::PLL_STATUS, reg::PLL_STATUS_EN, 0),
            ]),
        }
        out.extend([
            RegisterWrite::full(reg::SCK_TO_BCK_DIVIDER, self.bit_clock_divider),
            RegisterWrite::full(reg::SCK_TO_LRCK_DIVIDER, self.frame_divider),
            RegisterWrite::masked(reg::PCM_FORMAT, reg::PCM_FORMAT_WLEN_MASK, self.format_bits),
        ]);
        out
    }
}

/// Compute the full clock configuration for `request`.
///
/// Prefers the direct-divide path; falls back to the PLL search.
pub fn setup_clocks(request: &ClockRequest) -> Result<ClockConfig, ClockError> {
    if request.master_clock_hz == 0 {
        return Err(ClockError::MasterClockUnset);
    }
    if request.sample_rate_hz == 0 {
        return Err(ClockError::SampleRateUnset);
    }
    let word_length = WordLength::try_from(request.bits_per_sample)?;
    let wl = config_for(word_length);

    if let Some(direct) =
        try_direct_divide(request.master_clock_hz, request.sample_rate_hz, word_length)
    {
        debug!(
            "clock: direct divide {} Hz / {}",
            request.master_clock_hz,
            direct.ratio()
        );
        return Ok(ClockConfig {
            source: ClockSource::MasterClock,
            pll: None,
            bit_clock_divider: direct.bit_clock_divider,
            frame_divider: wl.frame_divider,
            format_bits: wl.format_bits,
        });
    }

    let coefficients = solve_pll(request.master_clock_hz, request.sample_rate_hz, word_length)?;
    debug!(
        "clock: pll {} Hz -> {} Hz",
        request.master_clock_hz,
        coefficients.output_hz
    );
    Ok(ClockConfig {
        source: ClockSource::Pll,
        pll: Some(PllFields::from(&coefficients.dividers)),
        bit_clock_divider: coefficients.bit_clock_divider,
        frame_divider: wl.frame_divider,
        format_bits: wl.format_bits,
    })
}
