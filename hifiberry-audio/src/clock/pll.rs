//! PCM186x PLL coefficient solver.
//!
//! The PLL output is
//!
//! ```text
//! PLL_OUT = PLL_IN × R × J.D / P
//! ```
//!
//! where `J.D` is a fixed-point number with four decimal fraction digits
//! (`J.D = (J × 10 000 + D) / 10 000`). The system clock is `PLL_OUT / 8`
//! and the bit clock is the system clock divided by the SCK → BCK divider.
//!
//! Ranges (datasheet):
//!
//! | Coefficient | Range | Notes |
//! |-------------|-------|-------|
//! | R | 1–16 | must be 1 in fractional mode |
//! | J | 1–63 | 4–11 in fractional mode |
//! | D | 0–9999 | fractional mode when non-zero |
//! | P | 1–15 | |
//!
//! with `PLL_IN / P` in 1–20 MHz (6.667–20 MHz in fractional mode) and
//! `PLL_OUT` in 64–100 MHz.

use super::{gcd, WordLength};
use crate::constants::{
    MAX_BIT_CLOCK_RATIO, PLL_FRACTIONAL_INPUT_DIVIDER_MIN_HZ, PLL_INPUT_DIVIDER_MAX_HZ,
    PLL_INPUT_DIVIDER_MIN_HZ, PLL_OUTPUT_MAX_HZ, PLL_OUTPUT_MIN_HZ, PLL_SCK_DIVIDER,
};

const R_MIN: u8 = 1;
const R_MAX: u8 = 16;
const J_MIN: u8 = 1;
const J_MAX: u8 = 63;
const D_MAX: u16 = 9999;
const P_MIN: u8 = 1;
const P_MAX: u8 = 15;
const FRACTIONAL_J_MIN: u8 = 4;
const FRACTIONAL_J_MAX: u8 = 11;

/// `J.D` fixed-point scale (four decimal digits).
const FRACTION_SCALE: u64 = 10_000;

/// Doubling seeds for the PLL output multiplier (`N = seed × 2^k`).
const MULTIPLIER_SEEDS: [u64; 2] = [2, 3];

/// Raw PLL divider coefficients (not register encoded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllDividers {
    /// Pre-multiplier R.
    pub r: u8,
    /// Integer multiplier J.
    pub j: u8,
    /// Fractional multiplier D (`J.D` with four decimal digits).
    pub d: u16,
    /// Pre-divider P.
    pub p: u8,
}

/// Why a set of PLL coefficients was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PllRejection {
    /// `PLL_IN / P` below the mode's minimum.
    InputDividerLow,
    /// `PLL_IN / P` above 20 MHz.
    InputDividerHigh,
    /// PLL output below 64 MHz.
    OutputLow,
    /// PLL output above 100 MHz.
    OutputHigh,
    /// R outside 1–16, or R ≠ 1 in fractional mode.
    ROutOfRange,
    /// J outside 1–63, or outside 4–11 in fractional mode.
    JOutOfRange,
    /// D above 9999.
    DOutOfRange,
    /// P outside 1–15.
    POutOfRange,
}

impl PllRejection {
    /// Numeric diagnostic code (−1 … −8).
    pub const fn code(self) -> i8 {
        match self {
            Self::InputDividerLow => -1,
            Self::InputDividerHigh => -2,
            Self::OutputLow => -3,
            Self::OutputHigh => -4,
            Self::ROutOfRange => -5,
            Self::JOutOfRange => -6,
            Self::DOutOfRange => -7,
            Self::POutOfRange => -8,
        }
    }
}

impl core::fmt::Display for PllRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::InputDividerLow => "PLL input divider frequency too low",
            Self::InputDividerHigh => "PLL input divider frequency too high",
            Self::OutputLow => "PLL output frequency too low",
            Self::OutputHigh => "PLL output frequency too high",
            Self::ROutOfRange => "PLL R out of range",
            Self::JOutOfRange => "PLL J out of range",
            Self::DOutOfRange => "PLL D out of range",
            Self::POutOfRange => "PLL P out of range",
        };
        f.write_str(msg)
    }
}

/// No coefficient set satisfied [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SearchFailure {
    /// Reason the last evaluated candidate was rejected, if any was evaluated.
    pub last_rejection: Option<PllRejection>,
}

impl core::fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.last_rejection {
            Some(reason) => write!(f, "no valid PLL configuration (last: {reason})"),
            None => write!(f, "no PLL output frequency fits the sample rate"),
        }
    }
}

/// A solved PLL configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllCoefficients {
    /// R, J, D, P.
    pub dividers: PllDividers,
    /// N in `PLL_OUT = N × fs`.
    pub multiplier: u32,
    /// Actual PLL output for the chosen dividers.
    pub output_hz: u32,
    /// SCK → BCK divider, zero-based register value.
    pub bit_clock_divider: u8,
}

/// PLL output frequency for `pll_clock_in_hz` and `dividers`.
///
/// Returns 0 for `P = 0`.
pub fn pll_output_hz(pll_clock_in_hz: u32, dividers: &PllDividers) -> u64 {
    if dividers.p == 0 {
        return 0;
    }
    let multiplier = u64::from(dividers.r) * u64::from(dividers.j) * FRACTION_SCALE
        + u64::from(dividers.d);
    u64::from(pll_clock_in_hz) * multiplier / (u64::from(dividers.p) * FRACTION_SCALE)
}

/// Check `dividers` against the PLL operating envelope for input `pll_clock_in_hz`.
pub fn validate(pll_clock_in_hz: u32, dividers: &PllDividers) -> Result<(), PllRejection> {
    let PllDividers { r, j, d, p } = *dividers;

    if !(R_MIN..=R_MAX).contains(&r) {
        return Err(PllRejection::ROutOfRange);
    }
    if !(J_MIN..=J_MAX).contains(&j) {
        return Err(PllRejection::JOutOfRange);
    }
    if d > D_MAX {
        return Err(PllRejection::DOutOfRange);
    }
    if !(P_MIN..=P_MAX).contains(&p) {
        return Err(PllRejection::POutOfRange);
    }

    let input_divider = pll_clock_in_hz / u32::from(p);
    if input_divider > PLL_INPUT_DIVIDER_MAX_HZ {
        return Err(PllRejection::InputDividerHigh);
    }

    let output = pll_output_hz(pll_clock_in_hz, dividers);
    if output < u64::from(PLL_OUTPUT_MIN_HZ) {
        return Err(PllRejection::OutputLow);
    }
    if output > u64::from(PLL_OUTPUT_MAX_HZ) {
        return Err(PllRejection::OutputHigh);
    }

    if d == 0 {
        if input_divider < PLL_INPUT_DIVIDER_MIN_HZ {
            return Err(PllRejection::InputDividerLow);
        }
    } else {
        if input_divider < PLL_FRACTIONAL_INPUT_DIVIDER_MIN_HZ {
            return Err(PllRejection::InputDividerLow);
        }
        if !(FRACTIONAL_J_MIN..=FRACTIONAL_J_MAX).contains(&j) {
            return Err(PllRejection::JOutOfRange);
        }
        if r != 1 {
            return Err(PllRejection::ROutOfRange);
        }
    }

    Ok(())
}

/// Pick N so that `N × fs` is the highest usable PLL output.
///
/// N must be a multiple of `16 × bits` (÷8 to SCK, then ÷(2 × bits) to BCK
/// has to come out even) and the resulting bit-clock ratio must fit the
/// 7-bit divider.
fn output_multiplier(sample_rate_hz: u32, word_length: WordLength) -> Option<u32> {
    let fs = u64::from(sample_rate_hz);
    if fs == 0 {
        return None;
    }
    let step = u64::from(PLL_SCK_DIVIDER) * 2 * u64::from(word_length.bits());

    let mut best: Option<u64> = None;
    for seed in MULTIPLIER_SEEDS {
        let mut n = seed;
        while n * fs <= u64::from(PLL_OUTPUT_MAX_HZ) {
            let usable = n * fs >= u64::from(PLL_OUTPUT_MIN_HZ)
                && n % step == 0
                && n / step <= u64::from(MAX_BIT_CLOCK_RATIO);
            if usable && best.map_or(true, |b| n > b) {
                best = Some(n);
            }
            n *= 2;
        }
    }
    best.map(|n| n as u32)
}

/// Candidate evaluation with rejection bookkeeping.
struct Search {
    pll_clock_in_hz: u32,
    last_rejection: Option<PllRejection>,
}

impl Search {
    fn new(pll_clock_in_hz: u32) -> Self {
        Self {
            pll_clock_in_hz,
            last_rejection: None,
        }
    }

    fn accept(&mut self, dividers: &PllDividers) -> bool {
        match validate(self.pll_clock_in_hz, dividers) {
            Ok(()) => true,
            Err(reason) => {
                trace!(
                    "pll candidate R={} J={} D={} P={} rejected ({})",
                    dividers.r,
                    dividers.j,
                    dividers.d,
                    dividers.p,
                    reason.code()
                );
                self.last_rejection = Some(reason);
                false
            }
        }
    }

    /// Exact integer ratio `ratio_num / ratio_den`, D = 0.
    ///
    /// Scales the reduced fraction by k while P stays in range and splits
    /// the numerator into R × J. First valid candidate wins (ascending k, R).
    fn integer(&mut self, ratio_num: u64, ratio_den: u64) -> Option<PllDividers> {
        let p_max = u64::from(P_MAX);
        if ratio_den > p_max {
            return None;
        }
        for k in 1..=p_max / ratio_den {
            let p = ratio_den * k;
            let total = ratio_num * k;
            for r in u64::from(R_MIN)..=u64::from(R_MAX) {
                if total % r != 0 {
                    continue;
                }
                let j = total / r;
                if j > u64::from(J_MAX) {
                    continue;
                }
                let dividers = PllDividers {
                    r: r as u8,
                    j: j as u8,
                    d: 0,
                    p: p as u8,
                };
                if self.accept(&dividers) {
                    return Some(dividers);
                }
            }
        }
        None
    }

    /// Closest `J.D / P` to `ratio_num / ratio_den` with R = 1.
    ///
    /// For every J in 4–11, the P values with `J ≤ ratio × P < J + 1` are
    /// tried; D is the ratio's fraction rounded down and up to four digits.
    /// Deviation is `|J.D / P − ratio|`; ties keep the earliest candidate
    /// (ascending J, then P, then the rounded-down D).
    fn fractional(&mut self, ratio_num: u64, ratio_den: u64) -> Option<PllDividers> {
        let mut best: Option<(PllDividers, u64, u64)> = None;

        for j in FRACTIONAL_J_MIN..=FRACTIONAL_J_MAX {
            let j = u64::from(j);
            let p_lo = (j * ratio_den).div_ceil(ratio_num).max(u64::from(P_MIN));
            let p_hi = (((j + 1) * ratio_den - 1) / ratio_num).min(u64::from(P_MAX));

            for p in p_lo..=p_hi {
                // ratio × P × 10 000, scaled by ratio_den
                let exact = ratio_num * p * FRACTION_SCALE;
                let floor = exact / ratio_den;

                for jd in [floor, floor + 1] {
                    if jd < j * FRACTION_SCALE || jd >= (j + 1) * FRACTION_SCALE {
                        continue;
                    }
                    let dividers = PllDividers {
                        r: 1,
                        j: j as u8,
                        d: (jd - j * FRACTION_SCALE) as u16,
                        p: p as u8,
                    };
                    if !self.accept(&dividers) {
                        continue;
                    }
                    // |jd / (P × 10⁴) − num / den| × den × 10⁴ = |jd × den − exact| / P
                    let error = (jd * ratio_den).abs_diff(exact);
                    let better = match best {
                        None => true,
                        Some((_, best_error, best_p)) => error * best_p < best_error * p,
                    };
                    if better {
                        best = Some((dividers, error, p));
                    }
                }
            }
        }

        best.map(|(dividers, _, _)| dividers)
    }
}

/// Find PLL coefficients that turn `master_clock_hz` into `N × sample_rate_hz`.
///
/// Exact integer ratios are tried first; otherwise the fractional mode is
/// searched for the closest representable ratio.
pub fn solve_pll(
    master_clock_hz: u32,
    sample_rate_hz: u32,
    word_length: WordLength,
) -> Result<PllCoefficients, SearchFailure> {
    let no_candidate = SearchFailure {
        last_rejection: None,
    };
    if master_clock_hz == 0 {
        return Err(no_candidate);
    }
    let Some(multiplier) = output_multiplier(sample_rate_hz, word_length) else {
        warn!("no PLL output multiplier for {} Hz", sample_rate_hz);
        return Err(no_candidate);
    };

    let target = u64::from(multiplier) * u64::from(sample_rate_hz);
    let mclk = u64::from(master_clock_hz);
    let g = gcd(target, mclk);
    let (ratio_num, ratio_den) = (target / g, mclk / g);

    let mut search = Search::new(master_clock_hz);
    let found = match search.integer(ratio_num, ratio_den) {
        Some(dividers) => Some(dividers),
        None => search.fractional(ratio_num, ratio_den),
    };
    let Some(dividers) = found else {
        warn!(
            "no PLL coefficients for {} Hz -> {} Hz",
            master_clock_hz,
            target
        );
        return Err(SearchFailure {
            last_rejection: search.last_rejection,
        });
    };

    let step = PLL_SCK_DIVIDER * 2 * word_length.bits();
    let coefficients = PllCoefficients {
        dividers,
        multiplier,
        output_hz: pll_output_hz(master_clock_hz, &dividers) as u32,
        bit_clock_divider: (multiplier / step - 1) as u8,
    };
    debug!(
        "pll R={} J={} D={} P={} -> {} Hz",
        dividers.r,
        dividers.j,
        dividers.d,
        dividers.p,
        coefficients.output_hz
    );
    Ok(coefficients)
}
