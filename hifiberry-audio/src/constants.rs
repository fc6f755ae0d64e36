/// Master clock of the HiFiBerry ADC board (fixed on-board oscillator).
pub const ADC_MASTER_CLOCK_HZ: u32 = 24_576_000;

/// DAC+ Pro oscillator for the 44.1 kHz family (CLK44EN, GPIO6).
pub const DACPRO_CLK44_HZ: u32 = 22_579_200;

/// DAC+ Pro oscillator for the 48 kHz family (CLK48EN, GPIO3).
pub const DACPRO_CLK48_HZ: u32 = 24_576_000;

/// Lowest PLL output frequency the PCM186x can lock to.
pub const PLL_OUTPUT_MIN_HZ: u32 = 64_000_000;

/// Highest PLL output frequency the PCM186x can lock to.
pub const PLL_OUTPUT_MAX_HZ: u32 = 100_000_000;

/// Upper bound of `PLL_IN / P`.
pub const PLL_INPUT_DIVIDER_MAX_HZ: u32 = 20_000_000;

/// Lower bound of `PLL_IN / P` when the PLL runs in integer mode (D = 0).
pub const PLL_INPUT_DIVIDER_MIN_HZ: u32 = 1_000_000;

/// Lower bound of `PLL_IN / P` when the PLL runs in fractional mode (D != 0).
pub const PLL_FRACTIONAL_INPUT_DIVIDER_MIN_HZ: u32 = 6_667_000;

/// Fixed PLL → SCK post-divider used whenever the PLL drives the system clock.
pub const PLL_SCK_DIVIDER: u32 = 8;

/// Largest SCK → BCK ratio the 7-bit divider field can hold.
pub const MAX_BIT_CLOCK_RATIO: u32 = 128;
