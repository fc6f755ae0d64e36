//! PCM512x register addresses used by the HiFiBerry DAC+ boards.
//!
//! Same virtual paging scheme as the PCM186x map (see
//! [`registers::page_base`](super::registers::page_base)); unlike the
//! PCM186x the address byte carries no flag.

use super::registers::page_base;

/// I2C address of the PCM5122 on the HiFiBerry DAC+ boards.
pub const I2C_ADDR: u8 = 0x4D;

/// Standby / power-down requests.
/// - Bit 4 — RQST (standby request)
/// - Bit 0 — RQPD (power-down request)
pub const POWER: u16 = page_base(0) + 2;
pub const GPIO_EN: u16 = page_base(0) + 8;
/// BCK/LRCK direction and polarity.
/// - Bit 5 — BCKP
/// - Bit 4 — BCKO (BCK output)
/// - Bit 0 — LRKO (LRCK output)
pub const BCLK_LRCLK_CFG: u16 = page_base(0) + 9;
/// Master-mode divider reset release.
/// - Bit 1 — RBCK
/// - Bit 0 — RLRK
pub const MASTER_MODE: u16 = page_base(0) + 12;
pub const MASTER_CLKDIV_1: u16 = page_base(0) + 32;
/// BCK → LRCK divider, zero-based.
pub const MASTER_CLKDIV_2: u16 = page_base(0) + 33;
/// DSP program (filter) selection, bits 4:0.
pub const DSP_PROGRAM: u16 = page_base(0) + 43;
pub const GPIO_OUTPUT_3: u16 = page_base(0) + 82;
pub const GPIO_OUTPUT_4: u16 = page_base(0) + 83;
pub const GPIO_OUTPUT_6: u16 = page_base(0) + 85;
/// GPIO output levels, one bit per GPIO (bit n−1 = GPIOn).
pub const GPIO_CONTROL_1: u16 = page_base(0) + 86;
/// Clock detection.
/// - Bit 6 — SCK missing
pub const RATE_DET_4: u16 = page_base(0) + 94;

pub const POWER_RQST: u8 = 1 << 4;
pub const BCLK_LRCLK_OUTPUTS_MASK: u8 = 0x31;
pub const BCLK_LRCLK_OUTPUTS: u8 = 0x11;
pub const MASTER_MODE_RELEASE: u8 = 0x03;
pub const MASTER_CLKDIV_2_MASK: u8 = 0x7F;
pub const DSP_PROGRAM_MASK: u8 = 0x1F;
/// GPIO output source: register GPIO_CONTROL_1.
pub const GPIO_OUTPUT_REGISTER: u8 = 0x02;
pub const GPIO_OUTPUT_MASK: u8 = 0x0F;
pub const RATE_DET_4_SCK_MISSING: u8 = 1 << 6;

/// GPIO3: 48 kHz family oscillator enable.
pub const GPIO_CLK48_EN: u8 = 1 << 2;
/// GPIO4: front LED.
pub const GPIO_LED: u8 = 1 << 3;
/// GPIO6: 44.1 kHz family oscillator enable.
pub const GPIO_CLK44_EN: u8 = 1 << 5;
pub const GPIO_CLK_MASK: u8 = GPIO_CLK44_EN | GPIO_CLK48_EN;
