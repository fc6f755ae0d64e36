//! PCM186x register addresses and bitfield definitions.
//!
//! Registers are 8-bit and paged: register 0 of every page selects the page.
//! Addresses here are *virtual*: `0x100 + page × 0x100 + offset`, so a
//! single `u16` identifies any register on any page (see [`page_base`]).

// Parts of the map (signal detect, aux ADC, interrupts) are listed for
// completeness but not driven yet.
#![allow(dead_code)]

// ── I2C addresses ──────────────────────────────────────────────────────────

/// Default I2C address (ADR pin low), as wired on the HiFiBerry ADC.
pub const I2C_ADDR_LOW: u8 = 0x4A;

/// Alternate I2C address (ADR pin high).
pub const I2C_ADDR_HIGH: u8 = 0x4B;

/// Register address flag the PCM186x regmap sets on every transfer.
pub const ADDRESS_FLAG: u8 = 0x80;

// ── Paging ─────────────────────────────────────────────────────────────────

/// First virtual address.
pub const VIRT_BASE: u16 = 0x100;

/// Registers per page.
pub const PAGE_LEN: u16 = 0x100;

/// Page-select register (offset 0 on every page).
pub const PAGE_SELECT: u8 = 0x00;

/// Virtual base address of `page`.
pub const fn page_base(page: u8) -> u16 {
    VIRT_BASE + PAGE_LEN * page as u16
}

/// Highest virtual address (page 253, offset 64).
pub const MAX_REGISTER: u16 = page_base(253) + 64;

// ── Page 0: gain and input routing ─────────────────────────────────────────

pub const PGA_VAL_CH1_L: u16 = page_base(0) + 1;
pub const PGA_VAL_CH1_R: u16 = page_base(0) + 2;
pub const PGA_VAL_CH2_L: u16 = page_base(0) + 3;
pub const PGA_VAL_CH2_R: u16 = page_base(0) + 4;
pub const PGA_CLIP_CONTROL: u16 = page_base(0) + 5;
pub const ADC1_INPUT_SELECT_L: u16 = page_base(0) + 6;
pub const ADC1_INPUT_SELECT_R: u16 = page_base(0) + 7;
pub const ADC2_INPUT_SELECT_L: u16 = page_base(0) + 8;
pub const ADC2_INPUT_SELECT_R: u16 = page_base(0) + 9;
pub const ADC2_INPUT_CHANNEL: u16 = page_base(0) + 10;

// ── Page 0: audio interface ────────────────────────────────────────────────

/// PCM audio format.
/// - Bits 7:6 — RX_WLEN (0=32, 1=24, 2=20, 3=16 bit)
/// - Bit    4 — TDM_LRCLK_MODE
/// - Bits 3:2 — TX_WLEN (0=32, 1=24, 2=20, 3=16 bit)
/// - Bits 1:0 — FMT (0=I2S, 1=left-justified, 2=right-justified, 3=TDM/DSP)
pub const PCM_FORMAT: u16 = page_base(0) + 11;
pub const TDM_SELECT: u16 = page_base(0) + 12;
pub const TX_TDM_OFFSET: u16 = page_base(0) + 13;
pub const RX_TDM_OFFSET: u16 = page_base(0) + 14;

pub const PCM_FORMAT_WLEN_MASK: u8 = 0xCC;
pub const PCM_FORMAT_WLEN_16: u8 = 0xCC;
pub const PCM_FORMAT_WLEN_24: u8 = 0x44;
pub const PCM_FORMAT_FMT_MASK: u8 = 0x03;
pub const PCM_FORMAT_FMT_I2S: u8 = 0x00;
pub const PCM_FORMAT_FMT_LEFT_J: u8 = 0x01;
pub const PCM_FORMAT_FMT_RIGHT_J: u8 = 0x02;
pub const PCM_FORMAT_FMT_TDM: u8 = 0x03;

// ── Page 0: digital gain and GPIO ──────────────────────────────────────────

pub const DPGA_VAL_CH1_L: u16 = page_base(0) + 15;
pub const GPIO_0_AND_1_CTRL: u16 = page_base(0) + 16;
pub const GPIO_2_AND_3_CTRL: u16 = page_base(0) + 17;
pub const GPIO_0_AND_1_DIR: u16 = page_base(0) + 18;
pub const GPIO_2_AND_3_DIR: u16 = page_base(0) + 19;
pub const GPIO_STATE: u16 = page_base(0) + 20;
pub const GPIO_PULL_DOWN: u16 = page_base(0) + 21;
pub const DPGA_VAL_CH1_R: u16 = page_base(0) + 22;
pub const DPGA_VAL_CH2_L: u16 = page_base(0) + 23;
pub const DPGA_VAL_CH2_R: u16 = page_base(0) + 24;
pub const PGA_GAIN_MAP: u16 = page_base(0) + 25;
pub const DIGMIC_INPUT: u16 = page_base(0) + 26;
pub const DIN_RESAMPLE: u16 = page_base(0) + 27;

// ── Page 0: clocking ───────────────────────────────────────────────────────

/// Clock mode / source selection.
/// - Bits 7:6 — SCK_XI_SEL
/// - Bit    5 — MST_SCK_SRC (0=SCK, 1=PLL)
/// - Bit    4 — MST_MODE (0=slave, 1=master)
/// - Bit    3 — ADC_CLK_SRC (0=SCK, 1=PLL)
/// - Bit    2 — DSP2_CLK_SRC (0=SCK, 1=PLL)
/// - Bit    1 — DSP1_CLK_SRC (0=SCK, 1=PLL)
/// - Bit    0 — CLKDET_EN
pub const CLK_SELECT: u16 = page_base(0) + 32;
pub const DSP1_CLK_DIVIDER: u16 = page_base(0) + 33;
pub const DSP2_CLK_DIVIDER: u16 = page_base(0) + 34;
pub const ADC_CLK_DIVIDER: u16 = page_base(0) + 35;

pub const CLK_SELECT_MST_MODE: u8 = 1 << 4;
/// Every clock-domain source bit (master SCK, ADC, DSP1, DSP2).
pub const CLK_SELECT_SRC_MASK: u8 = (1 << 5) | (1 << 3) | (1 << 2) | (1 << 1);
/// All clock domains driven from the PLL.
pub const CLK_SELECT_SRC_PLL: u8 = CLK_SELECT_SRC_MASK;

/// PLL → SCK divider, zero-based (reset value 7 = ÷8).
pub const PLL_SCK_DIVIDER: u16 = page_base(0) + 37;

/// SCK → BCK divider, zero-based (bits 6:0).
pub const SCK_TO_BCK_DIVIDER: u16 = page_base(0) + 38;

/// BCK → LRCK divider, zero-based.
pub const SCK_TO_LRCK_DIVIDER: u16 = page_base(0) + 39;

/// PLL control / status.
/// - Bit 4 — PLL_REF_SEL (0=SCK)
/// - Bit 1 — PLL_LCK (read-only)
/// - Bit 0 — PLL_EN
pub const PLL_STATUS: u16 = page_base(0) + 40;
pub const PLL_P_DIVIDER: u16 = page_base(0) + 41;
pub const PLL_R_DIVIDER: u16 = page_base(0) + 42;
pub const PLL_J_DIVIDER: u16 = page_base(0) + 43;
pub const PLL_D1_DIVIDER: u16 = page_base(0) + 44;
pub const PLL_D2_DIVIDER: u16 = page_base(0) + 45;

pub const PLL_STATUS_EN: u8 = 1 << 0;
pub const PLL_STATUS_LOCKED: u8 = 1 << 1;
pub const PLL_P_MASK: u8 = 0x7F;
pub const PLL_R_MASK: u8 = 0x0F;
pub const PLL_J_MASK: u8 = 0x3F;
pub const PLL_D_MSB_MASK: u8 = 0x3F;

// ── Page 0: signal detect ──────────────────────────────────────────────────

pub const SIGDET_CHANNELS: u16 = page_base(0) + 48;
pub const SIGDET_INTR_MASK: u16 = page_base(0) + 49;
pub const SIGDET_STATUS: u16 = page_base(0) + 50;
pub const SIGDET_LOSS_TIME: u16 = page_base(0) + 52;
pub const SIGDET_SCAN_TIME: u16 = page_base(0) + 53;
pub const SIGDET_INT_INTVL: u16 = page_base(0) + 54;
pub const SIGDET_DC_REF_CH1_L: u16 = page_base(0) + 64;
pub const SIGDET_DC_LEVEL_CH4_R: u16 = page_base(0) + 87;

// ── Page 0: aux ADC, interrupts, power, status ─────────────────────────────

pub const AUXADC_DATA_CTRL: u16 = page_base(0) + 88;
pub const AUXADC_DATA_LSB: u16 = page_base(0) + 89;
pub const AUXADC_DATA_MSB: u16 = page_base(0) + 90;
pub const INTR_MASK: u16 = page_base(0) + 96;
pub const INTR_STATUS: u16 = page_base(0) + 97;
pub const INTR_PROPERTIES: u16 = page_base(0) + 98;

/// Power control.
/// - Bit 2 — PWRDN
/// - Bit 1 — SLEEP
/// - Bit 0 — STBY (analog + digital standby, no clocks generated)
pub const POWER_CTRL: u16 = page_base(0) + 112;
pub const DSP_CTRL: u16 = page_base(0) + 113;
pub const DEVICE_STATUS: u16 = page_base(0) + 114;
pub const CURRENT_FREQUENCY: u16 = page_base(0) + 115;
pub const CURRENT_CLK_RATIO: u16 = page_base(0) + 116;
pub const CLK_STATUS: u16 = page_base(0) + 117;
pub const DVDD_STATUS: u16 = page_base(0) + 120;

pub const POWER_CTRL_STBY: u8 = 1 << 0;

// ── Reset defaults ─────────────────────────────────────────────────────────

/// Reset values of the writable page-0 registers.
pub const DEFAULTS: &[(u16, u8)] = &[
    (PGA_VAL_CH1_L, 0x00),
    (PGA_VAL_CH1_R, 0x00),
    (PGA_VAL_CH2_L, 0x00),
    (PGA_VAL_CH2_R, 0x00),
    (PGA_CLIP_CONTROL, 0x86),
    (ADC1_INPUT_SELECT_L, 0x41),
    (ADC1_INPUT_SELECT_R, 0x41),
    (ADC2_INPUT_SELECT_L, 0x42),
    (ADC2_INPUT_SELECT_R, 0x42),
    (ADC2_INPUT_CHANNEL, 0x00),
    (PCM_FORMAT, 0x44),
    (TDM_SELECT, 0x00),
    (TX_TDM_OFFSET, 0x00),
    (RX_TDM_OFFSET, 0x00),
    (DPGA_VAL_CH1_L, 0x00),
    (GPIO_0_AND_1_CTRL, 0x01),
    (GPIO_2_AND_3_CTRL, 0x20),
    (GPIO_0_AND_1_DIR, 0x00),
    (GPIO_2_AND_3_DIR, 0x00),
    (GPIO_STATE, 0x00),
    (GPIO_PULL_DOWN, 0x00),
    (DPGA_VAL_CH1_R, 0x00),
    (DPGA_VAL_CH2_L, 0x00),
    (DPGA_VAL_CH2_R, 0x00),
    (CLK_SELECT, 0x01),
    (DSP1_CLK_DIVIDER, 0x01),
    (DSP2_CLK_DIVIDER, 0x01),
    (ADC_CLK_DIVIDER, 0x03),
    (PLL_SCK_DIVIDER, 0x07),
    (PLL_P_DIVIDER, 0x00),
    (PLL_R_DIVIDER, 0x00),
    (PLL_J_DIVIDER, 0x01),
    (PLL_D1_DIVIDER, 0x00),
    (PLL_D2_DIVIDER, 0x00),
];

/// Registers whose value the chip changes on its own (never cache these).
pub const fn is_volatile(register: u16) -> bool {
    matches!(
        register,
        GPIO_STATE
            | PLL_STATUS
            | SIGDET_STATUS
            | AUXADC_DATA_CTRL
            | INTR_STATUS
            | DEVICE_STATUS
            | CURRENT_FREQUENCY
            | CURRENT_CLK_RATIO
            | CLK_STATUS
            | DVDD_STATUS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_addresses() {
        assert_eq!(page_base(0), 0x100);
        assert_eq!(page_base(1), 0x200);
        assert_eq!(CLK_SELECT, 0x120);
        assert_eq!(PLL_STATUS, 0x128);
        assert_eq!(POWER_CTRL, 0x170);
        assert_eq!(MAX_REGISTER, 0xFE40);
    }

    #[test]
    fn volatile_classification() {
        assert!(is_volatile(PLL_STATUS));
        assert!(is_volatile(CLK_STATUS));
        assert!(!is_volatile(PLL_J_DIVIDER));
        assert!(!is_volatile(PCM_FORMAT));
    }

    #[test]
    fn defaults_are_not_volatile_except_gpio_state() {
        for &(register, _) in DEFAULTS {
            assert!(!is_volatile(register) || register == GPIO_STATE);
        }
    }
}
