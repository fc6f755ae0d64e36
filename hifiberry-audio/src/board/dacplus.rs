//! HiFiBerry DAC+ / DAC+ Pro (PCM5122).
//!
//! The Pro carries two oscillators, one per sample-rate family, switched by
//! PCM512x GPIO6 (44.1 kHz family) and GPIO3 (48 kHz family); with a Pro
//! the DAC is I2S clock master. Plain DAC+ boards run the DAC as slave at a
//! fixed 64 × fs bit clock. GPIO4 drives the front LED on both.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::StreamParams;
use crate::codec::bus::PagedI2c;
use crate::codec::pcm512x as reg;
use crate::constants::{DACPRO_CLK44_HZ, DACPRO_CLK48_HZ};
use crate::control::RegisterProgrammer;

/// Settling time after switching oscillators before sampling clock detect.
const SCK_SETTLE_MS: u32 = 2;

/// Fixed BCK / LRCK ratio of a plain DAC+.
const DACPLUS_BCLK_RATIO: u32 = 64;

/// Largest LRCK divider the rate fraction may use.
const RATE_DEN_MAX: u32 = 128;

/// DAC+ Pro oscillator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProClock {
    /// Both oscillators off.
    None,
    /// 22.5792 MHz (44.1 kHz family).
    Clk44,
    /// 24.576 MHz (48 kHz family).
    Clk48,
}

impl ProClock {
    const fn gpio_bits(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Clk44 => reg::GPIO_CLK44_EN,
            Self::Clk48 => reg::GPIO_CLK48_EN,
        }
    }

    /// Oscillator frequency in Hz.
    pub const fn rate_hz(self) -> Option<u32> {
        match self {
            Self::None => None,
            Self::Clk44 => Some(DACPRO_CLK44_HZ),
            Self::Clk48 => Some(DACPRO_CLK48_HZ),
        }
    }
}

/// Oscillator for a sample rate: 44.1 kHz multiples use CLK44, all else CLK48.
pub const fn clock_for_rate(sample_rate_hz: u32) -> ProClock {
    match sample_rate_hz {
        11_025 | 22_050 | 44_100 | 88_200 | 176_400 => ProClock::Clk44,
        _ => ProClock::Clk48,
    }
}

/// Index of a standard sample rate (8 kHz → 0 … 192 kHz → 10).
pub const fn sample_rate_index(sample_rate_hz: u32) -> Option<u8> {
    match sample_rate_hz {
        8_000 => Some(0),
        11_025 => Some(1),
        16_000 => Some(2),
        22_050 => Some(3),
        32_000 => Some(4),
        44_100 => Some(5),
        48_000 => Some(6),
        88_200 => Some(7),
        96_000 => Some(8),
        176_400 => Some(9),
        192_000 => Some(10),
        _ => None,
    }
}

/// Exact sample rate `num / den` in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RateFraction {
    pub num: u32,
    pub den: u32,
}

/// Closest rate reachable from `sclk_hz` with a 64 × fs bit clock.
///
/// `num` is `sclk_hz / 64`, `den` the divider in `1..=128` nearest to the
/// requested rate (smallest divider on ties).
pub fn rate_fraction(sclk_hz: u32, sample_rate_hz: u32) -> Option<RateFraction> {
    let num = sclk_hz / 64;
    if num == 0 || sample_rate_hz == 0 {
        return None;
    }
    let error = |den: u32| u64::from(num).abs_diff(u64::from(sample_rate_hz) * u64::from(den));

    let mut best = 1;
    for den in 2..=RATE_DEN_MAX {
        // |num/den − fs| = error(den) / den
        if error(den) * u64::from(best) < error(best) * u64::from(den) {
            best = den;
        }
    }
    Some(RateFraction { num, den: best })
}

/// Result of [`DacPlus::hw_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DacHwParams {
    /// BCK / LRCK ratio the host I2S controller must use.
    pub bclk_ratio: u32,
    /// Selected oscillator frequency (Pro only).
    pub master_clock_hz: Option<u32>,
    /// Exact achievable rate (Pro only).
    pub rate: Option<RateFraction>,
    /// Standard rate index, `None` for non-standard rates.
    pub rate_index: Option<u8>,
}

/// HiFiBerry DAC+ / DAC+ Pro board.
pub struct DacPlus<I2C, D> {
    bus: PagedI2c<I2C>,
    delay: D,
    pro: bool,
}

impl<I2C, D> DacPlus<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create the board driver with the PCM5122 at its usual address (0x4D).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::new_with_address(i2c, delay, reg::I2C_ADDR)
    }

    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            bus: PagedI2c::new(i2c, address),
            delay,
            pro: false,
        }
    }

    /// Whether [`init`](Self::init) found the Pro oscillators.
    pub fn is_pro(&self) -> bool {
        self.pro
    }

    /// Release the I2C bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }

    /// Detect the board variant and set up master mode and the LED.
    ///
    /// Returns whether a Pro was found.
    pub fn init(&mut self) -> Result<bool, I2C::Error> {
        self.pro = self.detect_pro()?;
        if self.pro {
            info!("dacplus: Pro oscillators found, DAC is clock master");
            self.bus.update_bits(
                reg::BCLK_LRCLK_CFG,
                reg::BCLK_LRCLK_OUTPUTS_MASK,
                reg::BCLK_LRCLK_OUTPUTS,
            )?;
            self.bus.update_bits(
                reg::MASTER_MODE,
                reg::MASTER_MODE_RELEASE,
                reg::MASTER_MODE_RELEASE,
            )?;
            self.bus.update_bits(
                reg::MASTER_CLKDIV_2,
                reg::MASTER_CLKDIV_2_MASK,
                (DACPLUS_BCLK_RATIO - 1) as u8,
            )?;
        } else {
            info!("dacplus: no oscillators, DAC is clock slave");
        }

        self.bus.update_bits(reg::GPIO_EN, reg::GPIO_LED, reg::GPIO_LED)?;
        self.bus.update_bits(
            reg::GPIO_OUTPUT_4,
            reg::GPIO_OUTPUT_MASK,
            reg::GPIO_OUTPUT_REGISTER,
        )?;
        self.set_led(true)?;
        Ok(self.pro)
    }

    /// Probe for the Pro oscillators.
    ///
    /// A Pro shows a clock with either oscillator enabled and none with
    /// both disabled.
    pub fn detect_pro(&mut self) -> Result<bool, I2C::Error> {
        self.bus
            .update_bits(reg::GPIO_EN, reg::GPIO_CLK_MASK, reg::GPIO_CLK_MASK)?;
        self.bus.update_bits(
            reg::GPIO_OUTPUT_3,
            reg::GPIO_OUTPUT_MASK,
            reg::GPIO_OUTPUT_REGISTER,
        )?;
        self.bus.update_bits(
            reg::GPIO_OUTPUT_6,
            reg::GPIO_OUTPUT_MASK,
            reg::GPIO_OUTPUT_REGISTER,
        )?;

        let clk44 = self.sck_present_with(ProClock::Clk44)?;
        let none = self.sck_present_with(ProClock::None)?;
        let clk48 = self.sck_present_with(ProClock::Clk48)?;
        debug!("dacplus: sck 44k={} none={} 48k={}", clk44, none, clk48);
        Ok(clk44 && clk48 && !none)
    }

    /// Enable one oscillator (or none).
    pub fn select_clock(&mut self, clock: ProClock) -> Result<(), I2C::Error> {
        self.bus
            .update_bits(reg::GPIO_CONTROL_1, reg::GPIO_CLK_MASK, clock.gpio_bits())
    }

    /// Whether the DAC currently sees a clock on SCK.
    pub fn sck_present(&mut self) -> Result<bool, I2C::Error> {
        Ok(self.bus.read(reg::RATE_DET_4)? & reg::RATE_DET_4_SCK_MISSING == 0)
    }

    fn sck_present_with(&mut self, clock: ProClock) -> Result<bool, I2C::Error> {
        self.select_clock(clock)?;
        self.delay.delay_ms(SCK_SETTLE_MS);
        self.sck_present()
    }

    /// Set up clocks for a stream.
    pub fn hw_params(&mut self, params: &StreamParams) -> Result<DacHwParams, I2C::Error> {
        let rate_index = sample_rate_index(params.sample_rate_hz);
        if !self.pro {
            return Ok(DacHwParams {
                bclk_ratio: DACPLUS_BCLK_RATIO,
                master_clock_hz: None,
                rate: None,
                rate_index,
            });
        }

        let clock = clock_for_rate(params.sample_rate_hz);
        self.select_clock(clock)?;
        let master_clock_hz = clock.rate_hz();
        let rate = master_clock_hz.and_then(|sclk| rate_fraction(sclk, params.sample_rate_hz));
        debug!(
            "dacplus: {} Hz from {} Hz oscillator",
            params.sample_rate_hz,
            master_clock_hz.unwrap_or(0)
        );
        Ok(DacHwParams {
            bclk_ratio: params.bits_per_sample * params.channels,
            master_clock_hz,
            rate,
            rate_index,
        })
    }

    /// Load DSP program 5 under a standby request and turn the LED on.
    pub fn startup(&mut self) -> Result<(), I2C::Error> {
        self.bus
            .update_bits(reg::POWER, reg::POWER_RQST, reg::POWER_RQST)?;
        self.bus
            .update_bits(reg::DSP_PROGRAM, reg::DSP_PROGRAM_MASK, 5)?;
        self.bus.update_bits(reg::POWER, reg::POWER_RQST, 0)?;
        self.set_led(true)
    }

    /// Turn the LED off.
    pub fn shutdown(&mut self) -> Result<(), I2C::Error> {
        self.set_led(false)
    }

    pub fn set_led(&mut self, on: bool) -> Result<(), I2C::Error> {
        let value = if on { reg::GPIO_LED } else { 0 };
        self.bus
            .update_bits(reg::GPIO_CONTROL_1, reg::GPIO_LED, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::mock::{plain, MockDelay, MockI2c};

    /// DAC+ Pro: SCK present whenever an oscillator is enabled.
    fn pro_card(m: &MockI2c, register: u16, stored: u8) -> u8 {
        if register != reg::RATE_DET_4 {
            return stored;
        }
        if m.read_reg(reg::GPIO_CONTROL_1) & reg::GPIO_CLK_MASK != 0 {
            stored & !reg::RATE_DET_4_SCK_MISSING
        } else {
            stored | reg::RATE_DET_4_SCK_MISSING
        }
    }

    /// Plain DAC+: never any SCK.
    fn no_clock(_: &MockI2c, register: u16, stored: u8) -> u8 {
        if register == reg::RATE_DET_4 {
            stored | reg::RATE_DET_4_SCK_MISSING
        } else {
            stored
        }
    }

    fn board(status: crate::codec::mock::StatusFn) -> DacPlus<MockI2c, MockDelay> {
        DacPlus::new(MockI2c::new(0, status), MockDelay::new())
    }

    // ── Pure helpers ──────────────────────────────────────────────────

    #[test]
    fn clock_family() {
        for rate in [11_025, 22_050, 44_100, 88_200, 176_400] {
            assert_eq!(clock_for_rate(rate), ProClock::Clk44);
        }
        for rate in [8_000, 16_000, 32_000, 48_000, 96_000, 192_000, 12_345] {
            assert_eq!(clock_for_rate(rate), ProClock::Clk48);
        }
        assert_eq!(ProClock::Clk44.rate_hz(), Some(22_579_200));
        assert_eq!(ProClock::Clk48.rate_hz(), Some(24_576_000));
        assert_eq!(ProClock::None.rate_hz(), None);
    }

    #[test]
    fn rate_indices() {
        assert_eq!(sample_rate_index(8_000), Some(0));
        assert_eq!(sample_rate_index(44_100), Some(5));
        assert_eq!(sample_rate_index(48_000), Some(6));
        assert_eq!(sample_rate_index(192_000), Some(10));
        assert_eq!(sample_rate_index(64_000), None);
    }

    #[test]
    fn exact_rate_fractions() {
        assert_eq!(
            rate_fraction(24_576_000, 48_000),
            Some(RateFraction { num: 384_000, den: 8 })
        );
        assert_eq!(
            rate_fraction(22_579_200, 44_100),
            Some(RateFraction { num: 352_800, den: 8 })
        );
        assert_eq!(rate_fraction(24_576_000, 8_000).unwrap().den, 48);
        assert_eq!(rate_fraction(24_576_000, 192_000).unwrap().den, 2);
    }

    #[test]
    fn nearest_rate_fraction() {
        // 384 000 / 9 = 42 667 is closer to 44 100 than 384 000 / 8
        assert_eq!(rate_fraction(24_576_000, 44_100).unwrap().den, 9);
        // Below num / 128 the largest divider wins
        assert_eq!(rate_fraction(24_576_000, 1_000).unwrap().den, 128);
        assert_eq!(rate_fraction(24_576_000, 0), None);
        assert_eq!(rate_fraction(63, 48_000), None);
    }

    // ── Detection and init ────────────────────────────────────────────

    #[test]
    fn detects_pro() {
        let mut dac = board(pro_card);
        assert!(dac.init().unwrap());
        assert!(dac.is_pro());

        let (i2c, delay) = dac.release();
        assert_eq!(delay.ms(), 6);
        assert_eq!(i2c.read_reg(reg::BCLK_LRCLK_CFG), 0x11);
        assert_eq!(i2c.read_reg(reg::MASTER_MODE), 0x03);
        assert_eq!(i2c.read_reg(reg::MASTER_CLKDIV_2), 63);
        assert_eq!(i2c.read_reg(reg::GPIO_EN), 0x2C);
        assert_eq!(i2c.read_reg(reg::GPIO_OUTPUT_3), 0x02);
        assert_eq!(i2c.read_reg(reg::GPIO_OUTPUT_4), 0x02);
        assert_eq!(i2c.read_reg(reg::GPIO_OUTPUT_6), 0x02);
        // 48k oscillator left running, LED on
        assert_eq!(i2c.read_reg(reg::GPIO_CONTROL_1), 0x0C);
        assert_eq!(i2c.unflagged, 0);
    }

    #[test]
    fn detection_sequence() {
        let mut dac = board(pro_card);
        dac.detect_pro().unwrap();
        let (i2c, _) = dac.release();
        assert_eq!(i2c.write_at(0), (reg::GPIO_EN, 0x24));
        assert_eq!(i2c.write_at(3), (reg::GPIO_CONTROL_1, 0x20));
        assert_eq!(i2c.write_at(4), (reg::GPIO_CONTROL_1, 0x00));
        assert_eq!(i2c.write_at(5), (reg::GPIO_CONTROL_1, 0x04));
        assert_eq!(i2c.log_count, 6);
    }

    #[test]
    fn plain_dacplus_without_clock() {
        let mut dac = board(no_clock);
        assert!(!dac.init().unwrap());
        let (i2c, _) = dac.release();
        assert_eq!(i2c.writes_to(reg::MASTER_MODE), 0);
        assert_eq!(i2c.read_reg(reg::GPIO_CONTROL_1) & reg::GPIO_LED, reg::GPIO_LED);
    }

    #[test]
    fn external_clock_is_not_pro() {
        // SCK visible even with both oscillators off
        let mut dac = board(plain);
        assert!(!dac.init().unwrap());
    }

    // ── Stream setup ──────────────────────────────────────────────────

    #[test]
    fn pro_hw_params_44k1() {
        let mut dac = board(pro_card);
        dac.init().unwrap();
        let hw = dac.hw_params(&StreamParams::stereo(44_100, 24)).unwrap();
        assert_eq!(hw.bclk_ratio, 48);
        assert_eq!(hw.master_clock_hz, Some(22_579_200));
        assert_eq!(hw.rate, Some(RateFraction { num: 352_800, den: 8 }));
        assert_eq!(hw.rate_index, Some(5));

        let (i2c, _) = dac.release();
        assert_eq!(
            i2c.read_reg(reg::GPIO_CONTROL_1) & reg::GPIO_CLK_MASK,
            reg::GPIO_CLK44_EN
        );
    }

    #[test]
    fn plain_hw_params() {
        let mut dac = board(no_clock);
        dac.init().unwrap();
        let hw = dac.hw_params(&StreamParams::stereo(96_000, 16)).unwrap();
        assert_eq!(
            hw,
            DacHwParams {
                bclk_ratio: 64,
                master_clock_hz: None,
                rate: None,
                rate_index: Some(8),
            }
        );
    }

    #[test]
    fn startup_and_shutdown() {
        let mut dac = board(no_clock);
        dac.startup().unwrap();
        assert_eq!(dac.bus.read(reg::DSP_PROGRAM).unwrap(), 5);
        dac.shutdown().unwrap();

        let (i2c, _) = dac.release();
        let request = i2c
            .position(|(r, v)| r == reg::POWER && v == reg::POWER_RQST)
            .unwrap();
        let program = i2c.position(|(r, _)| r == reg::DSP_PROGRAM).unwrap();
        assert!(request < program);
        assert_eq!(i2c.read_reg(reg::POWER), 0);
        assert_eq!(i2c.read_reg(reg::GPIO_CONTROL_1) & reg::GPIO_LED, 0);
    }
}
