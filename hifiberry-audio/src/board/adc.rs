//! HiFiBerry ADC: PCM186x clocked from a fixed 24.576 MHz oscillator,
//! codec is I2S clock master.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::StreamParams;
use crate::clock::ClockConfig;
use crate::codec::{ClockRole, DaiFormat, Error, InterfaceFormat, Pcm186x};
use crate::constants::ADC_MASTER_CLOCK_HZ;

/// Result of [`HifiberryAdc::hw_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcHwParams {
    /// BCK / LRCK ratio the host I2S controller must expect.
    pub bclk_ratio: u32,
    /// Clock configuration programmed into the codec.
    pub clocks: ClockConfig,
}

/// HiFiBerry ADC board.
pub struct HifiberryAdc<I2C, D> {
    codec: Pcm186x<I2C, D>,
}

impl<I2C, D> HifiberryAdc<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// I2S, codec provides BCK and LRCK.
    pub const DAI_FORMAT: DaiFormat = DaiFormat::new(InterfaceFormat::I2s, ClockRole::Master);

    pub fn new(codec: Pcm186x<I2C, D>) -> Self {
        Self { codec }
    }

    /// Put the codec into the board's interface format.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        info!("hifiberry-adc: init");
        self.codec.set_dai_format(Self::DAI_FORMAT)
    }

    /// Configure the codec for a stream.
    pub fn hw_params(&mut self, params: &StreamParams) -> Result<AdcHwParams, Error<I2C::Error>> {
        self.codec.set_sysclk(ADC_MASTER_CLOCK_HZ);
        let clocks = self
            .codec
            .configure_clocks(params.sample_rate_hz, params.bits_per_sample)?;
        Ok(AdcHwParams {
            bclk_ratio: params.bits_per_sample * 2,
            clocks,
        })
    }

    pub fn codec(&mut self) -> &mut Pcm186x<I2C, D> {
        &mut self.codec
    }

    /// Release the codec driver.
    pub fn release(self) -> Pcm186x<I2C, D> {
        self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockError, ClockSource};
    use crate::codec::mock::{MockDelay, MockI2c};
    use crate::codec::registers as reg;

    fn pll_locking(_: &MockI2c, register: u16, stored: u8) -> u8 {
        if register == reg::PLL_STATUS && stored & reg::PLL_STATUS_EN != 0 {
            stored | reg::PLL_STATUS_LOCKED
        } else {
            stored
        }
    }

    fn make_board() -> HifiberryAdc<MockI2c, MockDelay> {
        let codec = Pcm186x::new(MockI2c::new(reg::ADDRESS_FLAG, pll_locking), MockDelay::new());
        let mut board = HifiberryAdc::new(codec);
        board.init().unwrap();
        board
    }

    #[test]
    fn init_makes_codec_master() {
        let board = make_board();
        let (i2c, _) = board.release().release();
        assert_eq!(i2c.read_reg(reg::CLK_SELECT), reg::CLK_SELECT_MST_MODE);
        assert_eq!(i2c.read_reg(reg::PCM_FORMAT) & reg::PCM_FORMAT_FMT_MASK, 0);
    }

    #[test]
    fn hw_params_48k_16bit_direct() {
        let mut board = make_board();
        let hw = board.hw_params(&StreamParams::stereo(48_000, 16)).unwrap();
        assert_eq!(hw.bclk_ratio, 32);
        assert_eq!(hw.clocks.source, ClockSource::MasterClock);
        assert_eq!(hw.clocks.bit_clock_divider, 15);
        assert_eq!(board.codec().sysclk(), ADC_MASTER_CLOCK_HZ);
    }

    #[test]
    fn hw_params_44k1_24bit_pll() {
        let mut board = make_board();
        let hw = board.hw_params(&StreamParams::stereo(44_100, 24)).unwrap();
        assert_eq!(hw.bclk_ratio, 48);
        assert_eq!(hw.clocks.source, ClockSource::Pll);

        let (i2c, _) = board.release().release();
        assert_eq!(i2c.read_reg(reg::PLL_J_DIVIDER), 5);
        assert_ne!(i2c.read_reg(reg::CLK_SELECT) & reg::CLK_SELECT_MST_MODE, 0);
    }

    #[test]
    fn hw_params_rejects_32bit() {
        let mut board = make_board();
        assert_eq!(
            board.hw_params(&StreamParams::stereo(48_000, 32)),
            Err(Error::Clock(ClockError::InvalidBitWidth(32)))
        );
    }
}
