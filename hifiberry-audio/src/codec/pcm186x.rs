//! PCM186x ADC driver.
//!
//! Driver for the TI PCM1861/1863/1865 stereo/quad ADCs used on the
//! HiFiBerry ADC boards. Generic over any [`embedded_hal::i2c::I2c`] and
//! [`embedded_hal::delay::DelayNs`] implementation; the delay is only used
//! while waiting for the PLL to lock.
//!
//! # Example
//!
//! ```ignore
//! let mut adc = Pcm186x::new(i2c, delay);
//! adc.restore_defaults()?;
//! adc.set_dai_format(DaiFormat::new(InterfaceFormat::I2s, ClockRole::Master))?;
//! adc.set_sysclk(24_576_000);
//! adc.configure_clocks(44_100, 24)?;    // PLL, 67.7376 MHz
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::bus::PagedI2c;
use super::registers as reg;
use crate::clock::{setup_clocks, ClockConfig, ClockError, ClockRequest};
use crate::control::RegisterProgrammer;

/// PLL lock polls before giving up.
const PLL_LOCK_POLLS: u32 = 10;

/// Interval between PLL lock polls.
const PLL_LOCK_POLL_MS: u32 = 1;

// ── Errors ─────────────────────────────────────────────────────────────────

/// PCM186x driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C transfer failed.
    Bus(E),
    /// No clock configuration for the requested stream.
    Clock(ClockError),
    /// PLL enabled but never reported lock.
    PllUnlocked,
}

impl<E> From<ClockError> for Error<E> {
    fn from(e: ClockError) -> Self {
        Self::Clock(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "I2C bus error: {e:?}"),
            Self::Clock(e) => write!(f, "clock setup failed: {e}"),
            Self::PllUnlocked => write!(f, "PLL did not lock"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for Error<E> {}

// ── Public enums ───────────────────────────────────────────────────────────

/// Chip variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    Pcm1861,
    Pcm1863,
    Pcm1865,
}

impl Variant {
    /// Number of ADC channels.
    pub const fn adc_channels(self) -> u8 {
        match self {
            Self::Pcm1861 | Self::Pcm1863 => 2,
            Self::Pcm1865 => 4,
        }
    }
}

/// Which side generates BCK/LRCK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRole {
    /// Codec drives the bit and frame clocks.
    Master,
    /// Codec follows externally supplied clocks.
    Slave,
}

/// Serial audio interface format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceFormat {
    I2s,
    LeftJustified,
    RightJustified,
    /// TDM / DSP mode.
    Tdm,
}

impl InterfaceFormat {
    const fn bits(self) -> u8 {
        match self {
            Self::I2s => reg::PCM_FORMAT_FMT_I2S,
            Self::LeftJustified => reg::PCM_FORMAT_FMT_LEFT_J,
            Self::RightJustified => reg::PCM_FORMAT_FMT_RIGHT_J,
            Self::Tdm => reg::PCM_FORMAT_FMT_TDM,
        }
    }
}

/// Digital audio interface configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiFormat {
    pub format: InterfaceFormat,
    pub role: ClockRole,
}

impl DaiFormat {
    pub const fn new(format: InterfaceFormat, role: ClockRole) -> Self {
        Self { format, role }
    }
}

// ── Driver struct ──────────────────────────────────────────────────────────

/// PCM186x codec driver.
pub struct Pcm186x<I2C, D> {
    bus: PagedI2c<I2C>,
    delay: D,
    variant: Variant,
    /// SCK frequency in Hz; 0 until [`set_sysclk`](Self::set_sysclk).
    master_clock_hz: u32,
    role: ClockRole,
    /// Last successfully applied clock configuration.
    clocks: Option<ClockConfig>,
}

impl<I2C, D> Pcm186x<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Default I2C address (ADR pin low).
    pub const DEFAULT_ADDRESS: u8 = reg::I2C_ADDR_LOW;

    /// Alternate I2C address (ADR pin high).
    pub const ALT_ADDRESS: u8 = reg::I2C_ADDR_HIGH;

    /// Create a PCM1863 driver at the default address (0x4A).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::new_with_address(i2c, delay, Self::DEFAULT_ADDRESS)
    }

    /// Create a driver with a specific I2C address.
    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            bus: PagedI2c::new(i2c, address).with_address_flag(reg::ADDRESS_FLAG),
            delay,
            variant: Variant::Pcm1863,
            master_clock_hz: 0,
            role: ClockRole::Slave,
            clocks: None,
        }
    }

    /// Select the chip variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Release the I2C bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }

    // ── Register helpers ───────────────────────────────────────────────

    fn update(&mut self, register: u16, mask: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.bus.update_bits(register, mask, value).map_err(Error::Bus)
    }

    /// Read one register.
    pub fn read_register(&mut self, register: u16) -> Result<u8, I2C::Error> {
        self.bus.read(register)
    }

    /// Write one register.
    pub fn write_register(&mut self, register: u16, value: u8) -> Result<(), I2C::Error> {
        self.bus.write(register, value)
    }

    // ── Configuration ──────────────────────────────────────────────────

    /// Write the reset value of every writable register.
    pub fn restore_defaults(&mut self) -> Result<(), I2C::Error> {
        self.bus.invalidate_page();
        for &(register, value) in reg::DEFAULTS {
            if reg::is_volatile(register) {
                continue;
            }
            self.bus.write(register, value)?;
        }
        self.clocks = None;
        Ok(())
    }

    /// Record the master clock (SCK) frequency. Zero marks it unknown.
    pub fn set_sysclk(&mut self, master_clock_hz: u32) {
        debug!("pcm186x: sysclk {} Hz", master_clock_hz);
        self.master_clock_hz = master_clock_hz;
    }

    pub fn sysclk(&self) -> u32 {
        self.master_clock_hz
    }

    /// Program interface format and clock role.
    pub fn set_dai_format(&mut self, dai: DaiFormat) -> Result<(), I2C::Error> {
        self.bus
            .update_bits(reg::PCM_FORMAT, reg::PCM_FORMAT_FMT_MASK, dai.format.bits())?;
        let mst = match dai.role {
            ClockRole::Master => reg::CLK_SELECT_MST_MODE,
            ClockRole::Slave => 0,
        };
        self.bus
            .update_bits(reg::CLK_SELECT, reg::CLK_SELECT_MST_MODE, mst)?;
        self.role = dai.role;
        Ok(())
    }

    /// Enter (`true`) or leave standby.
    pub fn set_standby(&mut self, standby: bool) -> Result<(), I2C::Error> {
        let value = if standby { reg::POWER_CTRL_STBY } else { 0 };
        self.bus
            .update_bits(reg::POWER_CTRL, reg::POWER_CTRL_STBY, value)
    }

    /// Whether the PLL reports lock.
    pub fn pll_locked(&mut self) -> Result<bool, I2C::Error> {
        Ok(self.bus.read(reg::PLL_STATUS)? & reg::PLL_STATUS_LOCKED != 0)
    }

    /// Last clock configuration applied by [`configure_clocks`](Self::configure_clocks).
    pub fn clock_config(&self) -> Option<&ClockConfig> {
        self.clocks.as_ref()
    }

    // ── Clocking ───────────────────────────────────────────────────────

    /// Derive and program the clock tree for a stream.
    ///
    /// Nothing is written unless a configuration exists for the request.
    pub fn configure_clocks(
        &mut self,
        sample_rate_hz: u32,
        bits_per_sample: u32,
    ) -> Result<ClockConfig, Error<I2C::Error>> {
        let request = ClockRequest::new(self.master_clock_hz, sample_rate_hz, bits_per_sample);
        let config = setup_clocks(&request).inspect_err(|e| {
            error!("pcm186x: no clock configuration: {}", e);
        })?;
        self.apply_clock_config(&config)?;
        Ok(config)
    }

    /// Program a precomputed clock configuration.
    ///
    /// The codec is held in standby and slave mode while the dividers
    /// change. On PLL lock failure it is left in standby.
    pub fn apply_clock_config(&mut self, config: &ClockConfig) -> Result<(), Error<I2C::Error>> {
        self.clocks = None;
        self.update(reg::POWER_CTRL, reg::POWER_CTRL_STBY, reg::POWER_CTRL_STBY)?;
        self.update(reg::CLK_SELECT, reg::CLK_SELECT_MST_MODE, 0)?;

        self.bus.apply(&config.writes()).map_err(Error::Bus)?;

        if config.pll_enabled() {
            self.wait_for_pll_lock()?;
        }

        if self.role == ClockRole::Master {
            self.update(reg::CLK_SELECT, reg::CLK_SELECT_MST_MODE, reg::CLK_SELECT_MST_MODE)?;
        }
        self.update(reg::POWER_CTRL, reg::POWER_CTRL_STBY, 0)?;

        info!(
            "pcm186x: clocks configured, pll {}, bck div {}",
            config.pll_enabled(),
            config.bit_clock_divider
        );
        self.clocks = Some(*config);
        Ok(())
    }

    fn wait_for_pll_lock(&mut self) -> Result<(), Error<I2C::Error>> {
        for _ in 0..PLL_LOCK_POLLS {
            if self.pll_locked().map_err(Error::Bus)? {
                return Ok(());
            }
            self.delay.delay_ms(PLL_LOCK_POLL_MS);
        }
        warn!("pcm186x: PLL not locked after {} polls", PLL_LOCK_POLLS);
        Err(Error::PllUnlocked)
    }
}
