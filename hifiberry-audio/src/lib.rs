//! # hifiberry-audio
//!
//! A `no_std` clock solver and codec drivers for HiFiBerry audio boards
//! built around the TI PCM186x ADC and PCM512x DAC families. The centre of
//! the crate is the PCM186x clock-tree solver: given a master clock, sample
//! rate and sample width it finds either an exact direct divider chain or a
//! PLL configuration (R, J.D, P) inside the PLL's operating envelope, and
//! turns it into an ordered list of register writes.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Solver | [`clock`] | Pure clock-tree search and register field values |
//! | Trait | [`control`] | [`RegisterProgrammer`](control::RegisterProgrammer) and [`RegisterWrite`](control::RegisterWrite) |
//! | Codec | [`codec`] | Register maps, paged I2C transport, PCM186x driver (feature-gated) |
//! | Board | [`board`] | HiFiBerry ADC and DAC+ / DAC+ Pro glue (feature-gated) |
//!
//! ## Quick start
//!
//! ```ignore
//! use hifiberry_audio::clock::{setup_clocks, ClockRequest, ClockSource};
//!
//! let cfg = setup_clocks(&ClockRequest::new(24_576_000, 44_100, 24))?;
//! assert_eq!(cfg.source, ClockSource::Pll);
//! for w in cfg.writes() {
//!     bus.update_bits(w.register, w.mask, w.value)?;
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `pcm186x` | yes | PCM186x driver and HiFiBerry ADC board (requires `embedded-hal`) |
//! | `dacplus` | yes | PCM512x map and HiFiBerry DAC+ board (requires `embedded-hal`) |
//! | `defmt` | no | `defmt::Format` on public types, logging through `defmt` |
//! | `log` | no | Logging through the `log` crate |
//! | `std` | no | `std::error::Error` impls |

#![no_std]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod constants;
pub mod control;
pub mod clock;
pub mod codec;

#[cfg(any(feature = "pcm186x", feature = "dacplus"))]
pub mod board;
