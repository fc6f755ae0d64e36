//! Codec register maps and drivers.
//!
//! | Module | Feature | Contents |
//! |--------|---------|----------|
//! | [`registers`] | always | PCM186x register map (the clock solver depends on it) |
//! | [`bus`] | `pcm186x` or `dacplus` | [`PagedI2c`] register transport |
//! | [`pcm186x`] | `pcm186x` | PCM186x ADC driver |
//! | [`pcm512x`] | `dacplus` | PCM512x register map |

pub mod registers;

#[cfg(any(feature = "pcm186x", feature = "dacplus"))]
pub mod bus;

#[cfg(feature = "pcm186x")]
pub mod pcm186x;

#[cfg(feature = "dacplus")]
pub mod pcm512x;

#[cfg(all(test, any(feature = "pcm186x", feature = "dacplus")))]
pub(crate) mod mock;

#[cfg(any(feature = "pcm186x", feature = "dacplus"))]
pub use bus::PagedI2c;

#[cfg(feature = "pcm186x")]
pub use pcm186x::{ClockRole, DaiFormat, Error, InterfaceFormat, Pcm186x, Variant};
