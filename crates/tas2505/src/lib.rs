//! Register scripting engine and I²C driver for the TI TAS2505 class-D
//! speaker amplifier.
//!
//! The TAS2505 is configured entirely over I²C through a paged register map.
//! Bring-up is a fixed ordered sequence of register writes with settling
//! delays in between; this crate models that sequence as data (a *script*)
//! and replays it over any `embedded-hal` bus.
//!
//! # Layers
//!
//! ```text
//! Controls (speaker gain, DAC volume, mute)     ClockPlan → script
//!                 ↓                                   ↓
//! Script engine (Tas2505::apply / blocking::apply)
//!                 ↓
//! Register accessor (page select + write / read)
//!                 ↓
//! embedded_hal(_async)::i2c::I2c  +  DelayNs
//! ```
//!
//! # Modules
//!
//! - [`registers`]: device address, page-select register, named registers
//! - [`script`]: [`Action`] and the built-in scripts
//! - [`driver`]: async [`Tas2505`] driver
//! - [`blocking`]: the same operations over blocking traits
//! - [`controls`]: [`SpeakerGain`] and [`DacVolume`]
//! - [`clock`]: [`ClockPlan`] for other sample rates / word lengths
//! - [`error`]: [`BusError`] and [`ScriptError`]
//!
//! # Features
//!
//! - `std`: `std::error::Error` impls for host tooling
//! - `defmt`: `defmt::Format` impls and driver logging
//!
//! # Example
//!
//! ```no_run
//! use embedded_hal_async::i2c::I2c;
//! use tas2505::{BusError, SpeakerGain, Tas2505};
//!
//! async fn bring_up<I: I2c>(i2c: I) -> Result<(), I::Error> {
//!     let mut amp = Tas2505::new(i2c);
//!     amp.configure().await.map_err(|e| e.bus.into_source())?;
//!     amp.set_speaker_amplifier_volume(SpeakerGain::new(4))
//!         .await
//!         .map_err(BusError::into_source)?;
//!     Ok(())
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this driver crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // register accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod blocking;
pub mod clock;
pub mod controls;
pub mod driver;
pub mod error;
pub mod registers;
pub mod script;

pub use clock::{AudioInterface, ClockError, ClockPlan, InterfaceFormat, WordLength};
pub use controls::{DacVolume, SpeakerGain};
pub use driver::Tas2505;
pub use error::{BusError, OutOfRangeError, ScriptError, Stage};
pub use registers::{Register, I2C_ADDRESS};
pub use script::{Action, CONFIG_I2S_IN_SPEAKER_OUT};
