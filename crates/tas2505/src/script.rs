//! Configuration scripts: ordered register writes and settling delays.
//!
//! A script is a plain slice of [`Action`]s replayed front to back by
//! [`Tas2505::apply`](crate::Tas2505::apply). There are no loops or
//! conditionals; order is the whole contract. Delays exist so analog blocks
//! (reset, PLL lock) settle before dependent writes are issued.
//!
//! Scripts are ordinary `const` data, so custom ones are built the same way
//! as [`CONFIG_I2S_IN_SPEAKER_OUT`]:
//!
//! ```
//! use tas2505::registers::{DAC_CHANNEL_DIGITAL_VOLUME_CONTROL, SPEAKER_VOLUME_CONTROL_1};
//! use tas2505::script::Action;
//!
//! const QUIET: [Action; 3] = [
//!     Action::write(DAC_CHANNEL_DIGITAL_VOLUME_CONTROL, 0xEC), // -10 dB
//!     Action::delay_ms(1),
//!     Action::write(SPEAKER_VOLUME_CONTROL_1, 12),
//! ];
//! assert_eq!(tas2505::script::write_count(&QUIET), 2);
//! ```

use crate::clock::{AudioInterface, ClockPlan};
use crate::registers::*;

/// One step of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Select `register`'s page, then write `value` to it.
    Write {
        /// Target register.
        register: Register,
        /// Byte written to the register.
        value: u8,
    },
    /// Suspend for at least `ms` milliseconds. Produces no bus traffic.
    Delay {
        /// Duration in milliseconds.
        ms: u32,
    },
}

impl Action {
    /// Register write action.
    #[must_use]
    pub const fn write(register: Register, value: u8) -> Self {
        Self::Write { register, value }
    }

    /// Delay action.
    #[must_use]
    pub const fn delay_ms(ms: u32) -> Self {
        Self::Delay { ms }
    }
}

/// Number of register writes in `script`.
#[must_use]
pub fn write_count(script: &[Action]) -> usize {
    script
        .iter()
        .filter(|action| matches!(action, Action::Write { .. }))
        .count()
}

/// Sum of all delays in `script`, saturating at `u32::MAX`.
#[must_use]
pub fn total_delay_ms(script: &[Action]) -> u32 {
    script.iter().fold(0u32, |total, action| match action {
        Action::Delay { ms } => total.saturating_add(*ms),
        Action::Write { .. } => total,
    })
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Settling time after a software reset (reference guide: > 1 ms).
pub const RESET_DELAY_MS: u32 = 2;

/// PLL lock time after the PLL is powered and programmed.
pub const PLL_LOCK_DELAY_MS: u32 = 15;

// ---------------------------------------------------------------------------
// Built-in scripts
// ---------------------------------------------------------------------------

/// Software reset followed by the mandatory settling delay.
pub const RESET: [Action; 2] = [
    Action::write(SOFTWARE_RESET, SOFT_RESET),
    Action::delay_ms(RESET_DELAY_MS),
];

/// Number of actions in [`CONFIG_I2S_IN_SPEAKER_OUT`].
pub const CONFIG_SCRIPT_LEN: usize = 23;

/// Default bring-up: I²S 16-bit input, DAC → speaker output.
///
/// Adapted from example 4.0.7 of the TAS2505 Application Reference Guide.
/// Tuned for 22.05 kHz / 16-bit WAV playback.
///
/// # Clock plan
///
/// ```text
/// BCLK    = fs × 32                 = 22.05 kHz × 32   = 705.6 kHz   (PLL input)
/// PLL_CLK = BCLK × R × J.D / P      = 705.6 kHz × 40   = 28.224 MHz  (< 49.152 MHz)
/// fs      = PLL_CLK / (NDAC × MDAC × DOSR) = 28.224 MHz / (1 × 2 × 640)
/// ```
///
/// The 15 ms delay after the PLL writes lets it lock before the dividers
/// that consume its output are powered.
///
/// Use [`ClockPlan`](crate::clock::ClockPlan) to render the same script for
/// a different sample rate or word length.
pub const CONFIG_I2S_IN_SPEAKER_OUT: [Action; CONFIG_SCRIPT_LEN] =
    ClockPlan::DEFAULT.render(AudioInterface::I2S_16);
