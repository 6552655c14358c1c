//! Typed values for the runtime controls.
//!
//! - `SpeakerGain`: speaker driver gain step 0–5, 0 mutes the driver
//! - `DacVolume`: DAC digital volume in 0.5 dB steps, −63.5 dB … +24 dB
//!
//! Both encode straight to the register byte the driver writes, so an
//! out-of-range value can never reach the bus.

pub use crate::error::OutOfRangeError;
use crate::registers::{SPEAKER_GAIN_MASK, SPEAKER_GAIN_SHIFT};

// ── SpeakerGain ──────────────────────────────────────────────────────────────

/// Speaker amplifier gain step (P1 R48 bits 6:4).
///
/// Step 0 mutes the driver; steps 1–5 select 6, 12, 18, 24 and 32 dB.
/// Codes 6 and 7 are reserved and never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SpeakerGain(u8);

impl SpeakerGain {
    /// Highest gain step (32 dB).
    pub const MAX: u8 = 5;

    /// Driver muted.
    pub const MUTED: Self = Self(0);

    /// Create a `SpeakerGain`, clamping values above 5 to 5.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX))
    }

    /// Create a `SpeakerGain`, returning an error if `level > 5`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `level > 5`.
    pub fn try_new(level: u8) -> Result<Self, OutOfRangeError> {
        if level > Self::MAX {
            Err(OutOfRangeError {
                value: i32::from(level),
                min: 0,
                max: i32::from(Self::MAX),
            })
        } else {
            Ok(Self(level))
        }
    }

    /// Return the gain step (0–5).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// `true` if this step mutes the driver.
    #[must_use]
    pub fn is_muted(self) -> bool {
        self.0 == 0
    }

    /// Register byte for P1 R48.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // level <= 5, fits in bits 6:4
    pub fn register_value(self) -> u8 {
        (self.0 << SPEAKER_GAIN_SHIFT) & SPEAKER_GAIN_MASK
    }
}

// ── DacVolume ────────────────────────────────────────────────────────────────

/// DAC digital volume (P0 R65), signed, in 0.5 dB steps.
///
/// The register holds a two's-complement byte: 0x30 = +24 dB, 0x00 = 0 dB,
/// 0x81 = −63.5 dB. Codes 0x31–0x7F and 0x80 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct DacVolume(i8);

impl DacVolume {
    /// Lowest setting in half-dB units (−63.5 dB).
    pub const MIN_HALF_DB: i8 = -127;

    /// Highest setting in half-dB units (+24 dB).
    pub const MAX_HALF_DB: i8 = 48;

    /// 0 dB, the power-on default.
    pub const ZERO_DB: Self = Self(0);

    /// Create a `DacVolume` from half-dB steps, clamping to −127..=48.
    #[must_use]
    pub fn from_half_db(half_db: i8) -> Self {
        Self(half_db.clamp(Self::MIN_HALF_DB, Self::MAX_HALF_DB))
    }

    /// Create a `DacVolume` from half-dB steps.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `half_db` is outside −127..=48.
    pub fn try_from_half_db(half_db: i8) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_HALF_DB..=Self::MAX_HALF_DB).contains(&half_db) {
            Ok(Self(half_db))
        } else {
            Err(OutOfRangeError {
                value: i32::from(half_db),
                min: i32::from(Self::MIN_HALF_DB),
                max: i32::from(Self::MAX_HALF_DB),
            })
        }
    }

    /// Volume in half-dB steps.
    #[must_use]
    pub fn half_db(self) -> i8 {
        self.0
    }

    /// Register byte for P0 R65 (two's complement).
    #[must_use]
    pub fn register_value(self) -> u8 {
        let [byte] = self.0.to_le_bytes();
        byte
    }
}
