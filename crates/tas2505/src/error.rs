//! Error types for the TAS2505 driver.
//!
//! Transport errors are opaque: they are wrapped, tagged with the bus stage
//! that produced them, and propagated. Nothing is retried.

use core::fmt;

use crate::registers::Register;
use crate::script::Action;

/// Which of the two transfers behind a register access failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Writing the page number to the page-select register.
    PageSelect {
        /// Page that was being selected.
        page: u8,
    },
    /// Writing a value to a register (page already selected).
    Write {
        /// Register being written.
        register: Register,
    },
    /// Reading a value from a register (page already selected).
    Read {
        /// Register being read.
        register: Register,
    },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageSelect { page } => write!(f, "page select ({page})"),
            Self::Write { register } => write!(f, "write to {register}"),
            Self::Read { register } => write!(f, "read from {register}"),
        }
    }
}

/// A failed bus transaction.
///
/// If the failing stage is [`Stage::Write`] or [`Stage::Read`], the page
/// select before it succeeded and the device is left on the new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError<E> {
    /// Transfer that failed.
    pub stage: Stage,
    /// Error reported by the transport.
    pub source: E,
}

impl<E> BusError<E> {
    pub(crate) fn new(stage: Stage, source: E) -> Self {
        Self { stage, source }
    }

    /// Unwrap the transport error.
    pub fn into_source(self) -> E {
        self.source
    }
}

impl<E: embedded_hal::i2c::Error> BusError<E> {
    /// Generic classification of the transport error (NACK, arbitration loss, …).
    pub fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        self.source.kind()
    }
}

impl<E: fmt::Debug> fmt::Display for BusError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I2C {} failed: {:?}", self.stage, self.source)
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for BusError<E> {}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for BusError<E> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "I2C {} failed: {}", self.stage, self.source);
    }
}

/// A script aborted by a bus error.
///
/// Actions before `index` were applied and stay applied; actions after it
/// were never attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptError<E> {
    /// Zero-based position of the failing action in the script.
    pub index: usize,
    /// The failing action.
    pub action: Action,
    /// Underlying bus failure.
    pub bus: BusError<E>,
}

impl<E: fmt::Debug> fmt::Display for ScriptError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script action {} aborted: {}", self.index, self.bus)
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for ScriptError<E> {}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for ScriptError<E> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "script action {=usize} aborted: {}", self.index, self.bus);
    }
}

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: i32,
    /// The inclusive minimum allowed value.
    pub min: i32,
    /// The inclusive maximum allowed value.
    pub max: i32,
}

impl fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is outside {}..={}", self.value, self.min, self.max)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}
