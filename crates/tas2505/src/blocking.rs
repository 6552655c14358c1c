//! Blocking front-end over `embedded_hal::i2c::I2c`.
//!
//! Same transaction shape, ordering and error semantics as the async
//! [`Tas2505`](crate::Tas2505) driver, for bring-up code that runs before an
//! executor exists (or on targets without one). The bus and delay are
//! borrowed per call rather than owned.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::error::{BusError, ScriptError, Stage};
use crate::registers::{Register, I2C_ADDRESS, PAGE_SELECT};
use crate::script::Action;

/// Write `page` to the page-select register.
///
/// # Errors
///
/// [`Stage::PageSelect`] if the transfer fails.
pub fn select_page<I: I2c>(i2c: &mut I, page: u8) -> Result<(), BusError<I::Error>> {
    i2c.write(I2C_ADDRESS, &[PAGE_SELECT, page])
        .map_err(|e| BusError::new(Stage::PageSelect { page }, e))
}

/// Select `register`'s page, then write `value` to it.
///
/// # Errors
///
/// [`Stage::PageSelect`] or [`Stage::Write`], whichever transfer failed.
pub fn write_register<I: I2c>(
    i2c: &mut I,
    register: Register,
    value: u8,
) -> Result<(), BusError<I::Error>> {
    select_page(i2c, register.page())?;
    i2c.write(I2C_ADDRESS, &[register.address(), value])
        .map_err(|e| BusError::new(Stage::Write { register }, e))
}

/// Select `register`'s page, then read its current value.
///
/// # Errors
///
/// [`Stage::PageSelect`] or [`Stage::Read`], whichever transfer failed.
pub fn read_register<I: I2c>(i2c: &mut I, register: Register) -> Result<u8, BusError<I::Error>> {
    select_page(i2c, register.page())?;
    let mut buf = [0u8; 1];
    i2c.write_read(I2C_ADDRESS, &[register.address()], &mut buf)
        .map_err(|e| BusError::new(Stage::Read { register }, e))?;
    let [value] = buf;
    Ok(value)
}

/// Read-modify-write the bits of `register` selected by `mask`.
///
/// # Errors
///
/// Any error from [`read_register`] or [`write_register`].
pub fn modify_register<I: I2c>(
    i2c: &mut I,
    register: Register,
    mask: u8,
    value: u8,
) -> Result<u8, BusError<I::Error>> {
    let current = read_register(i2c, register)?;
    let updated = (current & !mask) | (value & mask);
    write_register(i2c, register, updated)?;
    Ok(updated)
}

/// Execute `script` front to back, blocking on `delay` for delay actions.
///
/// # Errors
///
/// [`ScriptError`] carrying the index of the first failing write; later
/// actions are never attempted.
pub fn apply<I: I2c, D: DelayNs>(
    i2c: &mut I,
    delay: &mut D,
    script: &[Action],
) -> Result<(), ScriptError<I::Error>> {
    #[cfg(feature = "defmt")]
    defmt::debug!("tas2505: applying {=usize}-action script (blocking)", script.len());

    for (index, action) in script.iter().enumerate() {
        match *action {
            Action::Write { register, value } => {
                write_register(i2c, register, value).map_err(|bus| {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("tas2505: script aborted at action {=usize}", index);
                    ScriptError {
                        index,
                        action: *action,
                        bus,
                    }
                })?;
            }
            Action::Delay { ms } => delay.delay_ms(ms),
        }
    }
    Ok(())
}
