//! Async TAS2505 driver: paged register access and the script engine.
//!
//! Communicates with the chip via I²C using the `embedded_hal_async::i2c::I2c`
//! trait, so it is HAL-agnostic while remaining async. Delays go through
//! `embedded_hal_async::delay::DelayNs`; [`Tas2505::new`] uses
//! `embassy_time::Delay`.
//!
//! # Transaction shape
//!
//! Every register access is two bus transfers to [`I2C_ADDRESS`]:
//!
//! ```text
//! write  [0x00, page]                 page select
//! write  [address, value]             register write
//!   or
//! write_read [address] -> [value]     register read
//! ```
//!
//! The current page is never cached: every access re-selects it, including
//! back-to-back accesses on the same page.

use embassy_time::Delay;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::controls::{DacVolume, SpeakerGain};
use crate::error::{BusError, ScriptError, Stage};
use crate::registers::*;
use crate::script::{Action, CONFIG_I2S_IN_SPEAKER_OUT, RESET};

/// TAS2505 driver.
///
/// Owns the I²C bus handle and a delay provider. To share a bus with other
/// devices, pass a shared-bus device handle rather than the raw peripheral.
pub struct Tas2505<I2C, D = Delay> {
    i2c: I2C,
    delay: D,
}

impl<I2C: I2c> Tas2505<I2C, Delay> {
    /// Create a driver that sleeps with `embassy_time::Delay`.
    pub fn new(i2c: I2C) -> Self {
        Self::with_delay(i2c, Delay)
    }
}

impl<I2C: I2c, D: DelayNs> Tas2505<I2C, D> {
    /// Create a driver with a caller-supplied delay provider.
    pub fn with_delay(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Give back the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    // -----------------------------------------------------------------------
    // Register access
    // -----------------------------------------------------------------------

    /// Write `page` to the page-select register.
    ///
    /// # Errors
    ///
    /// [`Stage::PageSelect`] if the transfer fails.
    pub async fn select_page(&mut self, page: u8) -> Result<(), BusError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("tas2505: select page {=u8}", page);

        self.i2c
            .write(I2C_ADDRESS, &[PAGE_SELECT, page])
            .await
            .map_err(|e| BusError::new(Stage::PageSelect { page }, e))
    }

    /// Select `register`'s page, then write `value` to it.
    ///
    /// # Errors
    ///
    /// [`Stage::PageSelect`] if the page select fails (the value write is
    /// then never attempted), [`Stage::Write`] if the value write fails.
    pub async fn write_register(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), BusError<I2C::Error>> {
        self.select_page(register.page()).await?;

        #[cfg(feature = "defmt")]
        defmt::trace!("tas2505: write {} = {=u8:#x}", register, value);

        self.i2c
            .write(I2C_ADDRESS, &[register.address(), value])
            .await
            .map_err(|e| BusError::new(Stage::Write { register }, e))
    }

    /// Select `register`'s page, then read its current value.
    ///
    /// # Errors
    ///
    /// [`Stage::PageSelect`] or [`Stage::Read`], whichever transfer failed.
    pub async fn read_register(&mut self, register: Register) -> Result<u8, BusError<I2C::Error>> {
        self.select_page(register.page()).await?;

        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDRESS, &[register.address()], &mut buf)
            .await
            .map_err(|e| BusError::new(Stage::Read { register }, e))?;
        let [value] = buf;

        #[cfg(feature = "defmt")]
        defmt::trace!("tas2505: read {} -> {=u8:#x}", register, value);

        Ok(value)
    }

    /// Read-modify-write: replace the bits of `register` selected by `mask`
    /// with the same bits of `value`, leaving the rest untouched.
    ///
    /// Returns the byte that was written.
    ///
    /// # Errors
    ///
    /// Any error from [`read_register`](Self::read_register) or
    /// [`write_register`](Self::write_register). If the read fails nothing
    /// is written.
    pub async fn modify_register(
        &mut self,
        register: Register,
        mask: u8,
        value: u8,
    ) -> Result<u8, BusError<I2C::Error>> {
        let current = self.read_register(register).await?;
        let updated = (current & !mask) | (value & mask);
        self.write_register(register, updated).await?;
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Script engine
    // -----------------------------------------------------------------------

    /// Execute `script` front to back.
    ///
    /// Writes go through [`write_register`](Self::write_register); delays
    /// suspend on the delay provider and touch no bus. The first failing
    /// write aborts the script: earlier writes stay applied, later actions
    /// are never attempted, and nothing is rolled back.
    ///
    /// An empty script succeeds without bus traffic.
    ///
    /// # Errors
    ///
    /// [`ScriptError`] carrying the index of the failing action.
    pub async fn apply(&mut self, script: &[Action]) -> Result<(), ScriptError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("tas2505: applying {=usize}-action script", script.len());

        for (index, action) in script.iter().enumerate() {
            match *action {
                Action::Write { register, value } => {
                    if let Err(bus) = self.write_register(register, value).await {
                        #[cfg(feature = "defmt")]
                        defmt::warn!(
                            "tas2505: script aborted at action {=usize}: {} failed",
                            index,
                            bus.stage
                        );
                        return Err(ScriptError {
                            index,
                            action: *action,
                            bus,
                        });
                    }
                }
                Action::Delay { ms } => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("tas2505: delay {=u32} ms", ms);
                    self.delay.delay_ms(ms).await;
                }
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("tas2505: script complete");
        Ok(())
    }

    /// Run the default bring-up script ([`CONFIG_I2S_IN_SPEAKER_OUT`]).
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub async fn configure(&mut self) -> Result<(), ScriptError<I2C::Error>> {
        self.apply(&CONFIG_I2S_IN_SPEAKER_OUT).await
    }

    /// Software reset followed by the settling delay.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub async fn reset(&mut self) -> Result<(), ScriptError<I2C::Error>> {
        self.apply(&RESET).await
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    /// Set the speaker amplifier gain (P1 R48 bits 6:4). Step 0 mutes.
    ///
    /// # Errors
    ///
    /// See [`write_register`](Self::write_register).
    pub async fn set_speaker_amplifier_volume(
        &mut self,
        gain: SpeakerGain,
    ) -> Result<(), BusError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("tas2505: speaker gain {=u8}", gain.get());

        self.write_register(SPEAKER_AMPLIFIER_VOLUME_CONTROL_2, gain.register_value())
            .await
    }

    /// Set the DAC digital volume (P0 R65).
    ///
    /// # Errors
    ///
    /// See [`write_register`](Self::write_register).
    pub async fn set_dac_volume(&mut self, volume: DacVolume) -> Result<(), BusError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("tas2505: DAC volume {=i8} half-dB", volume.half_db());

        self.write_register(DAC_CHANNEL_DIGITAL_VOLUME_CONTROL, volume.register_value())
            .await
    }

    /// Mute or unmute the DAC (P0 R64 bit 3, read-modify-write).
    ///
    /// # Errors
    ///
    /// See [`modify_register`](Self::modify_register).
    pub async fn set_dac_muted(&mut self, muted: bool) -> Result<(), BusError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("tas2505: DAC muted = {=bool}", muted);

        let bits = if muted { DAC_MUTE } else { 0 };
        self.modify_register(DAC_CHANNEL_SETUP_2, DAC_MUTE, bits)
            .await
            .map(drop)
    }

    /// Power the speaker driver up or down (P1 R45 bit 1, read-modify-write).
    ///
    /// # Errors
    ///
    /// See [`modify_register`](Self::modify_register).
    pub async fn set_speaker_powered(&mut self, powered: bool) -> Result<(), BusError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("tas2505: speaker powered = {=bool}", powered);

        let bits = if powered { SPEAKER_POWER_UP } else { 0 };
        self.modify_register(SPEAKER_AMPLIFIER_CONTROL_1, SPEAKER_POWER_UP, bits)
            .await
            .map(drop)
    }
}
