//! TAS2505 register map
//!
//! Source: Texas Instruments TAS2505 Application Reference Guide (SLAU472)
//!
//! # Paged register space
//!
//! The TAS2505 exposes more control registers than its 7-bit I²C register
//! address can reach, so the map is split into pages. Register 0x00 on every
//! page is the page-select register: writing a page number there switches the
//! page that all other addresses refer to. The page-select register itself is
//! therefore *not* a member of the paged map below.
//!
//! Only page 0 (clocking, interface, DAC) and page 1 (analog, speaker
//! amplifier) are used by this driver.
//!
//! # Adding registers
//!
//! Declare a new `Register` constant and append it to [`REGISTER_MAP`]. The
//! `const` assertion at the bottom of this file rejects any `(page, address)`
//! pair that is already taken, so a typo fails the build rather than
//! silently aliasing another control.

use core::fmt;

/// 7-bit I²C device address (fixed in silicon, not strap-configurable).
pub const I2C_ADDRESS: u8 = 0x18;

/// Page-select register: flat address 0x00, identical on every page.
pub const PAGE_SELECT: u8 = 0x00;

/// Page 0: clock tree, audio interface, DAC digital path.
pub const PAGE_0: u8 = 0;

/// Page 1: reference/bias, LDO, speaker amplifier.
pub const PAGE_1: u8 = 1;

// ---------------------------------------------------------------------------
// Register descriptor
// ---------------------------------------------------------------------------

/// A single control register, identified by page and in-page address.
///
/// Two descriptors are equal iff both page and address match. Descriptors are
/// plain `Copy` values; the named constants in this module are the canonical
/// set, but [`Register::new`] is `const` so a script may also name a register
/// this map does not (yet) document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    page: u8,
    address: u8,
}

impl Register {
    /// Describe the register at `address` on `page`.
    ///
    /// Neither value is checked against the device's capabilities; the chip
    /// is authoritative.
    #[must_use]
    pub const fn new(page: u8, address: u8) -> Self {
        Self { page, address }
    }

    /// Page that must be selected before this register is addressed.
    #[must_use]
    pub const fn page(self) -> u8 {
        self.page
    }

    /// Flat in-page address sent on the bus.
    #[must_use]
    pub const fn address(self) -> u8 {
        self.address
    }

    /// Documented name of this register, if it is in [`REGISTER_MAP`].
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        REGISTER_MAP
            .iter()
            .find(|(_, register)| *register == self)
            .map(|(name, _)| *name)
    }

    /// Look up a documented register by name (exact, case-sensitive).
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        REGISTER_MAP
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, register)| *register)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (P{}/R{})", self.page, self.address),
            None => write!(f, "P{}/R{}", self.page, self.address),
        }
    }
}

// ---------------------------------------------------------------------------
// Page 0: reset
// ---------------------------------------------------------------------------

/// P0 R1: software reset: bit 0 (self-clearing).
pub const SOFTWARE_RESET: Register = Register::new(PAGE_0, 1);

// ---------------------------------------------------------------------------
// Page 0: clock tree / PLL
// ---------------------------------------------------------------------------

/// P0 R4: clock mux: PLL_CLKIN source (bits 3:2), CODEC_CLKIN source (bits 1:0).
pub const CLOCK_SETTING_1: Register = Register::new(PAGE_0, 4);

/// P0 R5: PLL power (bit 7), P divider (bits 6:4), R multiplier (bits 3:0).
pub const CLOCK_SETTING_2: Register = Register::new(PAGE_0, 5);

/// P0 R6: PLL J multiplier (bits 5:0).
pub const CLOCK_SETTING_3: Register = Register::new(PAGE_0, 6);

/// P0 R7: PLL D fraction, most significant bits (bits 5:0).
pub const CLOCK_SETTING_4: Register = Register::new(PAGE_0, 7);

/// P0 R8: PLL D fraction, least significant byte.
pub const CLOCK_SETTING_5: Register = Register::new(PAGE_0, 8);

/// P0 R11: NDAC divider power (bit 7) and value (bits 6:0, 0 = 128).
pub const CLOCK_SETTING_6: Register = Register::new(PAGE_0, 11);

/// P0 R12: MDAC divider power (bit 7) and value (bits 6:0, 0 = 128).
pub const CLOCK_SETTING_7: Register = Register::new(PAGE_0, 12);

// ---------------------------------------------------------------------------
// Page 0: DAC oversampling
// ---------------------------------------------------------------------------

/// P0 R13: DOSR, bits 9:8.
pub const DAC_OSR_SETTING_1: Register = Register::new(PAGE_0, 13);

/// P0 R14: DOSR, bits 7:0 (DOSR = 1024 encodes as 0).
pub const DAC_OSR_SETTING_2: Register = Register::new(PAGE_0, 14);

// ---------------------------------------------------------------------------
// Page 0: audio interface
// ---------------------------------------------------------------------------

/// P0 R27: interface format (bits 7:6), word length (bits 5:4),
/// BCLK direction (bit 3), WCLK direction (bit 2).
pub const AUDIO_INTERFACE_SETTING_1: Register = Register::new(PAGE_0, 27);

// ---------------------------------------------------------------------------
// Page 0: DAC signal path
// ---------------------------------------------------------------------------

/// P0 R60: DAC processing block selection (PRB_Px).
pub const DAC_INSTRUCTION_SET: Register = Register::new(PAGE_0, 60);

/// P0 R63: DAC power (bit 7), data path routing, soft-stepping.
pub const DAC_CHANNEL_SETUP_1: Register = Register::new(PAGE_0, 63);

/// P0 R64: DAC mute (bit 3) and volume control mode.
pub const DAC_CHANNEL_SETUP_2: Register = Register::new(PAGE_0, 64);

/// P0 R65: DAC digital volume, signed 0.5 dB steps (+24 dB … −63.5 dB).
pub const DAC_CHANNEL_DIGITAL_VOLUME_CONTROL: Register = Register::new(PAGE_0, 65);

// ---------------------------------------------------------------------------
// Page 1: reference / bias
// ---------------------------------------------------------------------------

/// P1 R1: master reference, POR, LDO and bandgap control.
pub const REF_POR_LDO_BGAP_CONTROL: Register = Register::new(PAGE_1, 1);

/// P1 R2: LDO output voltage and level-shifter power.
pub const LDO_CONTROL: Register = Register::new(PAGE_1, 2);

/// P1 R10: output common-mode voltage.
pub const COMMON_MODE_CONTROL: Register = Register::new(PAGE_1, 10);

// ---------------------------------------------------------------------------
// Page 1: speaker amplifier
// ---------------------------------------------------------------------------

/// P1 R45: speaker driver power (bit 1).
pub const SPEAKER_AMPLIFIER_CONTROL_1: Register = Register::new(PAGE_1, 45);

/// P1 R46: speaker analog volume (attenuation, 0 = 0 dB).
pub const SPEAKER_VOLUME_CONTROL_1: Register = Register::new(PAGE_1, 46);

/// P1 R48: speaker amplifier gain level (bits 6:4, 0 = muted).
pub const SPEAKER_AMPLIFIER_VOLUME_CONTROL_2: Register = Register::new(PAGE_1, 48);

// ---------------------------------------------------------------------------
// Register field values
// ---------------------------------------------------------------------------

/// SOFTWARE_RESET: initiate reset (self-clearing).
pub const SOFT_RESET: u8 = 0b0000_0001;

/// CLOCK_SETTING_1: PLL_CLKIN = BCLK (bits 3:2 = 01), CODEC_CLKIN = PLL (bits 1:0 = 11).
pub const CLKIN_BCLK_TO_PLL: u8 = 0b0000_0111;

/// Power-up bit shared by the PLL, NDAC and MDAC registers.
pub const CLOCK_POWER_UP: u8 = 0b1000_0000;

/// DAC_INSTRUCTION_SET: processing block PRB_P2.
pub const DAC_PRB_P2: u8 = 0b0000_0010;

/// REF_POR_LDO_BGAP_CONTROL: master reference powered on.
pub const MASTER_REFERENCE_ON: u8 = 0b0001_0000;

/// LDO_CONTROL: 1.8 V LDO output, level shifters powered up.
pub const LDO_1V8: u8 = 0b0000_0000;

/// COMMON_MODE_CONTROL: 0.9 V common mode.
pub const COMMON_MODE_0V9: u8 = 0b0000_0000;

/// SPEAKER_AMPLIFIER_CONTROL_1: speaker driver powered up.
pub const SPEAKER_POWER_UP: u8 = 0b0000_0010;

/// SPEAKER_AMPLIFIER_VOLUME_CONTROL_2: gain level field mask.
pub const SPEAKER_GAIN_MASK: u8 = 0b0111_0000;

/// SPEAKER_AMPLIFIER_VOLUME_CONTROL_2: gain level field position.
pub const SPEAKER_GAIN_SHIFT: u8 = 4;

/// DAC_CHANNEL_SETUP_1: DAC powered, left channel data path, soft-step once per fs.
pub const DAC_POWER_UP_LEFT: u8 = 0b1001_0001;

/// DAC_CHANNEL_SETUP_2: DAC mute bit.
pub const DAC_MUTE: u8 = 0b0000_1000;

/// DAC_CHANNEL_SETUP_2: unmuted, independent volume control.
pub const DAC_UNMUTED: u8 = 0b0000_0100;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Every documented register, by name, in address order per page.
pub const REGISTER_MAP: [(&str, Register); 21] = [
    ("SOFTWARE_RESET", SOFTWARE_RESET),
    ("CLOCK_SETTING_1", CLOCK_SETTING_1),
    ("CLOCK_SETTING_2", CLOCK_SETTING_2),
    ("CLOCK_SETTING_3", CLOCK_SETTING_3),
    ("CLOCK_SETTING_4", CLOCK_SETTING_4),
    ("CLOCK_SETTING_5", CLOCK_SETTING_5),
    ("CLOCK_SETTING_6", CLOCK_SETTING_6),
    ("CLOCK_SETTING_7", CLOCK_SETTING_7),
    ("DAC_OSR_SETTING_1", DAC_OSR_SETTING_1),
    ("DAC_OSR_SETTING_2", DAC_OSR_SETTING_2),
    ("AUDIO_INTERFACE_SETTING_1", AUDIO_INTERFACE_SETTING_1),
    ("DAC_INSTRUCTION_SET", DAC_INSTRUCTION_SET),
    ("DAC_CHANNEL_SETUP_1", DAC_CHANNEL_SETUP_1),
    ("DAC_CHANNEL_SETUP_2", DAC_CHANNEL_SETUP_2),
    ("DAC_CHANNEL_DIGITAL_VOLUME_CONTROL", DAC_CHANNEL_DIGITAL_VOLUME_CONTROL),
    ("REF_POR_LDO_BGAP_CONTROL", REF_POR_LDO_BGAP_CONTROL),
    ("LDO_CONTROL", LDO_CONTROL),
    ("COMMON_MODE_CONTROL", COMMON_MODE_CONTROL),
    ("SPEAKER_AMPLIFIER_CONTROL_1", SPEAKER_AMPLIFIER_CONTROL_1),
    ("SPEAKER_VOLUME_CONTROL_1", SPEAKER_VOLUME_CONTROL_1),
    ("SPEAKER_AMPLIFIER_VOLUME_CONTROL_2", SPEAKER_AMPLIFIER_VOLUME_CONTROL_2),
];

/// `true` if no two entries share a `(page, address)` pair or a name, and no
/// entry sits on the page-select address.
// Indices are bounded by `map.len()` in the loop conditions.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
const fn registry_is_consistent(map: &[(&str, Register)]) -> bool {
    let mut i = 0;
    while i < map.len() {
        let (name_a, a) = map[i];
        if a.address == PAGE_SELECT {
            return false;
        }
        let mut j = i + 1;
        while j < map.len() {
            let (name_b, b) = map[j];
            if a.page == b.page && a.address == b.address {
                return false;
            }
            if str_eq(name_a, name_b) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    registry_is_consistent(&REGISTER_MAP),
    "REGISTER_MAP has a duplicate (page, address) pair or name"
);
