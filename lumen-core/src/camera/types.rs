//! Coprocessor wire vocabulary
//!
//! Register addresses, status codes and command codes of the OV5640
//! autofocus MCU. These values are the de-facto wire format and must
//! match the hardware bit-for-bit.

/// 16-bit address of a sensor register or instruction-memory cell
pub type RegisterAddress = u16;

/// 8-bit register contents
pub type RegisterValue = u8;

/// Address reserved in register lists to mean "sleep", not "write"
///
/// The paired value is a duration in milliseconds.
pub const REG_DELAY: RegisterAddress = 0xFFFF;

/// Number of autofocus zones reported after a trigger
pub const ZONE_COUNT: usize = 5;

/// Coprocessor status as read from the firmware status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoprocessorStatus {
    /// Uploaded image was rejected; terminal until reloaded
    FirmwareBad,
    /// Firmware is booting
    Startup,
    /// Ready, no focus operation in progress
    Idle,
    /// Focus operation in progress
    Focusing,
    /// Lens is holding a focus position
    Focused,
    /// Value outside the documented set
    Unknown(u8),
}

impl CoprocessorStatus {
    /// Raw status code for FIRMWARE_BAD
    pub const RAW_FIRMWARE_BAD: u8 = 0x7F;
    /// Raw status code for STARTUP
    pub const RAW_STARTUP: u8 = 0x7E;
    /// Raw status code for IDLE
    pub const RAW_IDLE: u8 = 0x70;
    /// Raw status code for FOCUSING
    pub const RAW_FOCUSING: u8 = 0x00;
    /// Raw status code for FOCUSED
    pub const RAW_FOCUSED: u8 = 0x10;

    /// Decode a raw status register value
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            Self::RAW_FIRMWARE_BAD => Self::FirmwareBad,
            Self::RAW_STARTUP => Self::Startup,
            Self::RAW_IDLE => Self::Idle,
            Self::RAW_FOCUSING => Self::Focusing,
            Self::RAW_FOCUSED => Self::Focused,
            other => Self::Unknown(other),
        }
    }

    /// Encode back to the register value
    pub const fn raw(self) -> u8 {
        match self {
            Self::FirmwareBad => Self::RAW_FIRMWARE_BAD,
            Self::Startup => Self::RAW_STARTUP,
            Self::Idle => Self::RAW_IDLE,
            Self::Focusing => Self::RAW_FOCUSING,
            Self::Focused => Self::RAW_FOCUSED,
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether the coprocessor accepts commands in this state
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Idle | Self::Focusing | Self::Focused)
    }
}

impl From<u8> for CoprocessorStatus {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}

/// Commands accepted by the main command register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Run a single autofocus pass
    TriggerAutofocus = 0x03,
    /// Continuous autofocus
    AutoAutofocus = 0x04,
    /// Release the lens to its rest position
    ReleaseFocus = 0x08,
}

impl Command {
    /// Numeric command code
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Per-zone result of an autofocus pass
///
/// All zeros means the pass failed (or was never attempted). Any nonzero
/// element means focus was found for that zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FocusZoneResult {
    /// Zone values in ascending register order
    pub zones: [u8; ZONE_COUNT],
}

impl FocusZoneResult {
    /// The all-zero sentinel reported when focus could not be attempted
    pub const FAILED: Self = Self {
        zones: [0; ZONE_COUNT],
    };

    /// Wrap raw zone register values
    pub const fn new(zones: [u8; ZONE_COUNT]) -> Self {
        Self { zones }
    }

    /// True if at least one zone reports focus
    pub fn is_focused(&self) -> bool {
        self.zones.iter().any(|&z| z != 0)
    }

    /// Number of zones that report focus
    pub fn focused_zones(&self) -> usize {
        self.zones.iter().filter(|&&z| z != 0).count()
    }
}

impl From<[u8; ZONE_COUNT]> for FocusZoneResult {
    fn from(zones: [u8; ZONE_COUNT]) -> Self {
        Self::new(zones)
    }
}
