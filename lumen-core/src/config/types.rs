//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default 7-bit I2C address of the OV5640
pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;

/// Default number of polls before giving up
pub const DEFAULT_POLL_ATTEMPTS: u16 = 100;

/// Default delay between polls in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// Fixed-count polling window
///
/// A poll loop reads at most `max_attempts` times and sleeps
/// `interval_ms` after every read that did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PollPolicy {
    /// Maximum number of reads
    pub max_attempts: u16,
    /// Delay after each unsuccessful read (ms)
    pub interval_ms: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollPolicy {
    /// Create a polling window
    pub const fn new(max_attempts: u16, interval_ms: u32) -> Self {
        Self {
            max_attempts,
            interval_ms,
        }
    }

    /// Same attempt count with no sleeping, for simulated hardware
    pub const fn immediate(max_attempts: u16) -> Self {
        Self::new(max_attempts, 0)
    }

    /// Worst-case time spent sleeping before the window is exhausted (ms)
    pub fn worst_case_ms(&self) -> u32 {
        (self.max_attempts as u32).saturating_mul(self.interval_ms)
    }
}

/// Autofocus controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AutofocusConfig {
    /// 7-bit I2C address of the sensor
    pub i2c_address: u8,
    /// Window for the post-load wait for IDLE
    pub load_poll: PollPolicy,
    /// Window for each command acknowledge
    pub command_poll: PollPolicy,
}

impl Default for AutofocusConfig {
    fn default() -> Self {
        Self {
            i2c_address: DEFAULT_I2C_ADDRESS,
            load_poll: PollPolicy::default(),
            command_poll: PollPolicy::default(),
        }
    }
}
