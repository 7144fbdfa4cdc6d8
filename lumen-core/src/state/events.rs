//! Events that trigger state transitions

use super::machine::ErrorKind;
use crate::camera::FocusZoneResult;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Firmware events
    /// Firmware upload started (first load or reload)
    LoadStarted,
    /// Coprocessor reported IDLE after upload
    LoadSucceeded,
    /// Upload failed
    LoadFailed(ErrorKind),
    /// No firmware image available to upload
    FirmwareMissing,

    // Focus events
    /// Caller asked for an autofocus pass
    FocusRequested,
    /// Pass finished with at least one zone in focus
    FocusFound,
    /// Pass finished with all zones zero (or the handshake timed out)
    FocusMissed,

    // Fault events
    /// Register transaction failed on the bus
    BusFault,
}

impl Event {
    /// Event describing the outcome of an autofocus pass
    pub fn from_focus_result(result: &FocusZoneResult) -> Self {
        if result.is_focused() {
            Event::FocusFound
        } else {
            Event::FocusMissed
        }
    }

    /// Check if this event indicates an error
    pub fn is_error_event(&self) -> bool {
        matches!(
            self,
            Event::LoadFailed(_) | Event::FirmwareMissing | Event::BusFault
        )
    }
}
