//! State machine definition
//!
//! The autofocus subsystem's availability is a function of the current
//! state and an event.

use super::events::Event;
use crate::camera::{LoadError, TransportError};

/// Autofocus subsystem states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Power-on, no firmware uploaded yet
    Uninitialized,
    /// Firmware upload and finalization in progress
    Loading,
    /// Firmware running, no focus pass performed yet
    Ready,
    /// Autofocus pass in progress
    Focusing,
    /// Last pass found focus in at least one zone
    Focused,
    /// Last pass found nothing; the camera can still capture
    Unfocused,
    /// Autofocus unavailable; capture proceeds without focus
    Error(ErrorKind),
}

/// Reasons autofocus is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Sensor has no autofocus coprocessor
    UnsupportedSensor,
    /// Coprocessor never reached IDLE after upload
    LoadTimeout,
    /// Firmware image larger than instruction memory
    ImageTooLarge,
    /// Register transaction failed on the bus
    BusFault,
    /// No firmware image was provided
    NoFirmware,
}

impl From<&LoadError> for ErrorKind {
    fn from(e: &LoadError) -> Self {
        match e {
            LoadError::Transport(_) => ErrorKind::BusFault,
            LoadError::UnsupportedSensor(_) => ErrorKind::UnsupportedSensor,
            LoadError::ImageTooLarge { .. } => ErrorKind::ImageTooLarge,
            LoadError::LoadTimeout { .. } => ErrorKind::LoadTimeout,
        }
    }
}

impl From<TransportError> for ErrorKind {
    fn from(_: TransportError) -> Self {
        ErrorKind::BusFault
    }
}

impl ErrorKind {
    /// Whether the failure points at hardware rather than configuration
    pub fn is_hardware_fault(&self) -> bool {
        matches!(self, ErrorKind::BusFault | ErrorKind::LoadTimeout)
    }
}

impl State {
    /// Check if an autofocus pass may be started
    pub fn focus_allowed(&self) -> bool {
        matches!(self, State::Ready | State::Focused | State::Unfocused)
    }

    /// Check if firmware is loaded and running
    pub fn is_loaded(&self) -> bool {
        matches!(
            self,
            State::Ready | State::Focusing | State::Focused | State::Unfocused
        )
    }

    /// Check if this is an error state
    pub fn is_error(&self) -> bool {
        matches!(self, State::Error(_))
    }

    /// Check if a reload after backoff may clear this state
    ///
    /// Only hardware faults qualify; an unsupported sensor, an oversized
    /// image or a missing image fail the same way on every attempt.
    pub fn should_retry(&self) -> bool {
        matches!(self, State::Error(kind) if kind.is_hardware_fault())
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Bus faults end any operation
            (_, BusFault) => Error(ErrorKind::BusFault),

            // Uninitialized transitions
            (Uninitialized, LoadStarted) => Loading,
            (Uninitialized, FirmwareMissing) => Error(ErrorKind::NoFirmware),

            // Loading transitions
            (Loading, LoadSucceeded) => Ready,
            (Loading, LoadFailed(kind)) => Error(kind),

            // Loaded transitions
            (Ready | Focused | Unfocused, FocusRequested) => Focusing,
            (Ready | Focused | Unfocused, LoadStarted) => Loading,

            // Focusing transitions
            (Focusing, FocusFound) => Focused,
            (Focusing, FocusMissed) => Unfocused,

            // Error transitions (reload retries)
            (Error(_), LoadStarted) => Loading,

            // Default: stay in current state
            _ => self,
        }
    }
}
