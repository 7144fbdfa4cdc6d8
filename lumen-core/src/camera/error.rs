//! Error taxonomy for coprocessor communication
//!
//! Bus faults and load failures are kept apart from the "no focus found"
//! outcome, which is a normal return value and never an error.

use super::sensor::SensorModel;
use super::types::CoprocessorStatus;

/// Bus-level failure of a single register transaction
///
/// Never retried by the transport; retry policy belongs to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Target did not acknowledge its address or a data byte
    NoAcknowledge,
    /// Lost arbitration to another bus master
    ArbitrationLoss,
    /// Misplaced start/stop or other bus-level fault
    Bus,
    /// Peripheral data overrun
    Overrun,
    /// Other implementation-specific failure (including bus timeout)
    Other,
}

/// Failure of a firmware load
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Bus failure during reset, upload, finalization or polling
    Transport(TransportError),
    /// Attached sensor has no autofocus coprocessor; no bus traffic was sent
    UnsupportedSensor(SensorModel),
    /// Image does not fit in the instruction memory window
    ImageTooLarge {
        /// Image length in bytes
        len: usize,
    },
    /// Coprocessor never reported IDLE within the polling window
    LoadTimeout {
        /// Status seen on the final poll (`None` if the window was empty)
        last_status: Option<CoprocessorStatus>,
    },
}

impl From<TransportError> for LoadError {
    fn from(e: TransportError) -> Self {
        LoadError::Transport(e)
    }
}

impl LoadError {
    /// True if the failure came from the bus rather than the coprocessor
    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_converts() {
        let err: LoadError = TransportError::NoAcknowledge.into();
        assert_eq!(err, LoadError::Transport(TransportError::NoAcknowledge));
        assert!(err.is_transport());
    }

    #[test]
    fn test_load_errors_distinguishable() {
        let timeout = LoadError::LoadTimeout {
            last_status: Some(CoprocessorStatus::Startup),
        };
        let unsupported = LoadError::UnsupportedSensor(SensorModel::Ov2640);

        assert!(!timeout.is_transport());
        assert!(!unsupported.is_transport());
        assert_ne!(timeout, unsupported);
    }
}
