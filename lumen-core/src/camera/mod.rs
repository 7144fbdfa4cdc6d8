//! Camera autofocus coprocessor vocabulary
//!
//! Types shared by the register transport, firmware loader and command
//! state machine in `lumen-drivers`.

pub mod error;
pub mod sensor;
pub mod types;

pub use error::{LoadError, TransportError};
pub use sensor::SensorModel;
pub use types::{
    Command, CoprocessorStatus, FocusZoneResult, RegisterAddress, RegisterValue, REG_DELAY,
    ZONE_COUNT,
};
