//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use lumen_core::camera::FocusZoneResult;
use lumen_core::state::State;

/// Latest autofocus lifecycle state (updated by the autofocus task)
pub static AF_STATE: Signal<CriticalSectionRawMutex, State> = Signal::new();

/// Zone result of the most recent autofocus pass
pub static FOCUS_RESULT: Signal<CriticalSectionRawMutex, FocusZoneResult> = Signal::new();
