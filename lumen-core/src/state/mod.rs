//! Autofocus lifecycle state machine
//!
//! Tracks what the embedding application knows about the autofocus
//! subsystem: whether firmware is loaded and what the last focus pass
//! produced. The coprocessor's own status register is never mirrored here;
//! it is read fresh on every poll.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{ErrorKind, State};
