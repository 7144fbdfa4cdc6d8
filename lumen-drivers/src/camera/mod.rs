//! Camera sensor drivers
//!
//! Everything here talks to the sensor through a [`RegisterBus`] that the
//! caller owns and lends to each operation. Nothing keeps a bus handle of
//! its own between calls.

pub mod ident;
pub mod ov5640;
pub mod poll;
pub mod transport;

#[cfg(test)]
pub(crate) mod sim;

pub use ident::identify;
pub use poll::{poll, PollOutcome};
pub use transport::{transport_error, RegisterBus};
