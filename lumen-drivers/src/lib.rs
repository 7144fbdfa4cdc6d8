//! Hardware driver implementations
//!
//! This crate provides the bus-facing half of the autofocus controller,
//! built on the `embedded-hal` 1.0 I2C and delay traits:
//!
//! - Register transport (16-bit address, 8-bit value)
//! - Sensor identification by chip ID
//! - OV5640 autofocus firmware loader
//! - OV5640 command/status handshake and zone readout

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod camera;

pub use camera::ov5640::Ov5640Autofocus;
pub use camera::RegisterBus;
