//! Board-agnostic core logic for the Lumen autofocus controller
//!
//! This crate contains everything about the autofocus coprocessor that
//! does not depend on a particular bus implementation:
//!
//! - Register, status, command and zone types (the wire vocabulary)
//! - Sensor model table and identification
//! - Error taxonomy shared by the driver layers
//! - Polling configuration
//! - Autofocus lifecycle state machine

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod camera;
pub mod config;
pub mod state;
