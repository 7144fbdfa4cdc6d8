//! Configuration types
//!
//! Board-agnostic autofocus configuration. Defaults reproduce the fixed
//! polling windows the coprocessor was characterised with.

pub mod types;

pub use types::*;
