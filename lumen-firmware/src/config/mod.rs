//! Board configuration
//!
//! Constants are generated by build.rs from camera.toml, which is
//! validated at build time.

use embassy_time::Duration;

use lumen_core::config::{AutofocusConfig, PollPolicy};

include!(concat!(env!("OUT_DIR"), "/camera_config.rs"));

/// Driver configuration assembled from camera.toml
pub const fn autofocus_config() -> AutofocusConfig {
    AutofocusConfig {
        i2c_address: I2C_ADDRESS,
        load_poll: LOAD_POLL,
        command_poll: COMMAND_POLL,
    }
}

/// Time between autofocus passes
pub const fn refocus_interval() -> Duration {
    Duration::from_secs(REFOCUS_INTERVAL_S)
}
