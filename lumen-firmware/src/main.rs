//! Lumen - Camera Autofocus Firmware
//!
//! Main firmware binary for RP2040-based camera boards carrying an OV5640.
//! Uploads the sensor's autofocus MCU firmware over I2C and runs periodic
//! focus passes, config-driven from camera.toml.
//!
//! Named after the unit of luminous flux - the light the lens is trying
//! to bring into focus.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::i2c::{self, I2c};
use embassy_time::Duration;
use {defmt_rtt as _, panic_probe as _};

use crate::channels::{AF_STATE, FOCUS_RESULT};

mod channels;
mod config;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lumen firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // I2C0 for the sensor (GPIO5 = SCL, GPIO4 = SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config::I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    info!(
        "I2C0 at {} Hz, sensor address {=u8:#x}",
        config::I2C_FREQUENCY_HZ,
        config::I2C_ADDRESS
    );

    let af_config = tasks::AutofocusTaskConfig {
        driver: config::autofocus_config(),
        firmware: config::AF_FIRMWARE,
        power_up_delay: Duration::from_millis(config::POWER_UP_DELAY_MS),
        refocus_interval: config::refocus_interval(),
    };

    // Spawn tasks
    spawner
        .spawn(tasks::autofocus_task(i2c, af_config))
        .unwrap();

    info!("All tasks spawned");

    // Report lifecycle and focus results
    loop {
        match select(AF_STATE.wait(), FOCUS_RESULT.wait()).await {
            Either::First(state) => {
                if state.is_error() {
                    warn!("Autofocus state: {}", state);
                } else {
                    info!("Autofocus state: {}", state);
                }
            }
            Either::Second(result) => {
                trace!("Focus zones: {}", result.zones);
            }
        }
    }
}
