//! Autofocus task
//!
//! Owns I2C0 and runs the blocking OV5640 driver. Identifies the sensor,
//! uploads the autofocus firmware, then runs an autofocus pass every
//! refocus interval. A bus fault at any point backs off and retries; once
//! the sensor is known, a fault reloads the firmware.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker, Timer};

use lumen_core::config::AutofocusConfig;
use lumen_core::state::{ErrorKind, Event, State};
use lumen_drivers::camera::{identify, RegisterBus};
use lumen_drivers::Ov5640Autofocus;

use crate::channels::{AF_STATE, FOCUS_RESULT};

/// Time to wait before reloading firmware after a bus fault
const FAULT_BACKOFF: Duration = Duration::from_secs(2);

/// Autofocus task configuration
pub struct AutofocusTaskConfig {
    /// Driver configuration (address, poll windows)
    pub driver: AutofocusConfig,
    /// Autofocus MCU firmware image (empty if none was built in)
    pub firmware: &'static [u8],
    /// Delay between sensor power-up and the first chip-ID read
    pub power_up_delay: Duration,
    /// Time between autofocus passes
    pub refocus_interval: Duration,
}

/// Advance the lifecycle state and publish it
fn step(state: &mut State, event: Event) {
    let next = state.transition(event);
    if next != *state {
        debug!("autofocus {} --{}--> {}", *state, event, next);
        *state = next;
        AF_STATE.signal(next);
    }
}

/// Autofocus task
#[embassy_executor::task]
pub async fn autofocus_task(i2c: I2c<'static, I2C0, Blocking>, config: AutofocusTaskConfig) {
    info!("Autofocus task starting...");

    let mut bus = RegisterBus::new(i2c, config.driver.i2c_address);
    let mut delay = Delay;
    let mut state = State::Uninitialized;

    if config.firmware.is_empty() {
        warn!("No autofocus firmware built in, autofocus disabled");
        step(&mut state, Event::FirmwareMissing);
        return;
    }

    // Sensor needs time after power-up before it answers on I2C
    Timer::after(config.power_up_delay).await;

    let sensor = loop {
        match identify(&mut bus) {
            Ok(sensor) => break sensor,
            Err(e) => {
                error!("Sensor identification at {=u8:#x} failed: {}", bus.address(), e);
                step(&mut state, Event::BusFault);
                Timer::after(FAULT_BACKOFF).await;
            }
        }
    };
    info!("Detected {} sensor", sensor.name());

    let af = Ov5640Autofocus::new(&config.driver, sensor);

    loop {
        step(&mut state, Event::LoadStarted);
        info!("Loading {} bytes of autofocus firmware", config.firmware.len());

        if let Err(e) = af.load_autofocus_firmware(&mut bus, &mut delay, config.firmware) {
            error!("Autofocus firmware load failed: {}", e);
            step(&mut state, Event::LoadFailed(ErrorKind::from(&e)));
            if !state.should_retry() {
                return;
            }
            Timer::after(FAULT_BACKOFF).await;
            continue;
        }
        step(&mut state, Event::LoadSucceeded);
        info!("Autofocus ready");

        let mut ticker = Ticker::every(config.refocus_interval);
        while state.focus_allowed() {
            ticker.next().await;
            step(&mut state, Event::FocusRequested);

            match af.autofocus(&mut bus, &mut delay) {
                Ok(result) => {
                    if result.is_focused() {
                        info!(
                            "Focused, {} of 5 zones: {}",
                            result.focused_zones(),
                            result.zones
                        );
                    } else {
                        info!("No focus found");
                    }
                    FOCUS_RESULT.signal(result);
                    step(&mut state, Event::from_focus_result(&result));
                }
                Err(e) => {
                    error!("Autofocus bus fault: {}", e);
                    step(&mut state, Event::BusFault);
                }
            }
        }

        Timer::after(FAULT_BACKOFF).await;
    }
}
