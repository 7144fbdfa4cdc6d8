//! OV5640 autofocus coprocessor
//!
//! The OV5640 carries a small MCU that runs the autofocus algorithm. It
//! boots from firmware uploaded into instruction memory at `0x8000` and is
//! then driven through a handful of command registers:
//!
//! ```text
//! 0x3022  CMD_MAIN    command code
//! 0x3023  CMD_ACK     nonzero while a command is pending
//! 0x3024  CMD_PARA0   zone 0 result
//!   ...
//! 0x3028  CMD_PARA4   zone 4 result
//! 0x3029  FW_STATUS   coprocessor status
//! ```
//!
//! Every operation borrows the [`RegisterBus`] for its duration; the
//! caller keeps ownership and is responsible for serialising access with
//! other devices on the same bus.

pub mod focus;
pub mod loader;

pub use focus::FocusController;
pub use loader::{FirmwareLoader, FINALIZE_FIRMWARE_LOAD, FIRMWARE_BASE, MAX_IMAGE_LEN};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use lumen_core::camera::{
    CoprocessorStatus, FocusZoneResult, LoadError, SensorModel, TransportError,
};
use lumen_core::config::AutofocusConfig;

use super::transport::RegisterBus;

/// OV5640 register addresses used by the autofocus protocol
pub mod reg {
    use lumen_core::camera::RegisterAddress;

    /// System reset control (bit 5 holds the MCU in reset)
    pub const SYSTEM_RESET00: RegisterAddress = 0x3000;
    /// Main command register
    pub const CMD_MAIN: RegisterAddress = 0x3022;
    /// Command acknowledge
    pub const CMD_ACK: RegisterAddress = 0x3023;
    /// First command parameter / zone result
    pub const CMD_PARA0: RegisterAddress = 0x3024;
    /// Second command parameter / zone result
    pub const CMD_PARA1: RegisterAddress = 0x3025;
    /// Third command parameter / zone result
    pub const CMD_PARA2: RegisterAddress = 0x3026;
    /// Fourth command parameter / zone result
    pub const CMD_PARA3: RegisterAddress = 0x3027;
    /// Fifth command parameter / zone result
    pub const CMD_PARA4: RegisterAddress = 0x3028;
    /// Firmware status
    pub const FW_STATUS: RegisterAddress = 0x3029;
}

/// Value written to SYSTEM_RESET00 to reset the MCU before upload
pub const RESET_MCU: u8 = 0x20;

/// Value written to CMD_ACK to arm it before a command
pub const ACK_ARM: u8 = 0x01;

/// Autofocus operations exposed to the embedding application
///
/// Holds only configuration and the sensor identity; the bus and delay
/// are lent to each call.
#[derive(Debug, Clone)]
pub struct Ov5640Autofocus {
    loader: FirmwareLoader,
    focus: FocusController,
}

impl Ov5640Autofocus {
    /// Create the autofocus front-end for the given sensor
    pub fn new(config: &AutofocusConfig, sensor: SensorModel) -> Self {
        Self {
            loader: FirmwareLoader::new(sensor, config.load_poll),
            focus: FocusController::new(config.command_poll),
        }
    }

    /// Sensor this front-end was created for
    pub fn sensor(&self) -> &SensorModel {
        self.loader.sensor()
    }

    /// Upload autofocus firmware and wait for the coprocessor to go idle
    pub fn load_autofocus_firmware<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
        image: &[u8],
    ) -> Result<(), LoadError> {
        self.loader.load(bus, delay, image)
    }

    /// Run one autofocus pass
    ///
    /// Returns [`FocusZoneResult::FAILED`] if the coprocessor did not
    /// acknowledge a command in time.
    pub fn autofocus<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
    ) -> Result<FocusZoneResult, TransportError> {
        self.focus.autofocus(bus, delay)
    }

    /// Read the coprocessor status register
    pub fn autofocus_status<I2C: I2c>(
        &self,
        bus: &mut RegisterBus<I2C>,
    ) -> Result<CoprocessorStatus, TransportError> {
        self.focus.status(bus)
    }

    /// Release the lens to its rest position
    pub fn release_focus<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
    ) -> Result<bool, TransportError> {
        self.focus.release_focus(bus, delay)
    }

    /// Switch the coprocessor to continuous autofocus
    pub fn continuous_autofocus<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
    ) -> Result<bool, TransportError> {
        self.focus.continuous_autofocus(bus, delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::sim::{SimCamera, SimDelay, SIM_ADDRESS};
    use lumen_core::config::PollPolicy;

    fn config() -> AutofocusConfig {
        AutofocusConfig {
            load_poll: PollPolicy::immediate(100),
            command_poll: PollPolicy::immediate(100),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_then_focus() {
        let sim = SimCamera::new().idle_after(3).ack_after(2);
        let mut bus = RegisterBus::new(sim, SIM_ADDRESS);
        let mut delay = SimDelay::new();
        let af = Ov5640Autofocus::new(&config(), SensorModel::Ov5640);

        af.load_autofocus_firmware(&mut bus, &mut delay, &[0xAA, 0xBB])
            .unwrap();
        assert_eq!(af.autofocus_status(&mut bus), Ok(CoprocessorStatus::Idle));

        // Finalization zeroes the zone registers; the simulated MCU fills one in
        let mut sim = bus.release();
        sim = sim.with_register(reg::CMD_PARA2, 9);
        let mut bus = RegisterBus::new(sim, SIM_ADDRESS);

        let result = af.autofocus(&mut bus, &mut delay).unwrap();
        assert_eq!(result.zones, [0, 0, 9, 0, 0]);
    }

    #[test]
    fn test_unsupported_sensor_front_end() {
        let mut bus = RegisterBus::new(SimCamera::new(), SIM_ADDRESS);
        let mut delay = SimDelay::new();
        let af = Ov5640Autofocus::new(&config(), SensorModel::Ov2640);

        assert_eq!(af.sensor(), &SensorModel::Ov2640);
        assert_eq!(
            af.load_autofocus_firmware(&mut bus, &mut delay, &[1, 2, 3]),
            Err(LoadError::UnsupportedSensor(SensorModel::Ov2640))
        );
    }

    #[test]
    fn test_continuous_and_release() {
        let mut bus = RegisterBus::new(SimCamera::new().ack_after(1), SIM_ADDRESS);
        let mut delay = SimDelay::new();
        let af = Ov5640Autofocus::new(&config(), SensorModel::Ov5640);

        assert_eq!(af.continuous_autofocus(&mut bus, &mut delay), Ok(true));
        assert_eq!(af.release_focus(&mut bus, &mut delay), Ok(true));

        let sim = bus.release();
        let commands: Vec<u8> = sim
            .writes()
            .into_iter()
            .filter(|(reg, _)| *reg == reg::CMD_MAIN)
            .map(|(_, value)| value)
            .collect();
        assert_eq!(commands, vec![0x04, 0x08]);
    }
}
