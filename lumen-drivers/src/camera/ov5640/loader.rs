//! Firmware upload
//!
//! Load sequence:
//!
//! 1. hold the MCU in reset (`0x3000 <- 0x20`)
//! 2. write image byte `i` to `0x8000 + i`, one transaction per byte
//! 3. clear the command registers, mark status FIRMWARE_BAD and release
//!    the MCU from reset
//! 4. poll the status register until the firmware reports IDLE
//!
//! Step 3 writes `0x7F` into the status register so a stale IDLE from a
//! previous load can never satisfy step 4.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use lumen_core::camera::{
    CoprocessorStatus, LoadError, RegisterAddress, RegisterValue, SensorModel, REG_DELAY,
};
use lumen_core::config::PollPolicy;

use super::reg;
use super::RESET_MCU;
use crate::camera::poll::{poll, PollOutcome};
use crate::camera::transport::RegisterBus;

/// First instruction-memory address
pub const FIRMWARE_BASE: RegisterAddress = 0x8000;

/// Largest image that fits below the delay sentinel
pub const MAX_IMAGE_LEN: usize = (REG_DELAY - FIRMWARE_BASE) as usize;

/// Register writes that hand control to freshly uploaded firmware
pub const FINALIZE_FIRMWARE_LOAD: [(RegisterAddress, RegisterValue); 9] = [
    (reg::CMD_MAIN, 0x00),
    (reg::CMD_ACK, 0x00),
    (reg::CMD_PARA0, 0x00),
    (reg::CMD_PARA1, 0x00),
    (reg::CMD_PARA2, 0x00),
    (reg::CMD_PARA3, 0x00),
    (reg::CMD_PARA4, 0x00),
    (reg::FW_STATUS, CoprocessorStatus::RAW_FIRMWARE_BAD),
    (reg::SYSTEM_RESET00, 0x00),
];

/// Uploads autofocus firmware to the coprocessor
#[derive(Debug, Clone)]
pub struct FirmwareLoader {
    sensor: SensorModel,
    poll: PollPolicy,
}

impl FirmwareLoader {
    pub fn new(sensor: SensorModel, poll: PollPolicy) -> Self {
        Self { sensor, poll }
    }

    pub fn sensor(&self) -> &SensorModel {
        &self.sensor
    }

    /// Upload `image` and wait for IDLE
    ///
    /// Can be called again at any time; each call repeats the full
    /// sequence from reset.
    pub fn load<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
        image: &[u8],
    ) -> Result<(), LoadError> {
        if !self.sensor.supports_autofocus() {
            return Err(LoadError::UnsupportedSensor(self.sensor.clone()));
        }
        if image.len() > MAX_IMAGE_LEN {
            return Err(LoadError::ImageTooLarge { len: image.len() });
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("uploading {=usize} bytes of autofocus firmware", image.len());

        bus.write_register(reg::SYSTEM_RESET00, RESET_MCU)?;

        for (offset, &byte) in image.iter().enumerate() {
            bus.write_register(FIRMWARE_BASE + offset as u16, byte)?;
        }

        bus.write_register_list(delay, &FINALIZE_FIRMWARE_LOAD)?;

        let outcome = poll(
            self.poll,
            delay,
            || bus.read_register(reg::FW_STATUS).map(CoprocessorStatus::from_raw),
            |status| *status == CoprocessorStatus::Idle,
        )?;

        match outcome {
            PollOutcome::Matched { attempts, .. } => {
                #[cfg(feature = "defmt")]
                defmt::info!("autofocus firmware idle after {=u16} polls", attempts);
                #[cfg(not(feature = "defmt"))]
                let _ = attempts;
                Ok(())
            }
            PollOutcome::Exhausted { last } => {
                #[cfg(feature = "defmt")]
                defmt::warn!("autofocus firmware never went idle, last status {}", last);
                Err(LoadError::LoadTimeout { last_status: last })
            }
        }
    }
}
