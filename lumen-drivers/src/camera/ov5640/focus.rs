//! Command handshake and focus operations
//!
//! Every command uses the same handshake: arm `CMD_ACK` with `0x01`, write
//! the command code to `CMD_MAIN`, then poll `CMD_ACK` until the firmware
//! clears it. A handshake that never clears is reported as `false`, not
//! as an error.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use lumen_core::camera::{
    Command, CoprocessorStatus, FocusZoneResult, TransportError, ZONE_COUNT,
};
use lumen_core::config::PollPolicy;

use super::{reg, ACK_ARM};
use crate::camera::poll::poll;
use crate::camera::transport::RegisterBus;

/// Issues commands to loaded autofocus firmware
#[derive(Debug, Clone, Copy)]
pub struct FocusController {
    poll: PollPolicy,
}

impl FocusController {
    pub fn new(poll: PollPolicy) -> Self {
        Self { poll }
    }

    /// Read and decode the firmware status register
    pub fn status<I2C: I2c>(
        &self,
        bus: &mut RegisterBus<I2C>,
    ) -> Result<CoprocessorStatus, TransportError> {
        bus.read_register(reg::FW_STATUS)
            .map(CoprocessorStatus::from_raw)
    }

    /// Send one command and wait for the acknowledge to clear
    ///
    /// Returns `Ok(false)` if the polling window ran out first.
    pub fn send_command<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
        command: Command,
    ) -> Result<bool, TransportError> {
        bus.write_register(reg::CMD_ACK, ACK_ARM)?;
        bus.write_register(reg::CMD_MAIN, command.code())?;

        let outcome = poll(
            self.poll,
            delay,
            || bus.read_register(reg::CMD_ACK),
            |&ack| ack == 0,
        )?;

        #[cfg(feature = "defmt")]
        if !outcome.is_matched() {
            defmt::warn!("command {} not acknowledged", command);
        }

        Ok(outcome.is_matched())
    }

    /// Release the lens, trigger a single pass and read back the zones
    ///
    /// Yields [`FocusZoneResult::FAILED`] without touching the zone
    /// registers if either handshake times out.
    pub fn autofocus<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
    ) -> Result<FocusZoneResult, TransportError> {
        if !self.send_command(bus, delay, Command::ReleaseFocus)? {
            return Ok(FocusZoneResult::FAILED);
        }
        if !self.send_command(bus, delay, Command::TriggerAutofocus)? {
            return Ok(FocusZoneResult::FAILED);
        }

        let mut zones = [0u8; ZONE_COUNT];
        bus.read_registers(reg::CMD_PARA0, &mut zones)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("focus zones {=[u8]}", &zones[..]);

        Ok(FocusZoneResult::new(zones))
    }

    /// Return the lens to its rest position
    pub fn release_focus<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
    ) -> Result<bool, TransportError> {
        self.send_command(bus, delay, Command::ReleaseFocus)
    }

    /// Hand focus control to the firmware's continuous mode
    pub fn continuous_autofocus<I2C: I2c, D: DelayNs>(
        &self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
    ) -> Result<bool, TransportError> {
        self.send_command(bus, delay, Command::AutoAutofocus)
    }
}
