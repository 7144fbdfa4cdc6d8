//! Sensor identification
//!
//! 16-bit-register OmniVision sensors report a chip ID in two
//! consecutive registers. Reading it is how the board learns which sensor
//! the loader's precondition should check against.

use embedded_hal::i2c::I2c;

use lumen_core::camera::{RegisterAddress, SensorModel, TransportError};

use super::transport::RegisterBus;

/// Chip ID high byte
pub const CHIP_ID_HIGH: RegisterAddress = 0x300A;
/// Chip ID low byte
pub const CHIP_ID_LOW: RegisterAddress = 0x300B;

/// Read the raw chip ID
pub fn read_chip_id<I2C: I2c>(bus: &mut RegisterBus<I2C>) -> Result<u16, TransportError> {
    let high = bus.read_register(CHIP_ID_HIGH)?;
    let low = bus.read_register(CHIP_ID_LOW)?;
    Ok(u16::from_be_bytes([high, low]))
}

/// Identify the attached sensor from its chip ID
pub fn identify<I2C: I2c>(bus: &mut RegisterBus<I2C>) -> Result<SensorModel, TransportError> {
    let id = read_chip_id(bus)?;

    #[cfg(feature = "defmt")]
    defmt::debug!("sensor chip id {=u16:#x}", id);

    Ok(SensorModel::from_chip_id(id))
}
