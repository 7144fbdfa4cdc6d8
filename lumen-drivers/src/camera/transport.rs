//! Register transport
//!
//! OmniVision sensors expose their registers behind a two-byte address:
//!
//! ```text
//! write: [ADDR_HI][ADDR_LO][VALUE]                 (one I2C write)
//! read:  [ADDR_HI][ADDR_LO] <repeated start> [VALUE] (one I2C write_read)
//! ```
//!
//! The target keeps no address pointer between transactions, so a read is
//! always issued as a single `write_read`. Bus errors are returned as-is;
//! retry policy belongs to the caller.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, I2c};

use lumen_core::camera::{RegisterAddress, RegisterValue, TransportError, REG_DELAY};

/// Map any `embedded-hal` I2C error onto [`TransportError`]
pub fn transport_error<E: embedded_hal::i2c::Error>(e: E) -> TransportError {
    match e.kind() {
        ErrorKind::NoAcknowledge(_) => TransportError::NoAcknowledge,
        ErrorKind::ArbitrationLoss => TransportError::ArbitrationLoss,
        ErrorKind::Bus => TransportError::Bus,
        ErrorKind::Overrun => TransportError::Overrun,
        _ => TransportError::Other,
    }
}

/// 16-bit-addressed register access to one sensor on an I2C bus
pub struct RegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> RegisterBus<I2C> {
    /// Wrap an I2C bus for the sensor at `address` (7-bit)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Sensor I2C address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Write one register
    pub fn write_register(
        &mut self,
        reg: RegisterAddress,
        value: RegisterValue,
    ) -> Result<(), TransportError> {
        let [hi, lo] = reg.to_be_bytes();
        self.i2c
            .write(self.address, &[hi, lo, value])
            .map_err(transport_error)
    }

    /// Read one register
    pub fn read_register(&mut self, reg: RegisterAddress) -> Result<RegisterValue, TransportError> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &reg.to_be_bytes(), &mut value)
            .map_err(transport_error)?;
        Ok(value[0])
    }

    /// Read consecutive registers starting at `start`, one transaction each
    pub fn read_registers(
        &mut self,
        start: RegisterAddress,
        buf: &mut [RegisterValue],
    ) -> Result<(), TransportError> {
        for (offset, slot) in buf.iter_mut().enumerate() {
            *slot = self.read_register(start.wrapping_add(offset as u16))?;
        }
        Ok(())
    }

    /// Apply a register list in order
    ///
    /// An entry addressed [`REG_DELAY`] sleeps for its value in
    /// milliseconds instead of writing.
    pub fn write_register_list<D: DelayNs>(
        &mut self,
        delay: &mut D,
        list: &[(RegisterAddress, RegisterValue)],
    ) -> Result<(), TransportError> {
        for &(reg, value) in list {
            if reg == REG_DELAY {
                delay.delay_ms(value as u32);
            } else {
                self.write_register(reg, value)?;
            }
        }
        Ok(())
    }
}
