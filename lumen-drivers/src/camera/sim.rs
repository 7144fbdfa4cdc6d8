//! Simulated OV5640 for host tests
//!
//! A flat 64K register file behind an `embedded-hal` I2C target, plus
//! optional scripts for the two registers the coprocessor drives itself
//! (firmware status and command ack). Every transaction is logged.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use super::ov5640::reg;
use lumen_core::camera::{CoprocessorStatus, RegisterAddress, RegisterValue};

/// Address the simulated sensor answers on
pub const SIM_ADDRESS: u8 = 0x3C;

/// One completed register transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Write(RegisterAddress, RegisterValue),
    Read(RegisterAddress),
}

impl Transaction {
    pub fn register(&self) -> RegisterAddress {
        match self {
            Transaction::Write(reg, _) | Transaction::Read(reg) => *reg,
        }
    }
}

pub struct SimCamera {
    regs: Vec<u8>,
    log: Vec<Transaction>,
    frames: Vec<Vec<u8>>,
    transactions: usize,
    /// Status read number (1-based) that first reports IDLE
    idle_after: Option<usize>,
    status_reads: usize,
    /// Ack poll number (1-based, per command) that first reads zero
    ack_after: Option<usize>,
    ack_polls: usize,
    fault: Option<(RegisterAddress, ErrorKind)>,
}

impl SimCamera {
    /// Plain register file, all zeros
    pub fn new() -> Self {
        Self {
            regs: vec![0; 0x1_0000],
            log: Vec::new(),
            frames: Vec::new(),
            transactions: 0,
            idle_after: None,
            status_reads: 0,
            ack_after: None,
            ack_polls: 0,
            fault: None,
        }
    }

    /// Report STARTUP until the `k`-th status read, which reports IDLE
    pub fn idle_after(mut self, k: usize) -> Self {
        self.idle_after = Some(k);
        self
    }

    /// Clear the ack register on the `n`-th poll after each command
    pub fn ack_after(mut self, n: usize) -> Self {
        self.ack_after = Some(n);
        self
    }

    /// Preset a register without logging
    pub fn with_register(mut self, reg: RegisterAddress, value: RegisterValue) -> Self {
        self.regs[reg as usize] = value;
        self
    }

    /// Fail every transaction that touches `reg`
    pub fn fail_on(&mut self, reg: RegisterAddress, kind: ErrorKind) {
        self.fault = Some((reg, kind));
    }

    pub fn log(&self) -> &[Transaction] {
        &self.log
    }

    /// Raw bytes of every successful write transaction
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Transactions attempted, including failed ones
    pub fn transaction_count(&self) -> usize {
        self.transactions
    }

    pub fn writes(&self) -> Vec<(RegisterAddress, RegisterValue)> {
        self.log
            .iter()
            .filter_map(|t| match *t {
                Transaction::Write(reg, value) => Some((reg, value)),
                Transaction::Read(_) => None,
            })
            .collect()
    }

    pub fn reads_of(&self, reg: RegisterAddress) -> usize {
        self.log
            .iter()
            .filter(|t| **t == Transaction::Read(reg))
            .count()
    }

    pub fn register(&self, reg: RegisterAddress) -> RegisterValue {
        self.regs[reg as usize]
    }

    fn check_fault(&self, reg: RegisterAddress) -> Result<(), ErrorKind> {
        match self.fault {
            Some((faulty, kind)) if faulty == reg => Err(kind),
            _ => Ok(()),
        }
    }

    fn on_write(&mut self, reg: RegisterAddress, value: RegisterValue) {
        if reg == reg::CMD_ACK {
            self.ack_polls = 0;
        }
        self.regs[reg as usize] = value;
    }

    fn on_read(&mut self, reg: RegisterAddress) -> RegisterValue {
        if reg == reg::FW_STATUS {
            if let Some(k) = self.idle_after {
                self.status_reads += 1;
                return if self.status_reads >= k {
                    CoprocessorStatus::Idle.raw()
                } else {
                    CoprocessorStatus::Startup.raw()
                };
            }
        }
        if reg == reg::CMD_ACK {
            if let Some(n) = self.ack_after {
                self.ack_polls += 1;
                if self.ack_polls >= n {
                    self.regs[reg as usize] = 0;
                }
            }
        }
        self.regs[reg as usize]
    }
}

impl ErrorType for SimCamera {
    type Error = ErrorKind;
}

impl I2c for SimCamera {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        if address != SIM_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        match operations {
            [Operation::Write(bytes)] if bytes.len() == 3 => {
                let reg = u16::from_be_bytes([bytes[0], bytes[1]]);
                self.check_fault(reg)?;
                self.frames.push(bytes.to_vec());
                self.log.push(Transaction::Write(reg, bytes[2]));
                self.on_write(reg, bytes[2]);
                Ok(())
            }
            [Operation::Write(addr), Operation::Read(buf)] if addr.len() == 2 && buf.len() == 1 => {
                let reg = u16::from_be_bytes([addr[0], addr[1]]);
                self.check_fault(reg)?;
                self.log.push(Transaction::Read(reg));
                buf[0] = self.on_read(reg);
                Ok(())
            }
            _ => panic!("unexpected transaction shape ({} operations)", operations.len()),
        }
    }
}

/// Delay that records requested sleeps instead of blocking
pub struct SimDelay {
    sleeps_ms: Vec<u32>,
}

impl SimDelay {
    pub fn new() -> Self {
        Self {
            sleeps_ms: Vec::new(),
        }
    }

    pub fn sleeps_ms(&self) -> &[u32] {
        &self.sleeps_ms
    }

    pub fn total_ms(&self) -> u32 {
        self.sleeps_ms.iter().sum()
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sleeps_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleeps_ms.push(ms);
    }
}
