//! Abstract read/write of the 256 I/O ports. `i8080-arcade`'s `CabinetIo`
//! is the interesting implementation; the two here are the plain ones a
//! caller reaches for when there's no real hardware on the other end.

use crate::error::IoError;

/// A small capability interface for port-mapped I/O, analogous to `Bus`
/// for memory: concrete device wiring lives behind the trait object, not
/// in the CPU core.
pub trait IoBus {
    fn read(&mut self, port: u8) -> Result<u8, IoError>;
    fn write(&mut self, port: u8, value: u8) -> Result<(), IoError>;
}

/// Every access is an error. Useful as a default/safety net so forgetting
/// to wire up real I/O fails loudly instead of silently.
#[derive(Debug, Default, Clone, Copy)]
pub struct FaultingIo;

impl IoBus for FaultingIo {
    fn read(&mut self, port: u8) -> Result<u8, IoError> {
        Err(IoError::UnmappedPort(port))
    }

    fn write(&mut self, port: u8, _value: u8) -> Result<(), IoError> {
        Err(IoError::UnmappedPort(port))
    }
}

/// Reads return the bus-float value, writes are accepted and discarded.
/// Used by the CP/M diagnostic harness, which never touches real I/O
/// hardware.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentIo;

impl IoBus for SilentIo {
    fn read(&mut self, _port: u8) -> Result<u8, IoError> {
        Ok(0xFF)
    }

    fn write(&mut self, _port: u8, _value: u8) -> Result<(), IoError> {
        Ok(())
    }
}
