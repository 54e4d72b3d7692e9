//! Error types for the memory, I/O, and CPU subsystems.
//!
//! Hand-rolled `Display` + `std::error::Error` impls, no `thiserror` — the
//! error surface here is small and this matches how the rest of the
//! workspace reports failures (see `i8080-arcade`'s `DiagnosticError`).

use std::fmt;

/// Errors raised by [`crate::memory::Memory`].
#[derive(Debug)]
pub enum MemoryError {
    /// `rom_size + ram_size` would exceed the 64 KiB address space.
    TooLarge {
        rom_size: usize,
        ram_size: usize,
        max: usize,
    },
    /// Read or write beyond `total_size`.
    AddressOutOfRange { addr: u32, total_size: usize },
    /// Write to an address below `rom_size`.
    WriteToRom { addr: u16, rom_size: usize },
    /// Bulk load would write past `total_size`.
    LoadOutOfRange {
        offset: usize,
        len: usize,
        total_size: usize,
    },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge {
                rom_size,
                ram_size,
                max,
            } => write!(
                f,
                "requested memory size ({rom_size} + {ram_size}) exceeds maximum size ({max})"
            ),
            Self::AddressOutOfRange { addr, total_size } => {
                write!(f, "memory address {addr:#06X} out of range (total size {total_size:#06X})")
            }
            Self::WriteToRom { addr, rom_size } => write!(
                f,
                "write to address {addr:#06X} rejected: within ROM region (0..{rom_size:#06X})"
            ),
            Self::LoadOutOfRange {
                offset,
                len,
                total_size,
            } => write!(
                f,
                "load of {len} bytes at offset {offset:#06X} exceeds memory bounds ({total_size:#06X})"
            ),
        }
    }
}

impl std::error::Error for MemoryError {}

/// Errors raised by an [`crate::io::IoBus`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// Read or write to a port the adapter does not implement.
    UnmappedPort(u8),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedPort(port) => write!(f, "I/O port {port} is not mapped"),
        }
    }
}

impl std::error::Error for IoError {}

/// Errors raised by [`crate::cpu::Intel8080`].
#[derive(Debug)]
pub enum CpuError {
    /// Propagated from a `Memory` access during fetch/decode/execute.
    Memory(MemoryError),
    /// Propagated from an `IoBus` access serving `IN`/`OUT`.
    Io(IoError),
    /// Fetched opcode has no defined behaviour and strict-opcode checking
    /// is enabled.
    InvalidOpcode(u8),
    /// `accept_restart_interrupt` was given a vector that is not one of
    /// {0, 8, 16, 24, 32, 40, 48, 56}.
    InvalidRestartVector(u8),
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "{e}"),
            Self::InvalidOpcode(op) => write!(f, "invalid opcode {op:#04X} encountered"),
            Self::InvalidRestartVector(vector) => {
                write!(f, "{vector} is not a valid restart vector (must be a multiple of 8 in 0..=56)")
            }
        }
    }
}

impl std::error::Error for CpuError {}

impl From<MemoryError> for CpuError {
    fn from(e: MemoryError) -> Self {
        Self::Memory(e)
    }
}

impl From<IoError> for CpuError {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

/// Errors raised by [`crate::cpu::debug::DebugCpu`] breakpoint persistence.
#[derive(Debug)]
pub enum BreakpointIoError {
    Io(std::io::Error),
    Parse { line: String },
}

impl fmt::Display for BreakpointIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { line } => write!(f, "malformed breakpoint entry: {line:?}"),
        }
    }
}

impl std::error::Error for BreakpointIoError {}

impl From<std::io::Error> for BreakpointIoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
