//! Error types for the arcade-specific layer built on `i8080-core`.

use std::fmt;

use i8080_core::error::{CpuError, MemoryError};

/// Failures that can end a CP/M diagnostic run early: building or loading
/// the memory image, or a CPU fault while the program executes.
#[derive(Debug)]
pub enum DiagnosticError {
    Memory(MemoryError),
    Cpu(CpuError),
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(e) => write!(f, "{e}"),
            Self::Cpu(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DiagnosticError {}

impl From<MemoryError> for DiagnosticError {
    fn from(e: MemoryError) -> Self {
        Self::Memory(e)
    }
}

impl From<CpuError> for DiagnosticError {
    fn from(e: CpuError) -> Self {
        Self::Cpu(e)
    }
}
