//! Wraps [`super::Intel8080`] with a breakpoint set and its persistence,
//! mirroring the C++ `DiagnosticCpu : public Cpu` split between the bare
//! execution engine and the tooling built on top of it.

use std::collections::BTreeSet;
use std::path::Path;

use super::Intel8080;
use crate::error::{BreakpointIoError, CpuError};
use crate::io::IoBus;
use crate::memory::Memory;

/// An `Intel8080` plus a set of breakpoint addresses. Checked after
/// executing each instruction: if the new `pc` is in the set, the CPU is
/// halted, which makes single-stepping through a breakpoint possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugCpu {
    pub cpu: Intel8080,
    breakpoints: BTreeSet<u16>,
}

impl DebugCpu {
    pub fn new(cpu: Intel8080) -> Self {
        Self {
            cpu,
            breakpoints: BTreeSet::new(),
        }
    }

    pub fn add_breakpoint(&mut self, addr: u16) {
        self.breakpoints.insert(addr);
    }

    pub fn remove_breakpoint(&mut self, addr: u16) {
        self.breakpoints.remove(&addr);
    }

    pub fn toggle_breakpoint(&mut self, addr: u16) {
        if !self.breakpoints.remove(&addr) {
            self.breakpoints.insert(addr);
        }
    }

    pub fn contains_breakpoint(&self, addr: u16) -> bool {
        self.breakpoints.contains(&addr)
    }

    pub fn step(&mut self, memory: &mut Memory, io: &mut dyn IoBus) -> Result<u64, CpuError> {
        let cycles = self.cpu.step(memory, io)?;
        if self.breakpoints.contains(&self.cpu.pc) {
            self.cpu.halted = true;
        }
        Ok(cycles)
    }

    /// Whitespace-separated decimal addresses, one file per breakpoint set.
    pub fn save_breakpoints(&self, path: impl AsRef<Path>) -> Result<(), BreakpointIoError> {
        let text = self
            .breakpoints
            .iter()
            .map(|addr| addr.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn load_breakpoints(&mut self, path: impl AsRef<Path>) -> Result<(), BreakpointIoError> {
        let text = std::fs::read_to_string(path)?;
        let mut parsed = BTreeSet::new();
        for token in text.split_whitespace() {
            let addr: u16 = token
                .parse()
                .map_err(|_| BreakpointIoError::Parse { line: token.to_string() })?;
            parsed.insert(addr);
        }
        self.breakpoints = parsed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SilentIo;

    #[test]
    fn breakpoint_add_remove_toggle() {
        let mut dbg = DebugCpu::new(Intel8080::new(true));
        assert!(!dbg.contains_breakpoint(0x100));
        dbg.add_breakpoint(0x100);
        assert!(dbg.contains_breakpoint(0x100));
        dbg.toggle_breakpoint(0x100);
        assert!(!dbg.contains_breakpoint(0x100));
        dbg.toggle_breakpoint(0x100);
        assert!(dbg.contains_breakpoint(0x100));
        dbg.remove_breakpoint(0x100);
        assert!(!dbg.contains_breakpoint(0x100));
    }

    #[test]
    fn step_halts_on_breakpoint() {
        let mut dbg = DebugCpu::new(Intel8080::new(true));
        let mut mem = Memory::new(0, 0x10000).unwrap();
        let mut io = SilentIo;
        mem.write(0, 0x00).unwrap();
        mem.write(1, 0x00).unwrap();
        dbg.add_breakpoint(1);
        dbg.step(&mut mem, &mut io).unwrap();
        assert!(dbg.cpu.halted);
        assert_eq!(dbg.cpu.pc, 1);
    }

    #[test]
    fn breakpoints_round_trip_through_file() {
        let mut dbg = DebugCpu::new(Intel8080::new(true));
        dbg.add_breakpoint(10);
        dbg.add_breakpoint(500);
        dbg.add_breakpoint(65535);
        let path = std::env::temp_dir().join("i8080_core_breakpoints_test.txt");
        dbg.save_breakpoints(&path).unwrap();

        let mut reloaded = DebugCpu::new(Intel8080::new(true));
        reloaded.load_breakpoints(&path).unwrap();
        assert!(reloaded.contains_breakpoint(10));
        assert!(reloaded.contains_breakpoint(500));
        assert!(reloaded.contains_breakpoint(65535));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_breakpoint_file_fails() {
        let mut dbg = DebugCpu::new(Intel8080::new(true));
        let path = std::env::temp_dir().join("i8080_core_breakpoints_malformed_test.txt");
        std::fs::write(&path, "10 not-a-number 20").unwrap();
        assert!(matches!(
            dbg.load_breakpoints(&path),
            Err(BreakpointIoError::Parse { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_breakpoint_file_fails() {
        let mut dbg = DebugCpu::new(Intel8080::new(true));
        assert!(matches!(
            dbg.load_breakpoints("/nonexistent/path/does-not-exist.txt"),
            Err(BreakpointIoError::Io(_))
        ));
    }
}
