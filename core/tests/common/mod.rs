//! Shared test scaffolding: a fully-RAM `Memory` and a harness that assembles
//! a tiny program, runs it for a fixed number of steps, and hands back the
//! CPU for assertions.

use i8080_core::io::SilentIo;
use i8080_core::memory::Memory;
use i8080_core::prelude::Intel8080;

pub fn ram_only() -> Memory {
    Memory::new(0, 0x10000).unwrap()
}

pub fn load_program(mem: &mut Memory, at: u16, bytes: &[u8]) {
    mem.load(at as usize, bytes).unwrap();
}

pub struct Harness {
    pub cpu: Intel8080,
    pub mem: Memory,
    pub io: SilentIo,
}

impl Harness {
    pub fn new(strict_opcodes: bool) -> Self {
        Self {
            cpu: Intel8080::new(strict_opcodes),
            mem: ram_only(),
            io: SilentIo,
        }
    }

    pub fn load(&mut self, at: u16, bytes: &[u8]) {
        load_program(&mut self.mem, at, bytes);
    }

    pub fn step(&mut self) -> u64 {
        self.cpu.step(&mut self.mem, &mut self.io).unwrap()
    }

    pub fn run_steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }
}
