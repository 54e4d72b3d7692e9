//! Immutable register/flag snapshot, returned by [`super::Intel8080::state`].
//! Separate from the live `Intel8080` struct so callers (a debugger view, a
//! test assertion) can hold a cheap copy without borrowing the CPU.

/// A point-in-time copy of everything the Intel 8080's register file holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intel8080State {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub pc: u16,
    pub sp: u16,
    pub flag_z: bool,
    pub flag_s: bool,
    pub flag_p: bool,
    pub flag_cy: bool,
    pub flag_ca: bool,
    pub halted: bool,
    pub interrupts_enabled: bool,
    pub total_cycles: u64,
}
