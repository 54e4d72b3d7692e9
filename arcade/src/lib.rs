//! Space Invaders cabinet built on `i8080-core`: the bit-shift register
//! I/O adapter, the frame scheduler that drives the CPU at ~2 MHz and
//! issues half-frame interrupts, and a CP/M diagnostic harness for
//! TST8080/CPUTEST/8080PRE/8080EXM-style `.COM` images.
//!
//! Rendering, audio backends, and the console debugger UI are out of
//! scope here; this crate exposes the traits (`VideoSink`, `CabinetSound`,
//! `KeyState`) those collaborators implement.

pub mod cabinet;
pub mod diagnostic;
pub mod error;
pub mod scheduler;

/// Space Invaders ROM size: 8 KiB loaded at address 0, backing an 8 KiB
/// ROM region with an 8 KiB RAM region behind it (video memory begins at
/// 0x2400).
pub const SPACE_INVADERS_ROM_SIZE: usize = 0x2000;
pub const SPACE_INVADERS_RAM_SIZE: usize = 0x2000;

/// The CRT is 256x224, displayed rotated 90 degrees counter-clockwise.
pub const CRT_WIDTH: u32 = 256;
pub const CRT_HEIGHT: u32 = 224;

/// Video RAM starts here and runs to the end of the address space.
pub const VIDEO_MEMORY_START: u16 = 0x2400;

pub mod prelude {
    pub use crate::cabinet::{
        CabinetInput, CabinetIo, CabinetSound, DipSwitches, KeyState, NoInput, NullSound,
        SoundSlot,
    };
    pub use crate::diagnostic::run_diagnostic;
    pub use crate::error::DiagnosticError;
    pub use crate::scheduler::{FrameScheduler, NullVideo, TickOutcome, VideoSink};
}
