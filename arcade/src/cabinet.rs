//! Space Invaders cabinet I/O: the bit-shift register, input ports, DIP
//! switches, and sound-bank edge detection, wired behind [`IoBus`].
//!
//! Grounded on `original_source/src/spaceinvaders_io.cpp`
//! (`SpaceInvadersIO::get`/`set`, the port 0/1/2 bit layouts, and the
//! shift register in `getPort3`/`setPort2`/`setPort4`).

use i8080_core::error::IoError;
use i8080_core::io::IoBus;

/// Symbolic cabinet inputs, read through [`KeyState`]. Named for the
/// physical control, not the port bit it happens to land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CabinetInput {
    P1Left,
    P1Right,
    P1Fire,
    P1Start,
    P2Left,
    P2Right,
    P2Fire,
    P2Start,
    Coin,
    Tilt,
}

/// Host-supplied key state. A trait rather than a raw callback closure,
/// matching the small capability interfaces the core crate already uses
/// for `IoBus` itself.
pub trait KeyState {
    fn is_pressed(&self, input: CabinetInput) -> bool;
}

/// A `KeyState` where nothing is ever pressed; useful for tests and for
/// running the cabinet headless.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl KeyState for NoInput {
    fn is_pressed(&self, _input: CabinetInput) -> bool {
        false
    }
}

/// One of the nine sound effects the cabinet can trigger, split across
/// ports 3 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundSlot {
    Ufo,
    Shot,
    PlayerDie,
    InvaderDie,
    FleetMove1,
    FleetMove2,
    FleetMove3,
    FleetMove4,
    UfoHit,
}

/// The seam the spec calls a "playback handle": `play`/`stop` per slot.
/// Separated from the host audio loop the same way a device module here
/// is separated from its frontend.
pub trait CabinetSound {
    fn play(&mut self, slot: SoundSlot);
    fn stop(&mut self, slot: SoundSlot);
}

/// A `CabinetSound` that does nothing; used for tests and for running
/// without an audio backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSound;

impl CabinetSound for NullSound {
    fn play(&mut self, _slot: SoundSlot) {}
    fn stop(&mut self, _slot: SoundSlot) {}
}

/// DIP switch bank, exposed as constructor parameters rather than
/// compile-time constants — construction happens once per instance, so
/// tests can still exercise both settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DipSwitches {
    /// DIP3/DIP5 combined: ship count. `false, false` = 3 ships (the
    /// cabinet default).
    pub dip3: bool,
    /// Port 0 bit 0.
    pub dip4: bool,
    pub dip5: bool,
    /// Extra ship awarded at 1500 points (`false`) or 1000 points (`true`).
    pub dip6: bool,
    /// Coin info shown on the demo screen when `false`.
    pub dip7: bool,
}

/// Bit 0 (UFO) is continuous on port 3: held down rather than edge
/// triggered. Ports 3 (bits 1-3) and 5 (bits 0-4) are edge triggered
/// against the previous write to that port.
const PORT3_UFO_BIT: u8 = 0;

/// Space Invaders cabinet: bit-shift register, DIP switches, and sound
/// bank edge detection, implementing the `IoBus` trait the CPU core
/// drives `IN`/`OUT` through.
pub struct CabinetIo<K, S> {
    shift_register: u16,
    shift_offset: u8,

    last_port3: u8,
    last_port5: u8,

    dip: DipSwitches,

    keys: K,
    sound: S,
}

impl<K: KeyState, S: CabinetSound> CabinetIo<K, S> {
    pub fn new(keys: K, sound: S, dip: DipSwitches) -> Self {
        Self {
            shift_register: 0,
            shift_offset: 0,
            last_port3: 0,
            last_port5: 0,
            dip,
            keys,
            sound,
        }
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }

    pub fn sound_mut(&mut self) -> &mut S {
        &mut self.sound
    }

    fn read_port0(&self) -> u8 {
        let mut value = 0b0000_1110;
        if self.dip.dip4 {
            value |= 1;
        }
        if self.keys.is_pressed(CabinetInput::P1Fire) {
            value |= 1 << 4;
        }
        if self.keys.is_pressed(CabinetInput::P1Left) {
            value |= 1 << 5;
        }
        if self.keys.is_pressed(CabinetInput::P1Right) {
            value |= 1 << 6;
        }
        value
    }

    fn read_port1(&self) -> u8 {
        let mut value = 0b0000_1000;
        if self.keys.is_pressed(CabinetInput::Coin) {
            value |= 1;
        }
        if self.keys.is_pressed(CabinetInput::P2Start) {
            value |= 1 << 1;
        }
        if self.keys.is_pressed(CabinetInput::P1Start) {
            value |= 1 << 2;
        }
        if self.keys.is_pressed(CabinetInput::P1Fire) {
            value |= 1 << 4;
        }
        if self.keys.is_pressed(CabinetInput::P1Left) {
            value |= 1 << 5;
        }
        if self.keys.is_pressed(CabinetInput::P1Right) {
            value |= 1 << 6;
        }
        value
    }

    fn read_port2(&self) -> u8 {
        let mut value = 0u8;
        if self.dip.dip3 {
            value |= 1;
        }
        if self.dip.dip5 {
            value |= 1 << 1;
        }
        if self.keys.is_pressed(CabinetInput::Tilt) {
            value |= 1 << 2;
        }
        if self.dip.dip6 {
            value |= 1 << 3;
        }
        if self.keys.is_pressed(CabinetInput::P2Fire) {
            value |= 1 << 4;
        }
        if self.keys.is_pressed(CabinetInput::P2Left) {
            value |= 1 << 5;
        }
        if self.keys.is_pressed(CabinetInput::P2Right) {
            value |= 1 << 6;
        }
        if self.dip.dip7 {
            value |= 1 << 7;
        }
        value
    }

    /// `((shift << (8 - offset)) & 0xFFFF) >> 8`.
    fn read_port3(&self) -> u8 {
        let shifted = (u32::from(self.shift_register) << (8 - self.shift_offset)) & 0xFFFF;
        (shifted >> 8) as u8
    }

    fn write_port2(&mut self, value: u8) {
        self.shift_offset = value & 0x07;
    }

    /// Bit 0 (UFO) is continuous; bits 1-3 (Shot, Flash/PlayerDie,
    /// InvaderDie) are edge triggered against the previous write.
    fn write_port3(&mut self, value: u8) {
        let was_ufo_on = self.last_port3 & (1 << PORT3_UFO_BIT) != 0;
        let is_ufo_on = value & (1 << PORT3_UFO_BIT) != 0;
        if is_ufo_on && !was_ufo_on {
            self.sound.play(SoundSlot::Ufo);
        } else if !is_ufo_on && was_ufo_on {
            self.sound.stop(SoundSlot::Ufo);
        }

        self.trigger_edge(value, self.last_port3, 1, SoundSlot::Shot);
        self.trigger_edge(value, self.last_port3, 2, SoundSlot::PlayerDie);
        self.trigger_edge(value, self.last_port3, 3, SoundSlot::InvaderDie);

        self.last_port3 = value;
    }

    fn write_port4(&mut self, value: u8) {
        self.shift_register = (u16::from(value) << 8) | (self.shift_register >> 8);
    }

    /// All four bits are edge triggered against the previous write to
    /// port 5.
    fn write_port5(&mut self, value: u8) {
        self.trigger_edge(value, self.last_port5, 0, SoundSlot::FleetMove1);
        self.trigger_edge(value, self.last_port5, 1, SoundSlot::FleetMove2);
        self.trigger_edge(value, self.last_port5, 2, SoundSlot::FleetMove3);
        self.trigger_edge(value, self.last_port5, 3, SoundSlot::FleetMove4);
        self.trigger_edge(value, self.last_port5, 4, SoundSlot::UfoHit);

        self.last_port5 = value;
    }

    fn trigger_edge(&mut self, value: u8, previous: u8, bit: u8, slot: SoundSlot) {
        let was_set = previous & (1 << bit) != 0;
        let is_set = value & (1 << bit) != 0;
        if is_set && !was_set {
            self.sound.play(slot);
        }
    }
}

impl<K: KeyState, S: CabinetSound> IoBus for CabinetIo<K, S> {
    fn read(&mut self, port: u8) -> Result<u8, IoError> {
        match port {
            0 => Ok(self.read_port0()),
            1 => Ok(self.read_port1()),
            2 => Ok(self.read_port2()),
            3 => Ok(self.read_port3()),
            _ => Err(IoError::UnmappedPort(port)),
        }
    }

    fn write(&mut self, port: u8, value: u8) -> Result<(), IoError> {
        match port {
            2 => {
                self.write_port2(value);
                Ok(())
            }
            3 => {
                self.write_port3(value);
                Ok(())
            }
            4 => {
                self.write_port4(value);
                Ok(())
            }
            5 => {
                self.write_port5(value);
                Ok(())
            }
            // Watchdog/tone reset: accepted and ignored.
            6 => Ok(()),
            _ => Err(IoError::UnmappedPort(port)),
        }
    }
}
