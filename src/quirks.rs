//! Per-emulator address corrections.
//!
//! hiscore.dat addresses are CPU addresses of the original hardware. Most
//! decoders yield RAM that starts at address 0 of the definitions, but a few
//! need the address shifted onto their RAM view first.

use crate::types::Emulator;

/// Genesis 68000 work RAM is mapped at 0xFF0000.
pub const GENESIS_WORK_RAM_BASE: u64 = 0xFF_0000;

/// Distance between Game Boy addresses and their position in a Gambatte state.
pub const GAMBATTE_RAM_SHIFT: u64 = 0x7728;

/// Address correction rule for one emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quirk {
    /// Address used as is.
    None,
    /// Subtract `base` from addresses strictly above it.
    RebaseAbove { base: u64 },
    /// Subtract a constant from every address.
    Shift { offset: u64 },
}

impl Quirk {
    /// Rule for `emulator`.
    pub fn for_emulator(emulator: Emulator) -> Self {
        match emulator {
            Emulator::GenesisPlusGx => Quirk::RebaseAbove {
                base: GENESIS_WORK_RAM_BASE,
            },
            Emulator::Gambatte => Quirk::Shift {
                offset: GAMBATTE_RAM_SHIFT,
            },
            _ => Quirk::None,
        }
    }

    /// Apply the rule; `None` when the address lies below the RAM view.
    pub fn apply(&self, address: u64) -> Option<u64> {
        match *self {
            Quirk::None => Some(address),
            Quirk::RebaseAbove { base } if address > base => Some(address - base),
            Quirk::RebaseAbove { .. } => Some(address),
            Quirk::Shift { offset } => address.checked_sub(offset),
        }
    }
}

/// Map a hiscore.dat address onto the RAM view decoded for `emulator`.
pub fn correct_address(emulator: Emulator, address: u64) -> Option<u64> {
    Quirk::for_emulator(emulator).apply(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_rebase() {
        assert_eq!(correct_address(Emulator::GenesisPlusGx, 0xFF_E108), Some(0xE108));
        assert_eq!(correct_address(Emulator::GenesisPlusGx, 0xFF_0000), Some(0xFF_0000));
        assert_eq!(correct_address(Emulator::GenesisPlusGx, 0x1234), Some(0x1234));
    }

    #[test]
    fn test_gambatte_shift() {
        assert_eq!(correct_address(Emulator::Gambatte, 0xC000), Some(0xC000 - 0x7728));
        assert_eq!(correct_address(Emulator::Gambatte, 0x100), None);
    }

    #[test]
    fn test_unchanged() {
        for emulator in [Emulator::Nestopia, Emulator::Fceu, Emulator::Snes9x, Emulator::Bsnes] {
            assert_eq!(correct_address(emulator, 0x7D7), Some(0x7D7));
        }
    }
}
