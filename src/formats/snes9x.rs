//! Snes9x savestates (current core and the 2018/2010/2002 forks).
//!
//! Each fork writes a text-tagged snapshot whose block sizes are fixed for a
//! given snapshot version, so the WRAM block always starts at the same
//! offset for that version.

use crate::error::DecodeError;
use crate::formats::tail_from;
use crate::types::{DecodedState, Emulator, RamView};

/// WRAM offset for `#!s9xsnp:0011`.
pub const RAM_OFFSET_LATEST: usize = 0x10B99;

/// WRAM offset for `#!s9xsnp:0010` (snes9x2018).
pub const RAM_OFFSET_2018: usize = 0x10B96;

/// WRAM offset for `#!s9xsnp:0006` (snes9x2010).
pub const RAM_OFFSET_2010: usize = 0x10B89;

/// WRAM offset for `#!snes9x:0001` (snes9x2002 / PocketSNES).
pub const RAM_OFFSET_2002: usize = 0x10C64;

/// RAM offset of a Snes9x variant.
pub fn ram_offset(emulator: Emulator) -> Option<usize> {
    match emulator {
        Emulator::Snes9x => Some(RAM_OFFSET_LATEST),
        Emulator::Snes9x2018 => Some(RAM_OFFSET_2018),
        Emulator::Snes9x2010 => Some(RAM_OFFSET_2010),
        Emulator::Snes9x2002 => Some(RAM_OFFSET_2002),
        _ => None,
    }
}

fn extract_at(emulator: Emulator, offset: usize, data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    let ram = tail_from(emulator, data, offset)?;
    Ok(DecodedState::new(emulator, RamView::borrowed(ram)))
}

/// Extract RAM from a current Snes9x savestate.
pub fn extract_latest(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    extract_at(Emulator::Snes9x, RAM_OFFSET_LATEST, data)
}

/// Extract RAM from a snes9x2018 savestate.
pub fn extract_2018(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    extract_at(Emulator::Snes9x2018, RAM_OFFSET_2018, data)
}

/// Extract RAM from a snes9x2010 savestate.
pub fn extract_2010(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    extract_at(Emulator::Snes9x2010, RAM_OFFSET_2010, data)
}

/// Extract RAM from a snes9x2002 savestate.
pub fn extract_2002(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    extract_at(Emulator::Snes9x2002, RAM_OFFSET_2002, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{decode, magic};
    use pretty_assertions::assert_eq;

    fn make_state(magic: &[u8], offset: usize, ram: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; offset];
        data[..magic.len()].copy_from_slice(magic);
        data.extend_from_slice(ram);
        data
    }

    #[test]
    fn test_each_fork_offset() {
        let ram = [0xC0, 0xFF, 0xEE];
        let cases = [
            (magic::SNES9X, Emulator::Snes9x),
            (magic::SNES9X_2018, Emulator::Snes9x2018),
            (magic::SNES9X_2010, Emulator::Snes9x2010),
            (magic::SNES9X_2002, Emulator::Snes9x2002),
        ];
        for (magic, emulator) in cases {
            let offset = ram_offset(emulator).unwrap();
            let data = make_state(magic, offset, &ram);
            let state = decode(&data).unwrap();
            assert_eq!(state.emulator, emulator);
            assert_eq!(state.ram.as_bytes(), &ram);
            assert_eq!(state.systems, vec!["snes", "snespal"]);
        }
    }

    #[test]
    fn test_short_state() {
        let data = make_state(magic::SNES9X_2002, 0x100, &[]);
        assert!(matches!(
            decode(&data),
            Err(DecodeError::Truncated {
                emulator: Emulator::Snes9x2002,
                offset: RAM_OFFSET_2002,
                actual: 0x100,
            })
        ));
    }

    #[test]
    fn test_not_snes9x() {
        assert_eq!(ram_offset(Emulator::Bsnes), None);
    }
}
