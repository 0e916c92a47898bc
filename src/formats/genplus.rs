//! Genesis Plus GX savestates.
//!
//! A 16-byte version header is followed by the 68000 work RAM, which the
//! core keeps as native 16-bit words. On little-endian hosts every byte pair
//! is therefore reversed relative to the address space the hiscore
//! definitions describe, and has to be swapped back.

use crate::error::DecodeError;
use crate::formats::{swap16, tail_from};
use crate::types::{DecodedState, Emulator, RamView};

/// Version header preceding work RAM.
pub const HEADER_SIZE: usize = 16;

/// Extract RAM from a Genesis Plus GX savestate.
pub fn extract(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    let swapped = tail_from(Emulator::GenesisPlusGx, data, HEADER_SIZE)?;
    Ok(DecodedState::new(
        Emulator::GenesisPlusGx,
        RamView::owned(swap16(swapped)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_state(ram: &[u8]) -> Vec<u8> {
        let mut data = b"GENPLUS-GX 1.7.5".to_vec();
        assert_eq!(data.len(), HEADER_SIZE);
        data.extend_from_slice(ram);
        data
    }

    #[test]
    fn test_extract_swaps_words() {
        let data = make_state(&[0x01, 0x02, 0x03, 0x04]);
        let state = extract(&data).unwrap();
        assert_eq!(state.ram.as_bytes(), &[0x02, 0x01, 0x04, 0x03]);
        assert!(state.ram.is_owned());
        assert_eq!(state.systems[0], "genesis");
        assert_eq!(state.systems.len(), 9);
    }

    #[test]
    fn test_odd_length_drops_last_byte() {
        let data = make_state(&[0x01, 0x02, 0x03]);
        let state = extract(&data).unwrap();
        assert_eq!(state.ram.as_bytes(), &[0x02, 0x01]);
    }

    #[test]
    fn test_header_only() {
        let data = b"GENPLUS-GX".to_vec();
        assert!(matches!(
            extract(&data),
            Err(DecodeError::Truncated {
                offset: HEADER_SIZE,
                ..
            })
        ));
    }
}
