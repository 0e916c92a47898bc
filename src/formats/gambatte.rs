//! Gambatte savestates.
//!
//! The libretro core serializes its state without a separate RAM chunk
//! header, so the whole blob is used as the RAM view and row addresses are
//! shifted instead (see [`crate::quirks`]).

use crate::error::DecodeError;
use crate::types::{DecodedState, Emulator, RamView};

/// Extract RAM from a Gambatte savestate.
pub fn extract(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    Ok(DecodedState::new(Emulator::Gambatte, RamView::borrowed(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{detect_format, magic};

    #[test]
    fn test_whole_blob_is_ram() {
        let mut data: Vec<u8> = magic::GAMBATTE.iter().map(|b| b.unwrap_or(0x42)).collect();
        data.extend_from_slice(&[1, 2, 3]);
        assert_eq!(detect_format(&data), Some(Emulator::Gambatte));

        let state = extract(&data).unwrap();
        assert_eq!(state.ram.as_bytes(), data.as_slice());
        assert_eq!(state.systems, vec!["gameboy", "gbcolor", "supergb"]);
    }

    #[test]
    fn test_cycle_counter_is_wildcard() {
        let mut a: Vec<u8> = magic::GAMBATTE.iter().map(|b| b.unwrap_or(0x00)).collect();
        let b: Vec<u8> = magic::GAMBATTE.iter().map(|b| b.unwrap_or(0xFF)).collect();
        assert_eq!(detect_format(&a), Some(Emulator::Gambatte));
        assert_eq!(detect_format(&b), Some(Emulator::Gambatte));

        a[15] = b'x';
        assert_eq!(detect_format(&a), None);
    }
}
