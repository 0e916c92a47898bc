//! FCEUmm / FCEUX savestates.
//!
//! The state is a sequence of tagged chunks whose position depends on the
//! mapper and version, so RAM is located by searching for the `RAM` chunk
//! tag. The chunk data starts 8 bytes after the tag: 4 bytes of tag (padded)
//! followed by a 4-byte length.

use crate::error::DecodeError;
use crate::formats::tail_from;
use crate::types::{DecodedState, Emulator, RamView};
use memchr::memmem;

/// Chunk tag of the CPU RAM.
pub const RAM_MARKER: &str = "RAM";

/// Distance from the start of the tag to the chunk data.
pub const RAM_DATA_OFFSET: usize = 8;

/// Extract RAM from an FCEU savestate.
pub fn extract(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    let pos = memmem::find(data, RAM_MARKER.as_bytes()).ok_or(DecodeError::MarkerNotFound {
        emulator: Emulator::Fceu,
        marker: RAM_MARKER,
    })?;
    let ram = tail_from(Emulator::Fceu, data, pos + RAM_DATA_OFFSET)?;
    Ok(DecodedState::new(Emulator::Fceu, RamView::borrowed(ram)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_state(prefix: &[u8]) -> Vec<u8> {
        let mut data = prefix.to_vec();
        data.resize(0x10, 0);
        data.extend_from_slice(b"CPU\0\x08\0\0\0");
        data.extend_from_slice(&[0x11; 8]);
        data.extend_from_slice(b"RAM\0\x04\0\0\0");
        data.extend_from_slice(&[0xA0, 0xA1, 0xA2, 0xA3]);
        data
    }

    #[test]
    fn test_extract_fcsx() {
        let data = make_state(b"FCSX");
        let state = extract(&data).unwrap();
        assert_eq!(state.ram.as_bytes(), &[0xA0, 0xA1, 0xA2, 0xA3]);
        assert_eq!(state.emulator, Emulator::Fceu);
    }

    #[test]
    fn test_extract_fcs_ff() {
        let data = make_state(b"FCS\xFF");
        assert_eq!(extract(&data).unwrap().ram.len(), 4);
    }

    #[test]
    fn test_missing_marker() {
        let data = b"FCSX\0\0\0\0CPU\0".to_vec();
        assert!(matches!(
            extract(&data),
            Err(DecodeError::MarkerNotFound {
                emulator: Emulator::Fceu,
                marker: "RAM",
            })
        ));
    }

    #[test]
    fn test_marker_at_end() {
        let data = b"FCSXRAM".to_vec();
        assert!(matches!(
            extract(&data),
            Err(DecodeError::Truncated { .. })
        ));
    }
}
