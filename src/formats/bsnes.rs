//! bsnes savestates.
//!
//! The serializer header carries the emulator version string, and the WRAM
//! offset moved between releases. Two layouts are known: the "Performance"
//! profile build and the v11x releases. Anything else is reported rather
//! than guessed.

use crate::error::DecodeError;
use crate::formats::tail_from;
use crate::types::{DecodedState, Emulator, RamView};
use byteorder::{ByteOrder, LittleEndian};

/// Profile name marking the performance-profile layout.
pub const PERFORMANCE_MARKER: &[u8] = b"Performance";

/// Version prefix marking the v11x layout.
pub const V11_MARKER: &[u8] = b"11";

/// WRAM offset of the performance-profile layout.
pub const RAM_OFFSET_PERFORMANCE: usize = 0x21C;

/// WRAM offset of the v11x layout.
pub const RAM_OFFSET_V11: usize = 0x284;

/// Known bsnes savestate layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Performance profile build
    Performance,
    /// v11x releases
    V11,
}

impl Layout {
    /// WRAM offset of this layout.
    pub fn ram_offset(&self) -> usize {
        match self {
            Layout::Performance => RAM_OFFSET_PERFORMANCE,
            Layout::V11 => RAM_OFFSET_V11,
        }
    }
}

/// Determine the layout from the header.
///
/// The profile check runs first; the two checks are exclusive.
pub fn detect_layout(data: &[u8]) -> Option<Layout> {
    if data.get(0x0C..0x17) == Some(PERFORMANCE_MARKER) {
        Some(Layout::Performance)
    } else if data.get(0x08..0x0A) == Some(V11_MARKER) {
        Some(Layout::V11)
    } else {
        None
    }
}

/// Extract RAM from a bsnes savestate.
pub fn extract(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    let layout = detect_layout(data).ok_or_else(|| DecodeError::UnknownVersion {
        emulator: Emulator::Bsnes,
        detail: describe_header(data),
    })?;
    tracing::debug!(?layout, "bsnes layout");
    let ram = tail_from(Emulator::Bsnes, data, layout.ram_offset())?;
    Ok(DecodedState::new(Emulator::Bsnes, RamView::borrowed(ram)))
}

fn describe_header(data: &[u8]) -> String {
    match data.get(4..8) {
        Some(size) => format!(
            "header size field {}, version bytes {}",
            LittleEndian::read_u32(size),
            hex::encode(data.get(8..0x17).unwrap_or(&data[8..]))
        ),
        None => format!("header is only {} bytes", data.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_state() -> Vec<u8> {
        let mut data = vec![0u8; 0x300];
        data[..4].copy_from_slice(b"BST1");
        for (i, b) in data.iter_mut().enumerate().skip(0x21C) {
            *b = i as u8;
        }
        data
    }

    #[test]
    fn test_performance_layout() {
        let mut data = make_state();
        data[0x0C..0x17].copy_from_slice(PERFORMANCE_MARKER);
        assert_eq!(detect_layout(&data), Some(Layout::Performance));

        let state = extract(&data).unwrap();
        assert_eq!(state.ram.len(), 0x300 - RAM_OFFSET_PERFORMANCE);
        assert_eq!(state.ram[0], 0x1C);
    }

    #[test]
    fn test_v11_layout() {
        let mut data = make_state();
        data[0x08..0x0A].copy_from_slice(b"11");
        data[0x0A] = b'5';
        assert_eq!(detect_layout(&data), Some(Layout::V11));

        let state = extract(&data).unwrap();
        assert_eq!(state.ram.len(), 0x300 - RAM_OFFSET_V11);
        assert_eq!(state.ram[0], 0x84);
    }

    #[test]
    fn test_profile_wins_over_version() {
        let mut data = make_state();
        data[0x08..0x0A].copy_from_slice(b"11");
        data[0x0C..0x17].copy_from_slice(PERFORMANCE_MARKER);
        assert_eq!(detect_layout(&data), Some(Layout::Performance));
    }

    #[test]
    fn test_unknown_version() {
        let mut data = make_state();
        data[0x08..0x0A].copy_from_slice(b"10");
        assert!(matches!(
            extract(&data),
            Err(DecodeError::UnknownVersion {
                emulator: Emulator::Bsnes,
                ..
            })
        ));
    }

    #[test]
    fn test_bare_magic() {
        assert!(matches!(
            extract(b"BST1"),
            Err(DecodeError::UnknownVersion { .. })
        ));
    }
}
