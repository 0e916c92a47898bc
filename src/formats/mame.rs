//! MAME savestates.
//!
//! Layout of the 32-byte header:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 8 | `MAMESAVE` |
//! | 0x08 | 1 | format version |
//! | 0x09 | 1 | flags (bit 1: data is big-endian) |
//! | 0x0A | 17 | driver name, NUL padded |
//! | 0x1C | 4 | save registration signature |
//! | 0x20 | .. | zlib-compressed state entries |
//!
//! The decompressed payload is a concatenation of every registered state
//! item of the driver, with no index. Locating main RAM in it would need the
//! driver's registration order, so extraction stops after a successful
//! inflate and reports the emulator as unsupported.

use crate::error::DecodeError;
use crate::types::{DecodedState, Emulator};
use flate2::read::ZlibDecoder;
use std::io::Read;

/// Size of the uncompressed header.
pub const HEADER_SIZE: usize = 0x20;

/// Flag bit set when the state was written by a big-endian host.
pub const FLAG_MSB_FIRST: u8 = 0x02;

/// Parsed MAME savestate header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MameHeader {
    /// Savestate format version.
    pub version: u8,
    /// Header flags, see [`FLAG_MSB_FIRST`].
    pub flags: u8,
    /// Driver short name, e.g. `pacman`.
    pub system: String,
}

impl MameHeader {
    /// Whether the state data was written big-endian.
    pub fn is_big_endian(&self) -> bool {
        self.flags & FLAG_MSB_FIRST != 0
    }
}

/// Parse the fixed header of a MAME savestate.
pub fn parse_header(data: &[u8]) -> Result<MameHeader, DecodeError> {
    if data.len() < HEADER_SIZE {
        return Err(DecodeError::Truncated {
            emulator: Emulator::Mame,
            offset: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let version = data[0x08];
    let flags = data[0x09];
    let system: String = String::from_utf8_lossy(&data[0x0A..0x1B])
        .chars()
        .filter(|c| *c != '\0')
        .collect();

    Ok(MameHeader {
        version,
        flags,
        system,
    })
}

/// Inflate the state entries following the header.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let compressed = data.get(HEADER_SIZE..).ok_or(DecodeError::Truncated {
        emulator: Emulator::Mame,
        offset: HEADER_SIZE,
        actual: data.len(),
    })?;
    let mut out = Vec::new();
    ZlibDecoder::new(compressed)
        .read_to_end(&mut out)
        .map_err(decompression_error)?;
    Ok(out)
}

/// Recognize a MAME savestate.
///
/// Always fails: with [`DecodeError::UnsupportedEmulator`] once the header
/// parses and the payload inflates, or with the header/inflate error.
pub fn extract(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    let header = parse_header(data)?;
    let payload = inflate(data)?;
    tracing::debug!(
        system = %header.system,
        version = header.version,
        size = payload.len(),
        "MAME state inflated"
    );
    Err(DecodeError::UnsupportedEmulator {
        emulator: Emulator::Mame,
        detail: format!(
            "RAM extraction for driver {:?} is not implemented ({} bytes of state data)",
            header.system,
            payload.len()
        ),
    })
}

fn decompression_error(source: std::io::Error) -> DecodeError {
    DecodeError::Decompression {
        emulator: Emulator::Mame,
        source,
    }
}
