//! Savestate format recognition and RAM extraction.
//!
//! This module holds the signature table and one parser per emulator family:
//! - Nestopia, FCEU (NES/Famicom)
//! - Gambatte (Game Boy)
//! - Snes9x and its forks, bsnes (Super Famicom)
//! - Genesis Plus GX (Sega 8/16-bit)
//! - MAME (recognized, extraction not implemented)
//!
//! Savestates wrapped in a single-entry zip archive are unwrapped first.

pub mod bsnes;
pub mod container;
pub mod fceu;
pub mod gambatte;
pub mod genplus;
pub mod mame;
pub mod nestopia;
pub mod snes9x;

use crate::error::DecodeError;
use crate::types::{DecodedState, Emulator};
use std::fmt;

/// Magic byte signatures for format detection.
pub mod magic {
    /// Zip archive: 'P' 'K'
    pub const ZIP: [u8; 2] = [b'P', b'K'];

    /// Nestopia: "NST"
    pub const NESTOPIA: &[u8] = b"NST";

    /// FCEUmm/FCEUX: "FCS", followed by 0xFF or 'X' depending on version
    pub const FCEU: &[u8] = b"FCS";

    /// Gambatte snapshot prologue. `None` bytes hold the cycle counter.
    pub const GAMBATTE: [Option<u8>; 16] = [
        Some(0x00), Some(0x01), // version
        Some(0x00), Some(0x00), Some(0x00), // thumbnail size (none)
        Some(b'c'), Some(b'c'), Some(0x00), // "cc" label
        Some(0x00), Some(0x00), Some(0x04), // "cc" size
        None, None, None, None,
        Some(b'p'), // "pc" label
    ];

    /// Snes9x, current snapshot version
    pub const SNES9X: &[u8] = b"#!s9xsnp:0011";

    /// Snes9x 2018
    pub const SNES9X_2018: &[u8] = b"#!s9xsnp:0010";

    /// Snes9x 2010
    pub const SNES9X_2010: &[u8] = b"#!s9xsnp:0006";

    /// Snes9x 2002 / PocketSNES
    pub const SNES9X_2002: &[u8] = b"#!snes9x:0001";

    /// bsnes serializer signature
    pub const BSNES: &[u8] = b"BST1";

    /// Genesis Plus GX
    pub const GENPLUS: &[u8] = b"GENPLUS-GX";

    /// MAME
    pub const MAME: &[u8] = b"MAMESAVE";
}

/// Byte pattern a savestate must start with.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Exact prefix.
    Prefix(&'static [u8]),
    /// Prefix with wildcard positions.
    Masked(&'static [Option<u8>]),
}

impl Pattern {
    /// Whether `data` starts with this pattern.
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            Pattern::Prefix(prefix) => data.starts_with(prefix),
            Pattern::Masked(mask) => {
                data.len() >= mask.len()
                    && mask
                        .iter()
                        .zip(data)
                        .all(|(expected, actual)| expected.map_or(true, |b| b == *actual))
            }
        }
    }
}

/// RAM extraction rule of one format.
pub type Extractor = for<'a> fn(&'a [u8]) -> Result<DecodedState<'a>, DecodeError>;

/// One entry of the signature table.
#[derive(Clone, Copy)]
pub struct FormatSignature {
    /// Emulator the format belongs to.
    pub emulator: Emulator,
    /// Leading bytes identifying the format.
    pub pattern: Pattern,
    /// RAM extraction rule.
    pub extract: Extractor,
}

impl fmt::Debug for FormatSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatSignature")
            .field("emulator", &self.emulator)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Known savestate formats, in matching priority order.
///
/// The first matching entry wins; where prefixes could overlap, the more
/// specific pattern must come first.
pub static SIGNATURES: &[FormatSignature] = &[
    FormatSignature {
        emulator: Emulator::Nestopia,
        pattern: Pattern::Prefix(magic::NESTOPIA),
        extract: nestopia::extract,
    },
    FormatSignature {
        emulator: Emulator::Fceu,
        pattern: Pattern::Prefix(magic::FCEU),
        extract: fceu::extract,
    },
    FormatSignature {
        emulator: Emulator::Gambatte,
        pattern: Pattern::Masked(&magic::GAMBATTE),
        extract: gambatte::extract,
    },
    FormatSignature {
        emulator: Emulator::Snes9x,
        pattern: Pattern::Prefix(magic::SNES9X),
        extract: snes9x::extract_latest,
    },
    FormatSignature {
        emulator: Emulator::Snes9x2018,
        pattern: Pattern::Prefix(magic::SNES9X_2018),
        extract: snes9x::extract_2018,
    },
    FormatSignature {
        emulator: Emulator::Snes9x2010,
        pattern: Pattern::Prefix(magic::SNES9X_2010),
        extract: snes9x::extract_2010,
    },
    FormatSignature {
        emulator: Emulator::Snes9x2002,
        pattern: Pattern::Prefix(magic::SNES9X_2002),
        extract: snes9x::extract_2002,
    },
    FormatSignature {
        emulator: Emulator::Bsnes,
        pattern: Pattern::Prefix(magic::BSNES),
        extract: bsnes::extract,
    },
    FormatSignature {
        emulator: Emulator::GenesisPlusGx,
        pattern: Pattern::Prefix(magic::GENPLUS),
        extract: genplus::extract,
    },
    FormatSignature {
        emulator: Emulator::Mame,
        pattern: Pattern::Prefix(magic::MAME),
        extract: mame::extract,
    },
];

/// Find the signature table entry matching `data`.
pub fn find_signature(data: &[u8]) -> Option<&'static FormatSignature> {
    SIGNATURES.iter().find(|sig| sig.pattern.matches(data))
}

/// Detect the emulator that produced `data` without extracting RAM.
///
/// Zip containers are not looked into; use [`decode`] for that.
pub fn detect_format(data: &[u8]) -> Option<Emulator> {
    find_signature(data).map(|sig| sig.emulator)
}

/// Decode a savestate into its system RAM and candidate systems.
///
/// Zip-wrapped savestates are unwrapped first; their RAM view is then an
/// owned copy.
pub fn decode(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    if data.starts_with(&magic::ZIP) {
        let inner = container::unwrap(data)?;
        let mut state = decode_unwrapped(&inner)?.into_owned();
        state.from_container = true;
        return Ok(state);
    }
    decode_unwrapped(data)
}

/// Decode a savestate that is not (or no longer) zip wrapped.
pub(crate) fn decode_unwrapped(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    let sig = find_signature(data).ok_or_else(|| unsupported_format(data))?;
    tracing::debug!(emulator = %sig.emulator, size = data.len(), "savestate format detected");
    (sig.extract)(data)
}

/// Error for a blob no signature matches, quoting its first 16 bytes.
pub(crate) fn unsupported_format(data: &[u8]) -> DecodeError {
    DecodeError::UnsupportedFormat {
        magic: hex::encode(&data[..data.len().min(16)]),
    }
}

/// Everything from `offset` to the end of the savestate.
pub fn tail_from(emulator: Emulator, data: &[u8], offset: usize) -> Result<&[u8], DecodeError> {
    data.get(offset..).ok_or(DecodeError::Truncated {
        emulator,
        offset,
        actual: data.len(),
    })
}

/// Swap each pair of adjacent bytes.
///
/// Pairs do not overlap. A trailing unpaired byte is dropped, since it has
/// no partner to form a 16-bit word with.
pub fn swap16(data: &[u8]) -> Vec<u8> {
    let pairs = data.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        tracing::debug!(len = data.len(), "odd length in 16-bit swap, dropping last byte");
    }
    let mut out = Vec::with_capacity(data.len() & !1);
    for pair in pairs {
        out.push(pair[1]);
        out.push(pair[0]);
    }
    out
}
