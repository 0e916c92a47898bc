//! Nestopia savestates.
//!
//! Nestopia (standalone `.nst` and the libretro core) writes a fixed 56-byte
//! header before the CPU RAM chunk, so RAM is everything past it. States are
//! interchangeable between the two builds.

use crate::error::DecodeError;
use crate::formats::tail_from;
use crate::types::{DecodedState, Emulator, RamView};

/// Header bytes preceding system RAM.
pub const HEADER_SIZE: usize = 0x38;

/// Extract RAM from a Nestopia savestate.
pub fn extract(data: &[u8]) -> Result<DecodedState<'_>, DecodeError> {
    let ram = tail_from(Emulator::Nestopia, data, HEADER_SIZE)?;
    Ok(DecodedState::new(Emulator::Nestopia, RamView::borrowed(ram)))
}
