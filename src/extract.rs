//! Hiscore row extraction.
//!
//! Rows are sliced out of the decoded RAM in definitions order and
//! concatenated; that order is the layout of the `.hi` file.
//!
//! The rows' start/end sentinel bytes are deliberately not checked here.
//! They tell a live-memory tool whether the game has initialized its score
//! table yet; a saved table can hold any value, including zeroes.

use crate::error::ExtractError;
use crate::quirks::correct_address;
use crate::types::{Emulator, Row};
use std::fs;
use std::io;
use std::path::Path;

/// Address space readable from a RAM dump.
pub const PROGRAM_SPACE: &str = "program";

/// Concatenate the RAM bytes of every row.
///
/// Fails on the first row that names another address space or does not fit
/// inside `ram` after address correction. Nothing is truncated.
pub fn extract(ram: &[u8], rows: &[Row], emulator: Emulator) -> Result<Vec<u8>, ExtractError> {
    let mut out = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        out.extend_from_slice(row_bytes(ram, index, row, emulator)?);
    }

    Ok(out)
}

/// RAM bytes of a single row.
pub fn row_bytes<'a>(
    ram: &'a [u8],
    index: usize,
    row: &Row,
    emulator: Emulator,
) -> Result<&'a [u8], ExtractError> {
    if row.address_space != PROGRAM_SPACE {
        return Err(ExtractError::UnsupportedAddressSpace {
            index,
            space: row.address_space.clone(),
        });
    }

    let out_of_range = |start: u64| ExtractError::OutOfRange {
        index,
        start,
        end: start.saturating_add(row.length),
        ram_len: ram.len(),
    };

    let start = correct_address(emulator, row.address).ok_or_else(|| out_of_range(row.address))?;
    let end = start
        .checked_add(row.length)
        .ok_or_else(|| out_of_range(start))?;

    let range = usize::try_from(start)
        .ok()
        .zip(usize::try_from(end).ok())
        .filter(|&(_, end)| end <= ram.len())
        .ok_or_else(|| out_of_range(start))?;

    Ok(&ram[range.0..range.1])
}

/// Persist a hiscore blob, replacing any previous file at `path`.
pub fn write_hiscore(path: &Path, data: &[u8]) -> io::Result<()> {
    fs::write(path, data)?;
    tracing::info!(path = %path.display(), bytes = data.len(), "hiscore written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(address: u64, length: u64) -> Row {
        Row {
            cpu: "maincpu".into(),
            address_space: PROGRAM_SPACE.into(),
            address,
            length,
            start_byte: 0,
            end_byte: 0,
            prefill: None,
        }
    }

    fn ram() -> Vec<u8> {
        (0..=255u8).collect()
    }

    #[test]
    fn test_rows_in_order() {
        let ram = ram();
        let rows = [row(0x10, 2), row(0x04, 3)];
        let out = extract(&ram, &rows, Emulator::Nestopia).unwrap();
        assert_eq!(out, vec![0x10, 0x11, 0x04, 0x05, 0x06]);
    }

    #[test]
    fn test_concatenation_per_row() {
        let ram = ram();
        let (r1, r2) = (row(0x80, 4), row(0x20, 6));
        let both = extract(&ram, &[r1.clone(), r2.clone()], Emulator::Fceu).unwrap();
        let mut separate = extract(&ram, &[r1], Emulator::Fceu).unwrap();
        separate.extend(extract(&ram, &[r2], Emulator::Fceu).unwrap());
        assert_eq!(both, separate);
        assert_eq!(both.len(), 10);
    }

    #[test]
    fn test_length_is_sum_of_rows() {
        let ram = ram();
        let rows = [row(0, 1), row(1, 16), row(200, 56), row(0, 0)];
        let out = extract(&ram, &rows, Emulator::Snes9x).unwrap();
        assert_eq!(out.len() as u64, rows.iter().map(|r| r.length).sum::<u64>());
    }

    #[test]
    fn test_row_ending_at_ram_end() {
        let ram = ram();
        let out = extract(&ram, &[row(0xFC, 4)], Emulator::Nestopia).unwrap();
        assert_eq!(out, vec![0xFC, 0xFD, 0xFE, 0xFF]);
    }

    #[test]
    fn test_out_of_range() {
        let ram = ram();
        let rows = [row(0, 2), row(0xFE, 4)];
        assert_eq!(
            extract(&ram, &rows, Emulator::Nestopia),
            Err(ExtractError::OutOfRange {
                index: 1,
                start: 0xFE,
                end: 0x102,
                ram_len: 256,
            })
        );
    }

    #[test]
    fn test_huge_length_does_not_wrap() {
        let ram = ram();
        assert!(matches!(
            extract(&ram, &[row(0x10, u64::MAX)], Emulator::Nestopia),
            Err(ExtractError::OutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_unsupported_space() {
        let ram = ram();
        let mut r = row(0, 1);
        r.address_space = "data".into();
        assert_eq!(
            extract(&ram, &[row(0, 1), r], Emulator::Nestopia),
            Err(ExtractError::UnsupportedAddressSpace {
                index: 1,
                space: "data".into(),
            })
        );
    }

    #[test]
    fn test_genesis_address_fix() {
        let ram = ram();
        let out = extract(&ram, &[row(0xFF_0010, 2)], Emulator::GenesisPlusGx).unwrap();
        assert_eq!(out, vec![0x10, 0x11]);
    }

    #[test]
    fn test_gambatte_below_shift() {
        let ram = ram();
        assert!(matches!(
            extract(&ram, &[row(0x10, 1)], Emulator::Gambatte),
            Err(ExtractError::OutOfRange { start: 0x10, .. })
        ));
    }

    #[test]
    fn test_sentinels_not_checked() {
        let ram = vec![0u8; 16];
        let mut r = row(0, 4);
        r.start_byte = 0x55;
        r.end_byte = 0xAA;
        assert_eq!(extract(&ram, &[r], Emulator::Nestopia).unwrap(), vec![0; 4]);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smb.hi");
        fs::write(&path, vec![0xFF; 64]).unwrap();
        write_hiscore(&path, &[1, 2, 3]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
