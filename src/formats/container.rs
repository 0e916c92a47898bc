//! Zip-wrapped savestates.
//!
//! Some frontends store savestates inside a zip archive holding a single
//! entry. The archive is opened in memory and the first entry is inflated;
//! additional entries are ignored with a warning.

use crate::error::DecodeError;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Return the decompressed content of the first archive entry.
pub fn unwrap(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| container_error("open", e))?;

    if archive.is_empty() {
        return Err(DecodeError::Container {
            message: "archive has no entries".to_string(),
        });
    }
    if archive.len() > 1 {
        tracing::warn!(
            entries = archive.len(),
            "savestate archive holds more than one file, using the first"
        );
    }

    let mut entry = archive
        .by_index(0)
        .map_err(|e| container_error("open first entry of", e))?;
    tracing::debug!(name = entry.name(), size = entry.size(), "unwrapping savestate");

    let mut out = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
    entry
        .read_to_end(&mut out)
        .map_err(|e| container_error("read", e))?;
    Ok(out)
}

fn container_error(action: &str, err: impl std::fmt::Display) -> DecodeError {
    DecodeError::Container {
        message: format!("cannot {} zip archive: {}", action, err),
    }
}
