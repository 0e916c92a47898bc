//! Error types for savestate decoding and hiscore extraction.
//!
//! Each pipeline stage has its own error enum so callers can tell a
//! malformed savestate from a bad definitions file or a row that does not
//! fit the decoded RAM. [`Error`] wraps all of them for the top-level API.

use crate::types::Emulator;
use thiserror::Error;

/// Errors raised while recognizing a savestate and locating its RAM.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The zip wrapper could not be opened, read, or was empty.
    #[error("Container error: {message}")]
    Container { message: String },

    /// No known savestate signature matched.
    #[error("Unsupported savestate format: leading bytes {magic}")]
    UnsupportedFormat { magic: String },

    /// The format was recognized but RAM extraction is not implemented for it.
    #[error("Unsupported emulator {emulator}: {detail}")]
    UnsupportedEmulator { emulator: Emulator, detail: String },

    /// An embedded marker the format relies on is missing.
    #[error("{emulator} savestate: marker {marker:?} not found")]
    MarkerNotFound {
        emulator: Emulator,
        marker: &'static str,
    },

    /// The savestate belongs to a sub-version whose layout is unknown.
    #[error("{emulator} savestate: unknown version ({detail})")]
    UnknownVersion { emulator: Emulator, detail: String },

    /// The savestate is too short for the fixed RAM offset of its format.
    #[error("{emulator} savestate truncated: RAM expected at offset 0x{offset:X}, blob is {actual} bytes")]
    Truncated {
        emulator: Emulator,
        offset: usize,
        actual: usize,
    },

    /// Embedded compressed data could not be inflated.
    #[error("{emulator} savestate: decompression failed: {source}")]
    Decompression {
        emulator: Emulator,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while slicing hiscore rows out of decoded RAM.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// Only the `program` address space can be read from a RAM dump.
    #[error("Row {index}: unsupported address space {space:?}")]
    UnsupportedAddressSpace { index: usize, space: String },

    /// The (corrected) row range falls outside the decoded RAM.
    #[error("Row {index}: range 0x{start:X}..0x{end:X} is outside RAM of {ram_len} bytes")]
    OutOfRange {
        index: usize,
        start: u64,
        end: u64,
        ram_len: usize,
    },
}

/// Errors raised by the hiscore definitions database.
#[derive(Debug, Error)]
pub enum DefinitionsError {
    /// IO error while reading the definitions file.
    #[error("IO error reading definitions: {0}")]
    Io(#[from] std::io::Error),

    /// No block matched any of the candidate keys.
    #[error("No hiscore entry for {game:?} (tried: {tried:?})")]
    NoEntry { game: String, tried: Vec<String> },

    /// A row line of the matched block could not be parsed.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

/// Top-level error type for the whole savestate to hiscore pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Savestate decoding failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Definitions lookup failed.
    #[error(transparent)]
    Definitions(#[from] DefinitionsError),

    /// Row extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
