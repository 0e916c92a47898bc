//! state2hi - Hiscore Extraction from Emulator Savestates
//!
//! Emulators keep a game's high-score table in working RAM and lose it when
//! the game is closed, unless the table is written to a `.hi` file. This
//! library recovers that data from a savestate.
//!
//! # Features
//!
//! - **Format Detection**: Recognizes savestates of Nestopia, FCEU, Gambatte,
//!   Snes9x (and forks), bsnes, Genesis Plus GX and MAME by their signature
//! - **RAM Normalization**: Skips headers, finds embedded chunks, inflates,
//!   byte swaps and unwraps zip containers
//! - **Definitions Lookup**: Reads the hiscore.dat database used by MAME's
//!   hiscore plugin
//! - **Row Extraction**: Applies per-emulator address fixes and builds the
//!   `.hi` blob in definitions order
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use state2hi::{decode_file, definitions::Definitions, state_to_hiscore, GameId};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let defs = Definitions::load("console_hiscore.dat")?;
//!     let data = std::fs::read("smb.state")?;
//!     let hiscore = state_to_hiscore(&data, &GameId::parse("smb"), &defs)?;
//!     println!("{} bytes for {}", hiscore.data.len(), hiscore.entry.key);
//!
//!     let state = decode_file("smb.state")?;
//!     println!("Emulator: {}", state.emulator);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod definitions;
pub mod error;
pub mod extract;
pub mod formats;
pub mod formatter;
pub mod quirks;
pub mod types;

pub use error::{DecodeError, DefinitionsError, Error, ExtractError, Result};
pub use types::{
    DecodedState, Emulator, GameId, Hiscore, HiscoreEntry, RamView, Report, Row,
};

use definitions::Definitions;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Decode a savestate file.
///
/// # Example
///
/// ```rust,no_run
/// use state2hi::decode_file;
///
/// let state = decode_file("Super Mario Bros. (World).state")?;
/// println!("{}: {} bytes of RAM", state.emulator, state.ram.len());
/// # Ok::<(), state2hi::Error>(())
/// ```
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedState<'static>> {
    let data = std::fs::read(path)?;
    Ok(formats::decode(&data)?.into_owned())
}

/// Decode savestate bytes.
///
/// The returned RAM view borrows from `data` unless the format required a
/// transformation.
pub fn decode_bytes(data: &[u8]) -> std::result::Result<DecodedState<'_>, DecodeError> {
    formats::decode(data)
}

/// Identify a savestate without requiring its RAM to be extractable.
///
/// Zip containers are unwrapped and the emulator is detected from the
/// signature alone. Extraction is then attempted for the RAM size; if it
/// fails (MAME, an unknown bsnes version, a truncated state) the error is
/// recorded in the report instead of being returned. Only unreadable
/// containers and unknown signatures are errors.
pub fn inspect_bytes(
    file: impl Into<PathBuf>,
    data: &[u8],
) -> std::result::Result<Report, DecodeError> {
    let (inner, from_container) = if data.starts_with(&formats::magic::ZIP) {
        (Cow::Owned(formats::container::unwrap(data)?), true)
    } else {
        (Cow::Borrowed(data), false)
    };

    let emulator =
        formats::detect_format(&inner).ok_or_else(|| formats::unsupported_format(&inner))?;
    let mut report = Report::detected(file, emulator);
    report.from_container = from_container;

    match formats::decode_unwrapped(&inner) {
        Ok(state) => {
            report.systems = state.systems;
            report.ram_size = Some(state.ram.len());
        }
        Err(e) => {
            tracing::debug!(emulator = %emulator, error = %e, "RAM not extracted");
            report.decode_error = Some(e.to_string());
        }
    }
    Ok(report)
}

/// Run the whole pipeline on savestate bytes: decode, look up the game's
/// rows, extract them.
///
/// A pinned system in `game` replaces the decoder's candidate systems.
pub fn state_to_hiscore(data: &[u8], game: &GameId, defs: &Definitions) -> Result<Hiscore> {
    let state = formats::decode(data)?;
    hiscore_from_state(&state, game, defs)
}

/// Look up and extract the rows of `game` from an already decoded state.
pub fn hiscore_from_state(
    state: &DecodedState<'_>,
    game: &GameId,
    defs: &Definitions,
) -> Result<Hiscore> {
    let systems = game.systems(&state.systems);
    let entry = defs.lookup(systems.as_slice(), &game.name)?;
    let data = extract::extract(&state.ram, &entry.rows, state.emulator)?;

    Ok(Hiscore {
        emulator: state.emulator,
        entry,
        game: game.clone(),
        data,
    })
}

/// Write `hiscore` below `output_dir`, replacing any existing file.
///
/// See [`Hiscore::file_path`] for the layout. Missing directories are
/// created.
pub fn save_hiscore(hiscore: &Hiscore, output_dir: &Path) -> Result<PathBuf> {
    let path = hiscore.file_path(output_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    extract::write_hiscore(&path, &hiscore.data)?;
    Ok(path)
}

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Emulators in signature matching order.
pub fn supported_emulators() -> Vec<Emulator> {
    formats::SIGNATURES.iter().map(|sig| sig.emulator).collect()
}
