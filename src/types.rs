//! Core types for savestate decoding and hiscore extraction.
//!
//! This module defines the emulator identifiers recognized by the decoder,
//! the normalized RAM view it produces, and the row descriptors read from
//! the hiscore definitions database.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Emulators whose savestates can be recognized.
///
/// Each variant corresponds to exactly one entry of the signature table in
/// [`crate::formats`], so the Snes9x forks are distinct variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emulator {
    /// Nestopia (NES/Famicom)
    Nestopia,
    /// FCEUmm / FCEUX (NES/Famicom)
    Fceu,
    /// Gambatte (Game Boy / Game Boy Color)
    Gambatte,
    /// Snes9x, current snapshot format
    Snes9x,
    /// Snes9x 2018 fork
    Snes9x2018,
    /// Snes9x 2010 fork
    Snes9x2010,
    /// Snes9x 2002 fork (PocketSNES)
    Snes9x2002,
    /// bsnes (Super Famicom)
    Bsnes,
    /// Genesis Plus GX (Mega Drive, Master System, Game Gear, Sega CD)
    #[serde(rename = "genplus")]
    GenesisPlusGx,
    /// MAME
    Mame,
}

impl Emulator {
    /// Short identifier, as used in log and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Emulator::Nestopia => "nestopia",
            Emulator::Fceu => "fceu",
            Emulator::Gambatte => "gambatte",
            Emulator::Snes9x => "snes9x",
            Emulator::Snes9x2018 => "snes9x2018",
            Emulator::Snes9x2010 => "snes9x2010",
            Emulator::Snes9x2002 => "snes9x2002",
            Emulator::Bsnes => "bsnes",
            Emulator::GenesisPlusGx => "genplus",
            Emulator::Mame => "mame",
        }
    }

    /// Console system identifiers (as used in hiscore.dat) a savestate of
    /// this emulator may belong to, most likely first.
    ///
    /// MAME states name their system in the header, so the static list is
    /// empty for [`Emulator::Mame`].
    pub fn candidate_systems(&self) -> &'static [&'static str] {
        match self {
            Emulator::Nestopia | Emulator::Fceu => &["nes", "famicom", "fds", "nespal"],
            Emulator::Gambatte => &["gameboy", "gbcolor", "supergb"],
            Emulator::Snes9x
            | Emulator::Snes9x2018
            | Emulator::Snes9x2010
            | Emulator::Snes9x2002
            | Emulator::Bsnes => &["snes", "snespal"],
            Emulator::GenesisPlusGx => &[
                "genesis", "megadrij", "megadriv", "sms", "smsj", "smspal", "gamegear", "gamegeaj",
                "segacd",
            ],
            Emulator::Mame => &[],
        }
    }
}

impl fmt::Display for Emulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// System RAM in canonical byte order.
///
/// Plain header-skip formats borrow from the savestate; formats that had to
/// be inflated, byte swapped, or unwrapped from a container own their copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamView<'a>(Cow<'a, [u8]>);

impl<'a> RamView<'a> {
    /// View into the savestate itself.
    pub fn borrowed(data: &'a [u8]) -> Self {
        RamView(Cow::Borrowed(data))
    }

    /// Transformed copy of the RAM.
    pub fn owned(data: Vec<u8>) -> Self {
        RamView(Cow::Owned(data))
    }

    /// Whether the bytes were copied out of the savestate.
    pub fn is_owned(&self) -> bool {
        matches!(self.0, Cow::Owned(_))
    }

    /// Detach from the input buffer.
    pub fn into_owned(self) -> RamView<'static> {
        RamView(Cow::Owned(self.0.into_owned()))
    }

    /// RAM bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for RamView<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for RamView<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Result of decoding a savestate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedState<'a> {
    /// Emulator that produced the savestate.
    pub emulator: Emulator,
    /// Plausible hiscore.dat system identifiers, in lookup order.
    pub systems: Vec<String>,
    /// Normalized system RAM.
    pub ram: RamView<'a>,
    /// The savestate was unwrapped from a zip container.
    pub from_container: bool,
}

impl<'a> DecodedState<'a> {
    pub(crate) fn new(emulator: Emulator, ram: RamView<'a>) -> Self {
        Self {
            emulator,
            systems: emulator
                .candidate_systems()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            ram,
            from_container: false,
        }
    }

    /// Detach the RAM view from the input buffer.
    pub fn into_owned(self) -> DecodedState<'static> {
        DecodedState {
            emulator: self.emulator,
            systems: self.systems,
            ram: self.ram.into_owned(),
            from_container: self.from_container,
        }
    }
}

/// Game identifier as given by the user.
///
/// `system,name` pins the system and overrides the decoder's candidates;
/// a bare `name` is looked up under every candidate system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId {
    /// Pinned hiscore.dat system, e.g. `nes`.
    pub system: Option<String>,
    /// Game name as used in hiscore.dat keys.
    pub name: String,
}

impl GameId {
    /// Parse `name` or `system,name`.
    ///
    /// Only the first comma separates the system. Anything after it is the
    /// name, commas included, so `parse(key).to_string()` gives `key` back
    /// and lookups use exactly the key the user typed. An empty system is
    /// the same as none.
    pub fn parse(s: &str) -> Self {
        match s.split_once(',') {
            Some((system, name)) if !system.is_empty() => GameId {
                system: Some(system.to_string()),
                name: name.to_string(),
            },
            Some((_, name)) => GameId::bare(name),
            None => GameId::bare(s),
        }
    }

    /// Game name without a pinned system.
    pub fn bare(name: impl Into<String>) -> Self {
        GameId {
            system: None,
            name: name.into(),
        }
    }

    /// Systems to try in the definitions database: the pinned system, or
    /// the decoder's candidates.
    pub fn systems<'s>(&'s self, candidates: &'s [String]) -> Vec<&'s str> {
        match &self.system {
            Some(system) => vec![system.as_str()],
            None => candidates.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.system {
            Some(system) => write!(f, "{},{}", system, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One memory region holding persistent score data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    /// CPU tag, e.g. `maincpu`. Not used for offline extraction.
    pub cpu: String,
    /// Address space name; only `program` can be extracted.
    pub address_space: String,
    /// Address as written in the definitions (before emulator correction).
    pub address: u64,
    /// Number of bytes.
    pub length: u64,
    /// Expected first byte while the game's own defaults are in RAM.
    pub start_byte: u8,
    /// Expected last byte while the game's own defaults are in RAM.
    pub end_byte: u8,
    /// Optional fill value used by MAME's hiscore plugin before loading.
    pub prefill: Option<u8>,
}

impl Row {
    /// Whether `live` begins with `start_byte` and ends with `end_byte`.
    ///
    /// Only meaningful against live emulator memory: it tells whether the
    /// game has initialized its score table yet. The offline extractor never
    /// calls this, since a saved table may legitimately hold other values.
    pub fn sentinels_match(&self, live: &[u8]) -> bool {
        match (live.first(), live.last()) {
            (Some(&first), Some(&last)) => first == self.start_byte && last == self.end_byte,
            _ => false,
        }
    }
}

/// Definitions block matched for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiscoreEntry {
    /// Header key that matched, e.g. `nes,smb`.
    pub key: String,
    /// System part of the key, if it has one.
    pub system: Option<String>,
    /// Rows in file order.
    pub rows: Vec<Row>,
}

/// Extracted hiscore blob, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hiscore {
    /// Emulator the savestate came from.
    pub emulator: Emulator,
    /// Definitions block the rows were taken from.
    pub entry: HiscoreEntry,
    /// Game as requested.
    pub game: GameId,
    /// Concatenated row bytes.
    pub data: Vec<u8>,
}

impl Hiscore {
    /// Location of the `.hi` file below `output_dir`.
    ///
    /// Console entries go to `<system>/<name>.hi`, using the system of the
    /// matched key. Arcade entries have no system and go to `<name>.hi`.
    pub fn file_path(&self, output_dir: &Path) -> PathBuf {
        let file_name = format!("{}.hi", self.game.name);
        match &self.entry.system {
            Some(system) => output_dir.join(system).join(file_name),
            None => output_dir.join(file_name),
        }
    }
}

/// Summary of one processed savestate, rendered by [`crate::formatter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Savestate path.
    pub file: PathBuf,
    /// Detected emulator.
    pub emulator: Emulator,
    /// Candidate hiscore.dat systems.
    pub systems: Vec<String>,
    /// Size of the decoded RAM, when it could be extracted.
    pub ram_size: Option<usize>,
    /// Why RAM extraction failed, for detection-only reports.
    pub decode_error: Option<String>,
    /// The savestate was unwrapped from a zip container.
    pub from_container: bool,
    /// Matched definitions key, when a lookup was performed.
    pub entry: Option<String>,
    /// Number of rows extracted.
    pub rows: usize,
    /// Written `.hi` file.
    pub output: Option<PathBuf>,
    /// Size of the written `.hi` file.
    pub bytes_written: usize,
}

impl Report {
    /// Report for a recognized savestate whose RAM has not been extracted.
    pub fn detected(file: impl Into<PathBuf>, emulator: Emulator) -> Self {
        Report {
            file: file.into(),
            emulator,
            systems: emulator
                .candidate_systems()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            ram_size: None,
            decode_error: None,
            from_container: false,
            entry: None,
            rows: 0,
            output: None,
            bytes_written: 0,
        }
    }

    /// Report for a decoded savestate.
    pub fn from_state(file: impl Into<PathBuf>, state: &DecodedState<'_>) -> Self {
        Report {
            systems: state.systems.clone(),
            ram_size: Some(state.ram.len()),
            from_container: state.from_container,
            ..Report::detected(file, state.emulator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_parse() {
        assert_eq!(
            GameId::parse("nes,smb"),
            GameId {
                system: Some("nes".into()),
                name: "smb".into()
            }
        );
        assert_eq!(GameId::parse("smb"), GameId::bare("smb"));
        assert_eq!(GameId::parse(",smb"), GameId::bare("smb"));
        assert_eq!(GameId::parse("nes,smb").to_string(), "nes,smb");
    }

    #[test]
    fn test_game_id_extra_commas_stay_in_name() {
        let game = GameId::parse("nes,smb,extra");
        assert_eq!(game.system.as_deref(), Some("nes"));
        assert_eq!(game.name, "smb,extra");
        assert_eq!(game.to_string(), "nes,smb,extra");
    }

    #[test]
    fn test_game_id_systems() {
        let candidates = vec!["nes".to_string(), "famicom".to_string()];
        assert_eq!(GameId::bare("smb").systems(&candidates), vec!["nes", "famicom"]);
        assert_eq!(GameId::parse("fds,smb").systems(&candidates), vec!["fds"]);
    }

    fn hiscore(system: Option<&str>, name: &str) -> Hiscore {
        Hiscore {
            emulator: Emulator::Nestopia,
            entry: HiscoreEntry {
                key: match system {
                    Some(system) => format!("{},{}", system, name),
                    None => name.to_string(),
                },
                system: system.map(str::to_string),
                rows: Vec::new(),
            },
            game: GameId::bare(name),
            data: Vec::new(),
        }
    }

    #[test]
    fn test_hiscore_file_path() {
        let out = Path::new("/hi");
        assert_eq!(
            hiscore(Some("nes"), "smb").file_path(out),
            PathBuf::from("/hi/nes/smb.hi")
        );
        assert_eq!(
            hiscore(Some("snes"), "smb").file_path(out),
            PathBuf::from("/hi/snes/smb.hi")
        );
        assert_eq!(hiscore(None, "pacman").file_path(out), PathBuf::from("/hi/pacman.hi"));
    }

    #[test]
    fn test_detected_report() {
        let report = Report::detected("a.state", Emulator::Bsnes);
        assert_eq!(report.systems, vec!["snes", "snespal"]);
        assert_eq!(report.ram_size, None);
        assert!(report.output.is_none());
    }

    #[test]
    fn test_sentinels() {
        let row = Row {
            cpu: "maincpu".into(),
            address_space: "program".into(),
            address: 0x7D7,
            length: 3,
            start_byte: 0x00,
            end_byte: 0x01,
            prefill: None,
        };
        assert!(row.sentinels_match(&[0x00, 0x55, 0x01]));
        assert!(!row.sentinels_match(&[0x00, 0x55, 0x02]));
        assert!(!row.sentinels_match(&[]));
    }

    #[test]
    fn test_ram_view_ownership() {
        let data = [1u8, 2, 3];
        let view = RamView::borrowed(&data);
        assert!(!view.is_owned());
        assert_eq!(&*view, &[1, 2, 3]);
        let owned = view.into_owned();
        assert!(owned.is_owned());
        assert_eq!(owned.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_emulator_systems() {
        assert_eq!(Emulator::Fceu.candidate_systems()[0], "nes");
        assert!(Emulator::GenesisPlusGx.candidate_systems().contains(&"gamegear"));
        assert!(Emulator::Mame.candidate_systems().is_empty());
        assert_eq!(Emulator::GenesisPlusGx.to_string(), "genplus");
    }
}
