//! hiscore.dat definitions database.
//!
//! The database is a line-oriented text file:
//!
//! ```text
//! ; comment
//! nes,smb:
//! nes,smb1:
//! @:maincpu,program,07d7,06,00,00
//! @:maincpu,program,07dd,06,00,00
//!
//! pacman:
//! @:maincpu,program,4e88,04,00,00
//! ```
//!
//! One or more header lines (`key:`) open a block, `@` lines are its rows,
//! and a blank line closes it. Keys are `system,game` for console entries
//! and a bare driver name for arcade entries. Rows are only parsed when
//! their block is looked up, so a malformed entry elsewhere in the file does
//! not prevent other games from resolving.

use crate::error::DefinitionsError;
use crate::types::{HiscoreEntry, Row};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default location of the console hiscore database installed by MAME.
pub const DEFAULT_PATH: &str = "/usr/share/games/mame/plugins/console_hiscore/console_hiscore.dat";

#[derive(Debug, Clone, Default)]
struct Block {
    keys: Vec<String>,
    /// (1-based line number, row text)
    rows: Vec<(usize, String)>,
}

/// Parsed definitions database.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    blocks: Vec<Block>,
    /// Key to the first block declaring it.
    index: HashMap<String, usize>,
}

impl Definitions {
    /// Parse definitions from text.
    pub fn parse(text: &str) -> Self {
        let mut defs = Definitions::default();
        let mut current: Option<Block> = None;

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();

            if line.is_empty() {
                defs.close(current.take());
                continue;
            }
            if line.starts_with(';') {
                continue;
            }
            if line.starts_with('@') {
                match current.as_mut() {
                    Some(block) => block.rows.push((i + 1, line.to_string())),
                    None => tracing::trace!(line = i + 1, "row outside of any block"),
                }
                continue;
            }
            if let Some(header) = line.strip_suffix(':') {
                // A header directly after rows starts a new block.
                if current.as_ref().map_or(false, |b| !b.rows.is_empty()) {
                    defs.close(current.take());
                }
                let key = header.split(':').next().unwrap_or(header);
                current
                    .get_or_insert_with(Block::default)
                    .keys
                    .push(key.to_string());
            }
        }
        defs.close(current);

        tracing::debug!(blocks = defs.blocks.len(), keys = defs.index.len(), "definitions parsed");
        defs
    }

    /// Read and parse definitions from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DefinitionsError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::parse(&String::from_utf8_lossy(&buf)))
    }

    /// Read and parse a definitions file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionsError> {
        Self::from_reader(File::open(path)?)
    }

    fn close(&mut self, block: Option<Block>) {
        let Some(block) = block else { return };
        if block.keys.is_empty() {
            return;
        }
        let id = self.blocks.len();
        for key in &block.keys {
            self.index.entry(key.clone()).or_insert(id);
        }
        self.blocks.push(block);
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the database has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether some block declares `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Find the entry for `game` under the first matching candidate system.
    ///
    /// Keys are tried as `system,game` in candidate order; with no
    /// candidates the bare `game` key is tried instead.
    pub fn lookup<S: AsRef<str>>(
        &self,
        systems: &[S],
        game: &str,
    ) -> Result<HiscoreEntry, DefinitionsError> {
        let keys: Vec<String> = if systems.is_empty() {
            vec![game.to_string()]
        } else {
            systems
                .iter()
                .map(|system| format!("{},{}", system.as_ref(), game))
                .collect()
        };

        for key in &keys {
            if let Some(&id) = self.index.get(key) {
                let rows = self.blocks[id]
                    .rows
                    .iter()
                    .map(|(line, text)| parse_row(*line, text))
                    .collect::<Result<Vec<_>, _>>()?;
                tracing::debug!(key = %key, rows = rows.len(), "definitions entry found");
                return Ok(HiscoreEntry {
                    key: key.clone(),
                    system: key.split_once(',').map(|(system, _)| system.to_string()),
                    rows,
                });
            }
        }

        Err(DefinitionsError::NoEntry {
            game: game.to_string(),
            tried: keys,
        })
    }

    /// Rows for `game` under the first matching candidate system.
    pub fn lookup_rows<S: AsRef<str>>(
        &self,
        systems: &[S],
        game: &str,
    ) -> Result<Vec<Row>, DefinitionsError> {
        self.lookup(systems, game).map(|entry| entry.rows)
    }
}

/// Open the definitions file at `path` and look up `game`.
pub fn lookup_rows<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    systems: &[S],
    game: &str,
) -> Result<Vec<Row>, DefinitionsError> {
    Definitions::load(path)?.lookup_rows(systems, game)
}

/// Parse one `@` row line.
///
/// Format: `@<prefix>:<cpu>,<space>,<address>,<length>,<start>,<end>[,<prefill>]`
/// with hexadecimal numbers.
pub fn parse_row(line: usize, text: &str) -> Result<Row, DefinitionsError> {
    let malformed = |reason: String| DefinitionsError::MalformedRow { line, reason };

    let body = text
        .strip_prefix('@')
        .ok_or_else(|| malformed("row does not start with '@'".to_string()))?;
    let fields: Vec<&str> = body.split(',').map(str::trim).collect();
    if !(6..=7).contains(&fields.len()) {
        return Err(malformed(format!(
            "expected 6 or 7 fields, found {}",
            fields.len()
        )));
    }

    let cpu = fields[0]
        .rsplit_once(':')
        .map_or(fields[0], |(_, tag)| tag)
        .to_string();

    let hex_u64 = |name: &str, s: &str| {
        u64::from_str_radix(s.trim_start_matches("0x"), 16)
            .map_err(|e| malformed(format!("invalid {} {:?}: {}", name, s, e)))
    };
    let hex_u8 = |name: &str, s: &str| {
        u8::from_str_radix(s.trim_start_matches("0x"), 16)
            .map_err(|e| malformed(format!("invalid {} {:?}: {}", name, s, e)))
    };

    Ok(Row {
        cpu,
        address_space: fields[1].to_string(),
        address: hex_u64("address", fields[2])?,
        length: hex_u64("length", fields[3])?,
        start_byte: hex_u8("start byte", fields[4])?,
        end_byte: hex_u8("end byte", fields[5])?,
        prefill: fields.get(6).map(|s| hex_u8("prefill", *s)).transpose()?,
    })
}
