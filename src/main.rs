//! state2hi CLI
//!
//! Command-line tool for extracting hiscore (.hi) files from emulator
//! savestates.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use state2hi::definitions::{Definitions, DEFAULT_PATH};
use state2hi::formatter::{HumanFormatter, JsonFormatter, ReportFormatter, ShortFormatter};
use state2hi::{decode_bytes, hiscore_from_state, inspect_bytes, save_hiscore, GameId, Report};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Extract hiscore data from an emulator savestate.
///
/// Detects the emulator from the savestate, looks the game up in
/// hiscore.dat and writes its score table as `<game>.hi`.
#[derive(Parser, Debug)]
#[command(name = "state2hi")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Savestate file to read
    state: PathBuf,

    /// Game name, or `system,name` to pin the system (default: savestate file stem)
    game: Option<String>,

    /// hiscore.dat definitions file
    #[arg(short, long, env = "HISCORE_DAT_PATH", default_value = DEFAULT_PATH)]
    dat: PathBuf,

    /// Directory the .hi file is written to
    #[arg(short, long, env = "HISCORE_PATH", default_value = ".")]
    output_dir: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Only report the detected emulator, write nothing
    #[arg(short, long)]
    info: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only output essential info)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// Compact single-line output
    Short,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(report) => {
            print!("{}", render(&report, &args));
            ExitCode::SUCCESS
        }
        Err(e) => {
            if !args.quiet {
                eprintln!("Error processing {}: {:#}", args.state.display(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args) {
    let default = if args.verbose {
        "state2hi=debug"
    } else if args.quiet {
        "state2hi=error"
    } else {
        "state2hi=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<Report> {
    let data = std::fs::read(&args.state)
        .with_context(|| format!("cannot read {}", args.state.display()))?;

    if args.info {
        return inspect_bytes(&args.state, &data).context("cannot identify savestate");
    }

    let state = decode_bytes(&data).context("cannot decode savestate")?;
    let mut report = Report::from_state(&args.state, &state);

    let game = match &args.game {
        Some(game) => GameId::parse(game),
        None => GameId::bare(game_name_from_path(&args.state)?),
    };
    tracing::debug!(game = %game, systems = ?state.systems, "looking up game");

    let defs = Definitions::load(&args.dat)
        .with_context(|| format!("cannot load definitions from {}", args.dat.display()))?;
    let hiscore = hiscore_from_state(&state, &game, &defs)?;
    if hiscore.entry.rows.is_empty() {
        bail!("hiscore entry {} has no rows", hiscore.entry.key);
    }

    let path = save_hiscore(&hiscore, &args.output_dir)?;

    report.entry = Some(hiscore.entry.key.clone());
    report.rows = hiscore.entry.rows.len();
    report.bytes_written = hiscore.data.len();
    report.output = Some(path);
    Ok(report)
}

fn game_name_from_path(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .with_context(|| format!("cannot derive a game name from {}", path.display()))
}

fn render(report: &Report, args: &Args) -> String {
    match args.format {
        OutputFormat::Human => {
            let formatter = HumanFormatter {
                verbose: args.verbose,
                quiet: args.quiet,
            };
            formatter.format_report(report)
        }
        OutputFormat::Json => JsonFormatter::new().format_report(report),
        OutputFormat::Short => ShortFormatter::new().format_report(report),
    }
}
