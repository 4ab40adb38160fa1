use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing_subscriber::EnvFilter;

use pearls_core::{CellSequence, is_valid_for_move_blocks, is_valid_for_move_player};
use report::{Detail, Report};

mod report;

/// Shift blocks and the player along a row of puzzle cells.
///
/// Cells are written one symbol each: `.` empty, `#` wall, `o` pearl, `+`/`-`
/// blocks, `_` open gate, `|` closed gate, `*` spikes, `@` portal. Whitespace
/// is ignored.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Print the outcome as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report whether the row is valid for each shift
    Check {
        #[arg(allow_hyphen_values = true)]
        cells: String,
    },
    /// Shift all movable blocks right
    Blocks {
        #[arg(allow_hyphen_values = true)]
        cells: String,
    },
    /// Shift the player right
    Player {
        #[arg(allow_hyphen_values = true)]
        cells: String,
    },
    /// Shift blocks, then the player
    Shift {
        #[arg(allow_hyphen_values = true)]
        cells: String,
    },
}

impl Command {
    fn cells(&self) -> &str {
        match self {
            Self::Check { cells } => cells,
            Self::Blocks { cells } => cells,
            Self::Player { cells } => cells,
            Self::Shift { cells } => cells,
        }
    }
}

fn init_logging(verbose: &Verbosity<WarnLevel>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(verbose.log_level_filter().as_str().to_ascii_lowercase())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(command: &Command) -> Result<Report> {
    let text = command.cells();
    let before: CellSequence = text
        .parse()
        .with_context(|| format!("cannot read cells from `{text}`"))?;
    let mut after = before.clone();
    log::debug!("Running {:?} on {} cells", command, before.len());

    let detail = match command {
        Command::Check { .. } => Detail::Check {
            valid_for_move_blocks: is_valid_for_move_blocks(&before),
            valid_for_move_player: is_valid_for_move_player(&before),
        },
        Command::Blocks { .. } => Detail::Blocks(
            pearls_core::try_move_blocks(&mut after)
                .with_context(|| format!("cannot shift blocks in `{before}`"))?,
        ),
        Command::Player { .. } => Detail::Player(
            pearls_core::try_move_player(&mut after)
                .with_context(|| format!("cannot shift the player in `{before}`"))?,
        ),
        Command::Shift { .. } => Detail::Shift(
            pearls_core::shift_right(&mut after)
                .with_context(|| format!("cannot play a turn on `{before}`"))?,
        ),
    };

    Ok(Report {
        before,
        after,
        detail,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.verbose);

    let report = run(&cli.command)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
