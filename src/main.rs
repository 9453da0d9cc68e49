use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use slotrow::consts::DEFAULT_MIN_SLOT;
use slotrow::{Direction, Shift, SlotError, SlotIndex, SlotRow};
use tracing::{Level, info, warn};

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing row; pass --row or --row-file, or set SLOTROW_ROW")]
    MissingRow,
    #[error("failed to read row file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid row: {0}")]
    Row(#[from] SlotError),
}

#[derive(Parser, Debug)]
#[command(name = "slotrow", about = "Insert cards into a slot row by shifting toward the nearest gap")]
struct Cli {
    #[command(flatten)]
    source: RowSource,

    /// Log each shift to stderr.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RowSource {
    /// Index of the first slot when the row is given as a bare array.
    #[arg(long, env = "SLOTROW_MIN", default_value_t = DEFAULT_MIN_SLOT, allow_negative_numbers = true)]
    min: SlotIndex,

    /// Row as a JSON array of cards, `null` for empty: `[null,"A","B"]`.
    /// Takes precedence over `--row-file`.
    #[arg(long, env = "SLOTROW_ROW")]
    row: Option<String>,

    /// File holding a row snapshot (`{"min":1,"slots":[...]}`) or a bare array.
    #[arg(long, env = "SLOTROW_ROW_FILE")]
    row_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop a card onto a slot, shifting occupants toward the nearest gap.
    Insert {
        #[arg(long, allow_negative_numbers = true)]
        target: SlotIndex,
        #[arg(long)]
        card: String,
        #[arg(long, value_enum)]
        direction: DirectionArg,
    },
    /// Move a card already on the row onto another slot.
    Move {
        #[arg(long, allow_negative_numbers = true)]
        from: SlotIndex,
        #[arg(long, allow_negative_numbers = true)]
        to: SlotIndex,
        #[arg(long, value_enum)]
        direction: DirectionArg,
    },
    /// Report the nearest empty slot past a target.
    Scan {
        #[arg(long, allow_negative_numbers = true)]
        target: SlotIndex,
        #[arg(long, value_enum)]
        direction: DirectionArg,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DirectionArg {
    Forward,
    Backward,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Forward => Self::Forward,
            DirectionArg::Backward => Self::Backward,
        }
    }
}

fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let row = load_row(&cli.source)?;
    info!(min = row.min(), max = row.max(), occupied = row.occupied_count(), "row loaded");

    let (report, ok) = match cli.command {
        Command::Insert { target, card, direction } => run_insert(row, target, card, direction.into()),
        Command::Move { from, to, direction } => run_move(row, from, to, direction.into()),
        Command::Scan { target, direction } => (run_scan(&row, target, direction.into()), true),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Resolve the row from `--row` or `--row-file`.
fn load_row(source: &RowSource) -> Result<SlotRow<String>, CliError> {
    let raw = match (&source.row, &source.row_file) {
        (Some(row), _) => row.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => return Err(CliError::MissingRow),
    };
    parse_row(&raw, source.min)
}

/// Accepts either a full snapshot object or a bare array starting at `min`.
fn parse_row(raw: &str, min: SlotIndex) -> Result<SlotRow<String>, CliError> {
    let value: Value = serde_json::from_str(raw)?;
    if value.is_array() {
        let occupants: Vec<Option<String>> = serde_json::from_value(value)?;
        return Ok(SlotRow::from_slots(min, occupants)?);
    }
    Ok(serde_json::from_value(value)?)
}

fn run_insert(mut row: SlotRow<String>, target: SlotIndex, card: String, direction: Direction) -> (Value, bool) {
    let result = row.insert_at(target, card, direction);
    shift_report(&row, result)
}

fn run_move(mut row: SlotRow<String>, from: SlotIndex, to: SlotIndex, direction: Direction) -> (Value, bool) {
    let result = row.move_card(from, to, direction);
    shift_report(&row, result)
}

/// JSON report for a mutation; on error `row` is the unchanged input.
fn shift_report(row: &SlotRow<String>, result: Result<Shift, SlotError>) -> (Value, bool) {
    match result {
        Ok(shift) => (json!({ "ok": true, "shift": shift, "row": row }), true),
        Err(e) => {
            warn!(error = %e, "operation rejected");
            let report = json!({
                "ok": false,
                "code": e.error_code(),
                "message": e.to_string(),
                "row": row,
            });
            (report, false)
        }
    }
}

fn run_scan(row: &SlotRow<String>, target: SlotIndex, direction: Direction) -> Value {
    json!({ "target": target, "direction": direction, "empty_slot": row.nearest_empty(target, direction) })
}
