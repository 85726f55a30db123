//! Command-line argument definitions for doodates-dates.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use doodates_temporal::WeekStartDay;

/// Resolve French scheduling requests into poll dates.
#[derive(Debug, Parser)]
#[command(name = "doodates-dates")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (-v debug, -vv trace), written to stderr
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a request into dates, time slots and a confidence label.
    Resolve(ResolveArgs),

    /// Check proposed dates against the deterministic reading of a request.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// The request text. If omitted, reads from stdin.
    pub text: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Print the full resolution (provenance, kind, matched expression)
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// The request text. If omitted, reads from stdin.
    pub text: Vec<String>,

    /// Proposed ISO dates, comma-separated
    #[arg(long, required = true, value_delimiter = ',', value_name = "DATES")]
    pub dates: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Reference date and option flags shared by every subcommand.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Reference date (YYYY-MM-DD). Defaults to today in --timezone.
    #[arg(long, short = 'r', value_name = "DATE")]
    pub reference: Option<String>,

    /// IANA timezone used to compute today's date
    #[arg(long, default_value = "Europe/Paris", value_name = "TZ")]
    pub timezone: String,

    /// JSON options file (camelCase ResolveOptions fields)
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Keep dates earlier than the reference date
    #[arg(long)]
    pub allow_past: bool,

    /// Never count the reference date as the next occurrence of its weekday
    #[arg(long)]
    pub exclude_today: bool,

    /// First day of the week for whole-week expressions
    #[arg(long, value_enum, value_name = "DAY")]
    pub week_start: Option<WeekStart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeekStart {
    Monday,
    Sunday,
}

impl From<WeekStart> for WeekStartDay {
    fn from(day: WeekStart) -> Self {
        match day {
            WeekStart::Monday => WeekStartDay::Monday,
            WeekStart::Sunday => WeekStartDay::Sunday,
        }
    }
}
