//! Subcommand handlers and the input plumbing they share.

pub mod check;
pub mod resolve;

use std::fs;
use std::io::{self, IsTerminal, Read};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use doodates_temporal::{
    parse_reference_date, reference_date_in, ResolveOptions, Resolver, TodayPolicy,
};
use tracing::debug;

use crate::cli::CommonArgs;

/// Join the positional words, or read the whole of stdin when there are none.
fn read_text(words: &[String]) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no request text given (pass it as arguments or pipe it on stdin)");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("Failed to read request text from stdin")?;
    Ok(text.trim().to_string())
}

fn reference_date(args: &CommonArgs) -> Result<NaiveDate> {
    let reference = match &args.reference {
        Some(date) => parse_reference_date(date).context("Invalid --reference")?,
        None => reference_date_in(&args.timezone, Utc::now()).context("Invalid --timezone")?,
    };
    debug!(%reference, "reference date");
    Ok(reference)
}

/// Options file first, then flags on top.
fn load_options(args: &CommonArgs) -> Result<ResolveOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid options file {}", path.display()))?
        }
        None => ResolveOptions::default(),
    };
    if args.allow_past {
        options.allow_past = true;
    }
    if args.exclude_today {
        options.today_policy = TodayPolicy::Exclude;
    }
    if let Some(day) = args.week_start {
        options.week_start = day.into();
    }
    debug!(?options, "resolve options");
    Ok(options)
}

/// Everything a handler needs before it can resolve.
struct Prepared {
    resolver: Resolver,
    text: String,
    reference: NaiveDate,
}

fn prepare(words: &[String], args: &CommonArgs) -> Result<Prepared> {
    let options = load_options(args)?;
    Ok(Prepared {
        resolver: Resolver::new(options),
        text: read_text(words)?,
        reference: reference_date(args)?,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
