//! Handler for the `check` subcommand.
//!
//! Prints which proposed dates the request supports, which it rejects and
//! why, and which dates it implies that were not proposed.

use anyhow::Result;

use super::{prepare, print_json};
use crate::cli::CheckArgs;

pub fn execute(args: &CheckArgs) -> Result<()> {
    let prepared = prepare(&args.text, &args.common)?;
    let check = prepared
        .resolver
        .check_dates(&prepared.text, prepared.reference, &args.dates);
    print_json(&check)
}
