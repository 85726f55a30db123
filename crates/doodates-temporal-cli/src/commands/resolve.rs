//! Handler for the `resolve` subcommand.

use anyhow::Result;

use super::{prepare, print_json};
use crate::cli::ResolveArgs;

pub fn execute(args: &ResolveArgs) -> Result<()> {
    let prepared = prepare(&args.text, &args.common)?;
    let result = prepared.resolver.resolve(&prepared.text, prepared.reference);
    if args.detailed {
        print_json(&result)
    } else {
        print_json(&result.to_output())
    }
}
