//! Command-line front end for editing stored recipes.

pub mod commands;
pub mod output;
pub mod prompts;
mod test_mode;

use std::env;

use crate::core::errors::Result;

pub use commands::{CliContext, USAGE};
pub use test_mode::DECISIONS_ENV;

/// Runs one command taken from the process arguments.
pub fn run_cli() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
    let context = CliContext::load()?;
    context.dispatch(&command.to_lowercase(), &rest)
}
