//! Command implementations

pub mod convert;
pub mod info;
pub mod merge;

use std::process::ExitCode;

use anyhow::Result;
use clap::CommandFactory;
use clap::error::ErrorKind;

use crate::cli::Cli;

pub fn execute(cli: Cli) -> Result<ExitCode> {
    let options = cli.export_options();

    if cli.info {
        info::execute(&cli.paths)
    } else if cli.merge {
        match cli.paths.as_slice() {
            [output, inputs @ ..] if inputs.len() >= 2 => merge::execute(output, inputs, options),
            _ => usage_error(
                "Merge mode requires an output file followed by at least two input MD3 files.",
            ),
        }
    } else {
        match cli.paths.as_slice() {
            [input] => convert::execute(input, None, options),
            [input, output] => convert::execute(input, Some(output.as_path()), options),
            _ => usage_error("Expected one input file and at most one output name or directory."),
        }
    }
}

/// Report a usage problem the way clap reports parse errors
fn usage_error(message: &str) -> Result<ExitCode> {
    Cli::command()
        .error(ErrorKind::WrongNumberOfValues, message)
        .print()?;
    Ok(ExitCode::FAILURE)
}
