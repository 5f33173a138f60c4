//! Command implementations.
//!
//! Each subcommand maps its `ArgMatches` into a typed options struct and runs
//! against a [`Session`](crate::session::Session) built from the configuration.

use crate::commands::params::{
    PARAMETER_FORMAT, PARAMETER_HEADERS, PARAMETER_LONG, PARAMETER_PRETTY,
};
use crate::error::CliError;
use crate::format::{OutputFormat, OutputFormatOptions};
use clap::ArgMatches;

pub mod add;
pub mod config;
pub mod create;
pub mod delete;
pub mod describe;
pub mod get;
pub mod list;

/// Width of the separator printed between per-resource outputs
const SEPARATOR_WIDTH: usize = 50;

pub(crate) fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Value of a flag, or `false` when the command does not define it
pub(crate) fn flag(matches: &ArgMatches, name: &str) -> bool {
    matches
        .try_get_one::<bool>(name)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

pub(crate) fn required_string(matches: &ArgMatches, name: &str) -> Result<String, CliError> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| CliError::MissingRequiredArgument(name.to_string()))
}

pub(crate) fn strings(matches: &ArgMatches, name: &str) -> Vec<String> {
    matches
        .try_get_many::<String>(name)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Build the output format from `--format` and its modifier flags
pub(crate) fn output_format(matches: &ArgMatches) -> Result<OutputFormat, CliError> {
    let options = OutputFormatOptions {
        long: flag(matches, PARAMETER_LONG),
        with_headers: flag(matches, PARAMETER_HEADERS),
        pretty: flag(matches, PARAMETER_PRETTY),
    };
    match matches.try_get_one::<String>(PARAMETER_FORMAT).ok().flatten() {
        Some(name) => Ok(OutputFormat::from_string_with_options(name, options)?),
        None => Ok(OutputFormat::Plain(options)),
    }
}
