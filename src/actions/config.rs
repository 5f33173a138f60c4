//! The `config` commands.

use crate::actions::output_format;
use crate::configuration::Configuration;
use crate::error::CliError;
use crate::format::Formattable;
use clap::ArgMatches;
use tracing::trace;

pub fn print_configuration_path() -> Result<(), CliError> {
    trace!("Executing \"config path\" command...");
    let path = Configuration::get_default_configuration_file_path()?;
    println!("{}", path.display());
    Ok(())
}

pub fn show_configuration(
    configuration: &Configuration,
    matches: &ArgMatches,
) -> Result<(), CliError> {
    trace!("Executing \"config show\" command...");
    let format = output_format(matches)?;
    println!("{}", configuration.format(&format)?.trim_end());
    Ok(())
}
