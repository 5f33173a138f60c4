//! The `describe` command.

use crate::actions::{output_format, separator, strings};
use crate::commands::params::PARAMETER_RESOURCE_ID;
use crate::configuration::Configuration;
use crate::error::CliError;
use crate::format::{Formattable, OutputFormat};
use crate::session::Session;
use clap::ArgMatches;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeOptions {
    pub resource_ids: Vec<String>,
    pub format: OutputFormat,
}

impl DescribeOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        let resource_ids = strings(matches, PARAMETER_RESOURCE_ID);
        if resource_ids.is_empty() {
            return Err(CliError::MissingRequiredArgument(
                PARAMETER_RESOURCE_ID.to_string(),
            ));
        }
        Ok(Self {
            resource_ids,
            format: output_format(matches)?,
        })
    }
}

/// Print the metadata of each resource. A failing identifier is reported and
/// the remaining ones are still described.
pub async fn describe_resources(
    configuration: &Configuration,
    options: DescribeOptions,
) -> Result<(), CliError> {
    trace!("Executing \"describe\" command...");

    let session = Session::from_configuration(configuration, None).await?;
    let total = options.resource_ids.len();
    let mut failed = 0;

    for resource_id in &options.resource_ids {
        println!("{}", separator());
        let described = match session.get_resource_metadata(resource_id).await {
            Ok(metadata) => metadata.format(&options.format).map_err(CliError::from),
            Err(e) => Err(CliError::from(e)),
        };
        match described {
            Ok(output) => println!("{}", output.trim_end()),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        Err(CliError::BatchFailed { failed, total })
    } else {
        Ok(())
    }
}
