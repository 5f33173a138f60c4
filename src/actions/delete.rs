//! The `delete` command.

use crate::actions::{flag, strings};
use crate::commands::params::{PARAMETER_QUIET, PARAMETER_RESOURCE_ID};
use crate::configuration::Configuration;
use crate::error::CliError;
use crate::session::Session;
use clap::ArgMatches;
use color_print::cprintln;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOptions {
    pub resource_ids: Vec<String>,
    pub quiet: bool,
}

impl DeleteOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        let resource_ids = strings(matches, PARAMETER_RESOURCE_ID);
        if resource_ids.is_empty() {
            return Err(CliError::MissingRequiredArgument(
                PARAMETER_RESOURCE_ID.to_string(),
            ));
        }
        Ok(Self {
            resource_ids,
            quiet: flag(matches, PARAMETER_QUIET),
        })
    }
}

pub async fn delete_resources(
    configuration: &Configuration,
    options: DeleteOptions,
) -> Result<(), CliError> {
    trace!("Executing \"delete\" command...");

    let session = Session::from_configuration(configuration, None).await?;
    let total = options.resource_ids.len();
    let mut failed = 0;

    for resource_id in &options.resource_ids {
        match session.delete_resource(resource_id).await {
            Ok(()) => {
                if !options.quiet {
                    cprintln!("Deleted resource <g>{}</g>", resource_id);
                }
            }
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
