//! The `add` command.

use crate::actions::required_string;
use crate::commands::params::{PARAMETER_FILES, PARAMETER_RESOURCE_ID};
use crate::configuration::Configuration;
use crate::error::CliError;
use crate::session::Session;
use clap::ArgMatches;
use color_print::cprintln;
use std::path::PathBuf;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct AddOptions {
    pub resource_id: String,
    pub files: Vec<PathBuf>,
}

impl AddOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        let files: Vec<PathBuf> = matches
            .get_many::<PathBuf>(PARAMETER_FILES)
            .map(|files| files.cloned().collect())
            .unwrap_or_default();
        if files.is_empty() {
            return Err(CliError::MissingRequiredArgument(PARAMETER_FILES.to_string()));
        }
        Ok(Self {
            resource_id: required_string(matches, PARAMETER_RESOURCE_ID)?,
            files,
        })
    }
}

pub async fn add_content(
    configuration: &Configuration,
    options: AddOptions,
) -> Result<(), CliError> {
    trace!("Executing \"add\" command...");

    let session = Session::from_configuration(configuration, None).await?;
    session
        .add_content_to_existing_resource(&options.resource_id, &options.files)
        .await?;
    cprintln!(
        "Added {} file(s) to resource <g>{}</g>",
        options.files.len(),
        options.resource_id
    );
    Ok(())
}
