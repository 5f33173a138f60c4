//! The `list` command.

use crate::actions::{flag, output_format, strings};
use crate::commands::params::{PARAMETER_COUNT, PARAMETER_FILTER, PARAMETER_SIZE};
use crate::configuration::Configuration;
use crate::error::CliError;
use crate::format::{Formattable, OutputFormat};
use crate::model::{parse_filter, ResourceFilter, ResourceList, ResourceQuery, ResourceSize};
use crate::session::Session;
use clap::ArgMatches;
use tracing::{trace, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub with_size: bool,
    pub filters: Vec<(ResourceFilter, String)>,
    pub format: OutputFormat,
}

impl ListOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        let filters = strings(matches, PARAMETER_FILTER)
            .iter()
            .map(|expression| parse_filter(expression))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            limit: matches.get_one::<usize>(PARAMETER_COUNT).copied(),
            with_size: flag(matches, PARAMETER_SIZE),
            filters,
            format: output_format(matches)?,
        })
    }

    /// Resources owned by `username` unless an explicit owner filter is given
    pub fn query(&self, username: &str) -> ResourceQuery {
        self.filters.iter().fold(
            ResourceQuery::owned_by(username).with_limit(self.limit),
            |query, (filter, value)| query.with_filter(*filter, value.clone()),
        )
    }
}

pub async fn list_resources(
    configuration: &Configuration,
    options: ListOptions,
) -> Result<(), CliError> {
    trace!("Executing \"list\" command...");

    let session = Session::from_configuration(configuration, None).await?;
    let user = session.user_info().await?;
    let mut resources = session.list_resources(&options.query(&user.username)).await?;

    if options.with_size {
        for resource in resources.iter_mut() {
            let size = match session.resource_size(&resource.resource_id).await {
                Ok(bytes) => ResourceSize::Bytes(bytes),
                Err(e) => {
                    warn!("Could not size resource {}: {}", resource.resource_id, e);
                    ResourceSize::Error
                }
            };
            resource.size = Some(size);
        }
    }

    let output = ResourceList { resources }.format(&options.format)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;

    fn options(args: &[&str]) -> Result<ListOptions, CliError> {
        let matches = build_cli()
            .try_get_matches_from(std::iter::once("hstools").chain(args.iter().copied()))
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        ListOptions::from_matches(sub)
    }

    #[test]
    fn test_default_query_is_owned_by_user() {
        let options = options(&["list"]).unwrap();
        let query = options.query("jdoe");
        assert_eq!(query.filters, vec![(ResourceFilter::Owner, "jdoe".to_string())]);
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_owner_filter_replaces_default() {
        let options = options(&["list", "--filter", "owner=other", "text=rain", "-n", "3"]).unwrap();
        let query = options.query("jdoe");
        assert_eq!(
            query.filters,
            vec![
                (ResourceFilter::Owner, "other".to_string()),
                (ResourceFilter::Text, "rain".to_string()),
            ]
        );
        assert_eq!(query.limit, Some(3));
    }

    #[test]
    fn test_invalid_filter() {
        let result = options(&["list", "--filter", "color=red"]);
        assert!(matches!(result, Err(CliError::InvalidFilter(_))));
    }
}
