//! The `create` command.

use crate::actions::{required_string, strings};
use crate::commands::params::{
    PARAMETER_ABSTRACT, PARAMETER_DERIVED_FROM, PARAMETER_FILES, PARAMETER_KEYWORD,
    PARAMETER_TITLE, PARAMETER_TYPE,
};
use crate::configuration::Configuration;
use crate::error::CliError;
use crate::session::{NewResource, Session, DEFAULT_RESOURCE_TYPE};
use clap::ArgMatches;
use color_print::cprintln;
use std::path::PathBuf;
use tracing::trace;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateOptions {
    pub title: String,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub resource_type: String,
    pub derived_from: Option<String>,
    pub files: Vec<PathBuf>,
}

impl CreateOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        Ok(Self {
            title: required_string(matches, PARAMETER_TITLE)?,
            abstract_text: required_string(matches, PARAMETER_ABSTRACT)?,
            keywords: strings(matches, PARAMETER_KEYWORD),
            resource_type: matches
                .get_one::<String>(PARAMETER_TYPE)
                .cloned()
                .unwrap_or_else(|| DEFAULT_RESOURCE_TYPE.to_string()),
            derived_from: matches.get_one::<String>(PARAMETER_DERIVED_FROM).cloned(),
            files: matches
                .get_many::<PathBuf>(PARAMETER_FILES)
                .map(|files| files.cloned().collect())
                .unwrap_or_default(),
        })
    }

    fn into_new_resource(self) -> NewResource {
        NewResource::new(self.title, self.abstract_text)
            .keywords(self.keywords)
            .resource_type(self.resource_type)
            .derived_from(self.derived_from)
            .content_files(self.files)
    }
}

/// Landing page of a resource on the site serving `api_url`,
/// e.g. `https://www.hydroshare.org/resource/<id>/`
pub fn resource_landing_page(api_url: &Url, resource_id: &str) -> Option<Url> {
    api_url.join(&format!("../resource/{}/", resource_id)).ok()
}

pub async fn create_resource(
    configuration: &Configuration,
    options: CreateOptions,
) -> Result<(), CliError> {
    trace!("Executing \"create\" command...");

    let api_url = configuration.api_url()?;
    let session = Session::from_configuration(configuration, None).await?;
    let created = session.create_resource(options.into_new_resource()).await?;

    cprintln!("Resource id: <g>{}</g>", created.resource_id);
    if let Some(url) = resource_landing_page(&api_url, &created.resource_id) {
        println!("Available at: {}", url);
    }

    match created.partial_failure {
        Some(failure) => Err(CliError::PartialFailure(failure)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;

    #[test]
    fn test_landing_page() {
        let api_url = Url::parse("https://www.hydroshare.org/hsapi/").unwrap();
        let url = resource_landing_page(&api_url, "abc123").unwrap();
        assert_eq!(url.as_str(), "https://www.hydroshare.org/resource/abc123/");
    }

    #[test]
    fn test_options_from_matches() {
        let matches = build_cli()
            .try_get_matches_from([
                "hstools", "create", "-t", "Title", "-a", "Abstract", "-k", "rain", "-k", "snow",
                "a.csv", "b.csv",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let options = CreateOptions::from_matches(sub).unwrap();

        assert_eq!(options.keywords, vec!["rain", "snow"]);
        assert_eq!(options.resource_type, DEFAULT_RESOURCE_TYPE);
        assert_eq!(options.derived_from, None);
        assert_eq!(options.files, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);

        let resource = options.into_new_resource();
        assert_eq!(resource.title, "Title");
        assert_eq!(resource.content_files.len(), 2);
    }
}
