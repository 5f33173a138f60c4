use clap::ArgMatches;
use hstools::actions::add::{add_content, AddOptions};
use hstools::actions::config::{print_configuration_path, show_configuration};
use hstools::actions::create::{create_resource, CreateOptions};
use hstools::actions::delete::{delete_resources, DeleteOptions};
use hstools::actions::describe::{describe_resources, DescribeOptions};
use hstools::actions::get::{get_resource, GetOptions};
use hstools::actions::list::{list_resources, ListOptions};
use hstools::commands::{
    COMMAND_ADD, COMMAND_CONFIG, COMMAND_CREATE, COMMAND_DELETE, COMMAND_DESCRIBE, COMMAND_GET,
    COMMAND_LIST, COMMAND_PATH, COMMAND_SHOW,
};
use hstools::configuration::Configuration;
use hstools::error::CliError;

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    let message = match sub_matches.subcommand() {
        Some(m) => m.0,
        None => "unknown",
    };

    message.to_string()
}

pub async fn execute_command(
    configuration: &Configuration,
    commands: &ArgMatches,
) -> Result<(), CliError> {
    match commands.subcommand() {
        Some((COMMAND_LIST, sub_matches)) => {
            list_resources(configuration, ListOptions::from_matches(sub_matches)?).await
        }
        Some((COMMAND_DESCRIBE, sub_matches)) => {
            describe_resources(configuration, DescribeOptions::from_matches(sub_matches)?).await
        }
        Some((COMMAND_DELETE, sub_matches)) => {
            delete_resources(configuration, DeleteOptions::from_matches(sub_matches)?).await
        }
        Some((COMMAND_GET, sub_matches)) => {
            get_resource(configuration, GetOptions::from_matches(sub_matches)?).await
        }
        Some((COMMAND_CREATE, sub_matches)) => {
            create_resource(configuration, CreateOptions::from_matches(sub_matches)?).await
        }
        Some((COMMAND_ADD, sub_matches)) => {
            add_content(configuration, AddOptions::from_matches(sub_matches)?).await
        }
        Some((COMMAND_CONFIG, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_PATH, _)) => print_configuration_path(),
            Some((COMMAND_SHOW, sub_matches)) => show_configuration(configuration, sub_matches),
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
            commands,
        ))),
    }
}
