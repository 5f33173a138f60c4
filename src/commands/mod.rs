//! CLI command definitions and argument parsing.
//!
//! This module defines all the CLI commands and their arguments using the clap crate.
//! Resource commands live in [`resource`], configuration commands in [`config`],
//! and the argument definitions they share in [`params`].

use clap::{Arg, ArgAction, ArgMatches, Command};

pub mod config;
pub mod params;
pub mod resource;

pub use params::{
    COMMAND_ADD, COMMAND_CONFIG, COMMAND_CREATE, COMMAND_DELETE, COMMAND_DESCRIBE, COMMAND_GET,
    COMMAND_LIST, COMMAND_PATH, COMMAND_SHOW, PARAMETER_VERBOSE,
};

/// Build the complete command-line interface.
pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(PARAMETER_VERBOSE)
                .short('v')
                .long(PARAMETER_VERBOSE)
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable verbose output for debugging"),
        )
        .subcommand(resource::list_command())
        .subcommand(resource::describe_command())
        .subcommand(resource::delete_command())
        .subcommand(resource::get_command())
        .subcommand(resource::create_command())
        .subcommand(resource::add_command())
        .subcommand(config::config_command())
}

/// Parse the process arguments.
///
/// # Returns
///
/// An `ArgMatches` instance containing the parsed command-line arguments.
pub fn create_cli_commands() -> ArgMatches {
    build_cli().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_parse_list_filters() {
        let matches = build_cli()
            .try_get_matches_from(["hstools", "list", "--filter", "author=jdoe", "text=rain", "-n", "5"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, COMMAND_LIST);
        let filters: Vec<&String> = sub
            .get_many::<String>(params::PARAMETER_FILTER)
            .unwrap()
            .collect();
        assert_eq!(filters, vec!["author=jdoe", "text=rain"]);
        assert_eq!(sub.get_one::<usize>(params::PARAMETER_COUNT), Some(&5));
    }

    #[test]
    fn test_create_requires_title_and_abstract() {
        let result = build_cli().try_get_matches_from(["hstools", "create", "--title", "t"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_describe_rejects_csv() {
        let result = build_cli().try_get_matches_from(["hstools", "describe", "abc", "-f", "csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = build_cli()
            .try_get_matches_from(["hstools", "delete", "abc", "-v"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(sub.get_flag(PARAMETER_VERBOSE));
    }
}
