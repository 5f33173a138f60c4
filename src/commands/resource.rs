//! Resource command definitions.
//!
//! This module defines the CLI commands that operate on HydroShare resources:
//! listing, describing, downloading, creating, adding content and deleting.

use crate::commands::params::{
    files_parameter, format_parameter, format_pretty_parameter,
    format_with_headers_parameter, long_parameter, resource_id_parameter,
    resource_ids_parameter, save_dir_parameter, COMMAND_ADD, COMMAND_CREATE, COMMAND_DELETE,
    COMMAND_DESCRIBE, COMMAND_GET, COMMAND_LIST, PARAMETER_ABSTRACT, PARAMETER_COUNT,
    PARAMETER_DERIVED_FROM, PARAMETER_FILTER, PARAMETER_FORCE, PARAMETER_KEYWORD,
    PARAMETER_QUIET, PARAMETER_SIZE, PARAMETER_TITLE, PARAMETER_TYPE,
};
use crate::format::{CSV, JSON, PLAIN, YAML};
use crate::model::ResourceFilter;
use crate::session::DEFAULT_RESOURCE_TYPE;
use clap::{Arg, ArgAction, Command};

pub fn list_command() -> Command {
    Command::new(COMMAND_LIST)
        .about("List HydroShare resources that you own")
        .long_about(
            "List HydroShare resources that you own. Filters can be applied to limit which \
             resources are returned. For additional resource details, use the \"-l\" flag. By \
             default, all resources owned by the authenticated user are returned; this can be \
             limited using the \"-n\" flag.",
        )
        .visible_alias("ls")
        .arg(long_parameter("List in long format"))
        .arg(
            Arg::new(PARAMETER_COUNT)
                .short('n')
                .long(PARAMETER_COUNT)
                .num_args(1)
                .value_parser(clap::value_parser!(usize))
                .help("Number of resources to show"),
        )
        .arg(
            Arg::new(PARAMETER_SIZE)
                .short('s')
                .long(PARAMETER_SIZE)
                .action(ArgAction::SetTrue)
                .help("Show resource size"),
        )
        .arg(
            Arg::new(PARAMETER_FILTER)
                .long(PARAMETER_FILTER)
                .num_args(1..)
                .action(ArgAction::Append)
                .value_name("KEY=VALUE")
                .help(format!(
                    "Filter resources by metadata attribute, e.g. owner=<USERNAME> \
                     author=<USERNAME> text=<FULL TEXT>. Available filters: {}",
                    ResourceFilter::names().join(", ")
                )),
        )
        .arg(format_parameter(&[PLAIN, JSON, YAML, CSV], PLAIN))
        .arg(format_pretty_parameter())
        .arg(format_with_headers_parameter())
}

pub fn describe_command() -> Command {
    Command::new(COMMAND_DESCRIBE)
        .about("Describe metadata and files")
        .long_about(
            "Describe the metadata of HydroShare resources. By default a short summary is \
             printed; use the \"-l\" flag for all metadata.",
        )
        .arg(resource_ids_parameter("Unique HydroShare resource identifier"))
        .arg(long_parameter("Long output format"))
        .arg(format_parameter(&[PLAIN, YAML, JSON], YAML))
        .arg(format_pretty_parameter())
}

pub fn delete_command() -> Command {
    Command::new(COMMAND_DELETE)
        .about("Delete a HydroShare resource")
        .long_about(
            "Delete HydroShare resources using their globally unique identifier. The identifier \
             is part of the HydroShare resource URL. WARNING: this action is permanent and cannot \
             be undone.",
        )
        .visible_alias("rm")
        .arg(resource_ids_parameter(
            "Unique HydroShare resource identifier to be deleted",
        ))
        .arg(
            Arg::new(PARAMETER_QUIET)
                .short('q')
                .long(PARAMETER_QUIET)
                .action(ArgAction::SetTrue)
                .help("Suppress output"),
        )
}

pub fn get_command() -> Command {
    Command::new(COMMAND_GET)
        .about("Download a HydroShare resource")
        .arg(resource_id_parameter())
        .arg(save_dir_parameter())
        .arg(
            Arg::new(PARAMETER_FORCE)
                .long(PARAMETER_FORCE)
                .action(ArgAction::SetTrue)
                .help("Overwrite an existing local copy without asking"),
        )
}

pub fn create_command() -> Command {
    Command::new(COMMAND_CREATE)
        .about("Create a HydroShare resource")
        .arg(
            Arg::new(PARAMETER_TITLE)
                .short('t')
                .long(PARAMETER_TITLE)
                .num_args(1)
                .required(true)
                .help("Title of the resource"),
        )
        .arg(
            Arg::new(PARAMETER_ABSTRACT)
                .short('a')
                .long(PARAMETER_ABSTRACT)
                .num_args(1)
                .required(true)
                .help("Abstract of the resource"),
        )
        .arg(
            Arg::new(PARAMETER_KEYWORD)
                .short('k')
                .long(PARAMETER_KEYWORD)
                .num_args(1)
                .action(ArgAction::Append)
                .help("Subject keyword, may be repeated"),
        )
        .arg(
            Arg::new(PARAMETER_TYPE)
                .long(PARAMETER_TYPE)
                .num_args(1)
                .default_value(DEFAULT_RESOURCE_TYPE)
                .help("HydroShare resource type"),
        )
        .arg(
            Arg::new(PARAMETER_DERIVED_FROM)
                .long(PARAMETER_DERIVED_FROM)
                .num_args(1)
                .value_name("RESOURCE_ID")
                .help("Resource the new one is derived from"),
        )
        .arg(files_parameter(false))
}

pub fn add_command() -> Command {
    Command::new(COMMAND_ADD)
        .about("Add content files to an existing HydroShare resource")
        .arg(resource_id_parameter())
        .arg(files_parameter(true))
}
