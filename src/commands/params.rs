//! Shared command parameters for all CLI commands.
//!
//! This module defines the names of the commands and their parameters, and
//! the argument definitions reused across subcommands.

use clap::{Arg, ArgAction};
use std::path::PathBuf;

// Resource commands
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_DESCRIBE: &str = "describe";
pub const COMMAND_DELETE: &str = "delete";
pub const COMMAND_GET: &str = "get";
pub const COMMAND_CREATE: &str = "create";
pub const COMMAND_ADD: &str = "add";

// Config commands
pub const COMMAND_CONFIG: &str = "config";
pub const COMMAND_PATH: &str = "path";
pub const COMMAND_SHOW: &str = "show";

// Parameter names
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_QUIET: &str = "quiet";
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";
pub const PARAMETER_LONG: &str = "long";
pub const PARAMETER_COUNT: &str = "count";
pub const PARAMETER_SIZE: &str = "size";
pub const PARAMETER_FILTER: &str = "filter";
pub const PARAMETER_RESOURCE_ID: &str = "resource_id";
pub const PARAMETER_SAVE_DIR: &str = "save-dir";
pub const PARAMETER_FORCE: &str = "force";
pub const PARAMETER_TITLE: &str = "title";
pub const PARAMETER_ABSTRACT: &str = "abstract";
pub const PARAMETER_KEYWORD: &str = "keyword";
pub const PARAMETER_TYPE: &str = "type";
pub const PARAMETER_DERIVED_FROM: &str = "derived-from";
pub const PARAMETER_FILES: &str = "files";

/// Create the output format parameter.
///
/// `names` restricts the formats a command accepts.
pub fn format_parameter(names: &[&'static str], default: &'static str) -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .default_value(default)
        .help("Output data format")
        .value_parser(names.to_vec())
}

pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Format JSON output pretty")
}

pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Include a header row in CSV output")
}

pub fn long_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_LONG)
        .short('l')
        .long(PARAMETER_LONG)
        .action(ArgAction::SetTrue)
        .help(help)
}

/// One or more resource identifiers.
pub fn resource_ids_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_RESOURCE_ID)
        .num_args(1..)
        .required(true)
        .value_name("RESOURCE_ID")
        .help(help)
}

/// Exactly one resource identifier.
pub fn resource_id_parameter() -> Arg {
    Arg::new(PARAMETER_RESOURCE_ID)
        .num_args(1)
        .required(true)
        .value_name("RESOURCE_ID")
        .help("Unique HydroShare resource identifier")
}

pub fn save_dir_parameter() -> Arg {
    Arg::new(PARAMETER_SAVE_DIR)
        .short('d')
        .long(PARAMETER_SAVE_DIR)
        .num_args(1)
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Directory resources are saved in (defaults to $JUPYTER_DOWNLOADS, then the current directory)")
}

/// Local files to upload.
pub fn files_parameter(required: bool) -> Arg {
    Arg::new(PARAMETER_FILES)
        .num_args(1..)
        .required(required)
        .value_name("FILE")
        .value_parser(clap::value_parser!(PathBuf))
        .help("Local files to upload")
}
