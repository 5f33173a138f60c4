use hstools::commands::{create_cli_commands, PARAMETER_VERBOSE};
use hstools::configuration::Configuration;
use hstools::error::CliError;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::execute_command;

fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("hstools=debug")
    } else {
        EnvFilter::from_default_env()
    }
}

async fn run() -> Result<(), CliError> {
    let commands = create_cli_commands();

    // Initialize the logging subsystem
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(commands.get_flag(PARAMETER_VERBOSE)))
        .with_writer(std::io::stderr)
        .init();

    let configuration = Configuration::load_or_create_default()?;
    execute_command(&configuration, &commands).await
}

/// Main entry point for the program
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("ERROR: {}", e);
        ::std::process::exit(e.exit_code().code());
    }
}
