use thiserror::Error;

use crate::{
    configuration::ConfigurationError, exit_codes::HsExitCode, format::FormattingError,
    model::InvalidFilter, session::PartialFailure, session::SessionError,
};

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// Error when an unsupported or undefined subcommand is encountered
    #[error("Undefined or unsupported subcommand: {0}")]
    UnsupportedSubcommand(String),
    /// Error related to configuration loading or management
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    /// Error related to data formatting
    #[error("Formatting error: {0}")]
    FormattingError(#[from] FormattingError),
    /// Error when a required command-line argument is missing
    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),
    #[error("{0}")]
    InvalidFilter(#[from] InvalidFilter),
    #[error("{0}")]
    SessionError(#[from] SessionError),
    #[error("{0}")]
    PartialFailure(#[from] PartialFailure),
    #[error("Failed to read user input: {0}")]
    PromptError(#[from] inquire::InquireError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Some items of a batch command failed; each was already reported
    #[error("{failed} of {total} resource(s) failed")]
    BatchFailed { failed: usize, total: usize },
}

impl CliError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> HsExitCode {
        match self {
            CliError::UnsupportedSubcommand(_) => HsExitCode::UsageError,
            CliError::MissingRequiredArgument(_) => HsExitCode::UsageError,
            CliError::InvalidFilter(_) => HsExitCode::UsageError,
            CliError::ConfigurationError(_) => HsExitCode::ConfigError,
            CliError::FormattingError(_) => HsExitCode::DataError,
            CliError::SessionError(e) => match e {
                SessionError::Configuration(_) => HsExitCode::ConfigError,
                SessionError::Authentication { .. } => HsExitCode::AuthError,
                SessionError::Input(_) => HsExitCode::NoInput,
                SessionError::Remote { .. } | SessionError::Service(_) => HsExitCode::ApiError,
                SessionError::Io { .. } => HsExitCode::IoError,
                SessionError::Worker(_) | SessionError::Closed => HsExitCode::SoftwareError,
            },
            CliError::PartialFailure(_) => HsExitCode::PartialFailure,
            CliError::PromptError(_) => HsExitCode::UsageError,
            CliError::IoError(_) => HsExitCode::IoError,
            CliError::BatchFailed { .. } => HsExitCode::ApiError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let error = CliError::from(SessionError::Configuration(PathBuf::from("/nope")));
        assert_eq!(error.exit_code(), HsExitCode::ConfigError);

        let error = CliError::from(SessionError::Authentication { attempts: vec![] });
        assert_eq!(error.exit_code(), HsExitCode::AuthError);

        let error = CliError::from(SessionError::Input("missing.txt".into()));
        assert_eq!(error.exit_code(), HsExitCode::NoInput);

        let error = CliError::from(InvalidFilter("color=red".into()));
        assert_eq!(error.exit_code(), HsExitCode::UsageError);
    }
}
