//! Custom exit codes for the hstools application
//!
//! This module defines specific exit codes for different error conditions
//! to make scripting and automation easier.

/// Custom exit codes for hstools
///
/// These codes follow the BSD sysexits.h conventions where possible:
/// - 0: Success
/// - 64-78: Standard exit codes from sysexits.h
/// - 100+: Custom application-specific codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HsExitCode {
    /// Success (0) - Command completed successfully
    Success = exitcode::OK as isize,

    /// Command line usage error (64) - User input error
    UsageError = exitcode::USAGE as isize,

    /// Data format error (65) - Input data was incorrect
    DataError = exitcode::DATAERR as isize,

    /// Cannot open input file (66) - A local file was not found
    NoInput = exitcode::NOINPUT as isize,

    /// Internal software error (70) - Unexpected application error
    SoftwareError = exitcode::SOFTWARE as isize,

    /// IO error (74) - Reading or writing local files failed
    IoError = exitcode::IOERR as isize,

    /// Configuration error (78) - Application configuration issue
    ConfigError = exitcode::CONFIG as isize,

    /// Authentication error (100) - No usable credentials
    AuthError = 100,

    /// API error (102) - HydroShare rejected or failed a request
    ApiError = 102,

    /// Partial failure (103) - The main effect happened, a follow-up step did not
    PartialFailure = 103,
}

impl HsExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get descriptive message for the exit code
    pub fn message(&self) -> &'static str {
        match self {
            HsExitCode::Success => "Success",
            HsExitCode::UsageError => "Command line usage error",
            HsExitCode::DataError => "Data format error",
            HsExitCode::NoInput => "Cannot open input file",
            HsExitCode::SoftwareError => "Internal software error",
            HsExitCode::IoError => "Input/output error",
            HsExitCode::ConfigError => "Configuration error",
            HsExitCode::AuthError => "Authentication error",
            HsExitCode::ApiError => "Remote API error",
            HsExitCode::PartialFailure => "Operation partially completed",
        }
    }
}

impl From<HsExitCode> for i32 {
    fn from(code: HsExitCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sysexits_values() {
        assert_eq!(HsExitCode::Success.code(), 0);
        assert_eq!(HsExitCode::UsageError.code(), 64);
        assert_eq!(HsExitCode::NoInput.code(), 66);
        assert_eq!(HsExitCode::ConfigError.code(), 78);
        assert_eq!(i32::from(HsExitCode::AuthError), 100);
    }
}
