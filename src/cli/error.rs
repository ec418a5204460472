//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::NotFound(_) => crate::exitcode::NOINPUT,
            CliError::Application(e) => match e {
                ApplicationError::Domain(DomainError::InvalidArgument(_)) => crate::exitcode::USAGE,
                ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
                ApplicationError::Source(_) => crate::exitcode::UNAVAILABLE,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::SourceError;
    use rstest::rstest;

    fn app(e: ApplicationError) -> CliError {
        CliError::Application(e)
    }

    #[rstest]
    #[case(CliError::InvalidArgs("x".into()), crate::exitcode::USAGE)]
    #[case(CliError::NotFound("x".into()), crate::exitcode::NOINPUT)]
    #[case(app(DomainError::InvalidArgument("x".into()).into()), crate::exitcode::USAGE)]
    #[case(app(DomainError::InvalidState("x".into()).into()), crate::exitcode::SOFTWARE)]
    #[case(app(SourceError::transport("x").into()), crate::exitcode::UNAVAILABLE)]
    #[case(app(ApplicationError::Config { message: "x".into() }), crate::exitcode::CONFIG)]
    fn test_exit_code_mapping(#[case] err: CliError, #[case] code: i32) {
        assert_eq!(err.exit_code(), code);
    }
}
