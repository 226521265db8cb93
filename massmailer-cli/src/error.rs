//! Error types for the MassMailer CLI.

use std::fmt;

use massmailer_mail::MailError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Template rendering error
    Template(String),

    /// Mail configuration or delivery error
    Mail(MailError),

    /// File already exists
    FileExists(String),

    /// Project not found (not in a MassMailer project directory)
    NotInProject,

    /// Invalid argument
    InvalidArgument(String),

    /// The dispatcher reported failed recipients
    DeliveryFailed,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Template(msg) => write!(f, "Template error: {}", msg),
            CliError::Mail(e) => write!(f, "Mail error: {}", e),
            CliError::FileExists(path) => {
                write!(f, "File already exists: {} (use --force to overwrite)", path)
            }
            CliError::NotInProject => write!(
                f,
                "Not in a MassMailer project directory. Run this command from your project root or pass --path."
            ),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::DeliveryFailed => {
                write!(f, "One or more recipients could not be delivered")
            }
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<handlebars::RenderError> for CliError {
    fn from(e: handlebars::RenderError) -> Self {
        CliError::Template(e.to_string())
    }
}

impl From<MailError> for CliError {
    fn from(e: MailError) -> Self {
        CliError::Mail(e)
    }
}
