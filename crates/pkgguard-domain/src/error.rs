use pkgguard_types::RepoPath;
use thiserror::Error;

/// Setup mistakes that abort a run before any finding is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("\"workspaces\" is missing in {0}")]
    MissingWorkspaces(RepoPath),

    #[error("\"name\" is missing in {0}")]
    MissingName(RepoPath),

    #[error("unknown workspace member \"{0}\"")]
    UnknownMember(String),

    #[error("invalid options for {check}: {reason}")]
    InvalidOptions { check: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid_options(check: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidOptions {
            check,
            reason: reason.into(),
        }
    }
}
