use clashgate_core::BotErrorKind;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] clashgate_core::ConfigError),

    #[error(transparent)]
    Validation(#[from] clashgate_core::ValidationError),

    /// API failure, already rendered for the user.
    #[error("{message}")]
    Api { kind: BotErrorKind, message: String },

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<clashgate_core::ClientError> for CliError {
    fn from(error: clashgate_core::ClientError) -> Self {
        match error {
            clashgate_core::ClientError::Config(error) => Self::Config(error),
            clashgate_core::ClientError::Validation(error) => Self::Validation(error),
            clashgate_core::ClientError::Api(error) => Self::Command(error.to_string()),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Api { kind, .. } => match kind {
                BotErrorKind::Unauthorized => 3,
                BotErrorKind::NotFound => 4,
                BotErrorKind::RateLimited => 5,
                BotErrorKind::ServerError | BotErrorKind::Api => 6,
            },
            Self::Serialization(_) => 7,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_kinds_have_distinct_exit_codes() {
        let code = |kind| {
            CliError::Api {
                kind,
                message: String::new(),
            }
            .exit_code()
        };

        assert_eq!(code(BotErrorKind::Unauthorized), 3);
        assert_eq!(code(BotErrorKind::NotFound), 4);
        assert_eq!(code(BotErrorKind::RateLimited), 5);
        assert_eq!(
            CliError::from(clashgate_core::ConfigError::MissingToken).exit_code(),
            2
        );
    }
}
