use ashare_core::{ConfigError, CoreError, DataError, DataErrorKind, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", .0.message())]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::InvalidArgument(_) => 2,
            Self::Data(error) => data_exit_code(error),
            Self::Core(CoreError::Validation(_)) => 2,
            Self::Core(CoreError::Data(error)) => data_exit_code(error),
            Self::Config(_)
            | Self::Core(_)
            | Self::Serialization(_)
            | Self::Csv(_)
            | Self::Io(_) => 10,
        }
    }
}

const fn data_exit_code(error: &DataError) -> i32 {
    match error.kind() {
        DataErrorKind::InvalidInput => 2,
        DataErrorKind::NoData => 3,
        DataErrorKind::Login => 4,
        DataErrorKind::ProviderError => 5,
    }
}
