use thiserror::Error;

use crate::config::ConfigError;
use crate::data_source::DataError;

/// Local precondition failures detected before any provider round trip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("stock code cannot be empty")]
    EmptyStockCode,
    #[error("invalid stock code '{value}', expected forms like sh.600000 or sz.000001")]
    InvalidStockCode { value: String },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("invalid month '{value}', expected YYYY-MM")]
    InvalidYearMonth { value: String },
    #[error("invalid year '{value}', expected a 4-digit year")]
    InvalidYear { value: String },
    #[error("invalid quarter {value}, expected 1 to 4")]
    InvalidQuarter { value: u32 },

    #[error("field names cannot be empty")]
    EmptyFieldName,
    #[error("invalid field name '{value}'")]
    InvalidFieldName { value: String },
    #[error("field list entry at index {index} is not a string")]
    NonStringField { index: usize },
    #[error("field list must be an array of strings")]
    FieldsNotArray,
    #[error("none of the requested fields {requested:?} exist in the result columns")]
    NoMatchingFields { requested: Vec<String> },

    #[error("invalid frequency '{value}', expected one of d, w, m, 5, 15, 30, 60")]
    InvalidFrequency { value: String },
    #[error("invalid adjust flag '{value}', expected one of 1, 2, 3")]
    InvalidAdjustFlag { value: String },
    #[error("invalid year type '{value}', expected report or operate")]
    InvalidYearType { value: String },
    #[error("invalid reserve ratio year type '{value}', expected 0 or 1")]
    InvalidReserveYearType { value: String },
    #[error("invalid index '{value}', expected one of hs300, sz50, zz500")]
    InvalidIndex { value: String },
    #[error("unknown dataset '{value}'")]
    InvalidDataset { value: String },

    #[error("'{field}' is required")]
    MissingArgument { field: &'static str },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
