use serde::Serialize;
use serde_json::Value;

use crate::ValidationError;

/// Columns requested for k-line data when the caller names none.
pub const DEFAULT_K_FIELDS: [&str; 18] = [
    "date",
    "code",
    "open",
    "high",
    "low",
    "close",
    "preclose",
    "volume",
    "amount",
    "adjustflag",
    "turn",
    "tradestatus",
    "pctChg",
    "peTTM",
    "pbMRQ",
    "psTTM",
    "pcfNcfTTM",
    "isST",
];

/// Validated, ordered list of provider column names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldList(Vec<String>);

impl FieldList {
    pub fn new<I, S>(names: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        for name in names {
            let name = validate_name(name.as_ref())?;
            if !fields.contains(&name) {
                fields.push(name);
            }
        }
        if fields.is_empty() {
            return Err(ValidationError::EmptyFieldName);
        }
        Ok(Self(fields))
    }

    /// Parses a JSON array; every entry must be a string.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let Value::Array(items) = value else {
            return Err(ValidationError::FieldsNotArray);
        };

        let mut names = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::String(name) => names.push(name.as_str()),
                _ => return Err(ValidationError::NonStringField { index }),
            }
        }
        Self::new(names)
    }

    /// Parses a comma-separated list such as `date,code,close`.
    pub fn from_csv(input: &str) -> Result<Self, ValidationError> {
        Self::new(input.split(','))
    }

    pub fn k_defaults() -> Self {
        Self(DEFAULT_K_FIELDS.iter().map(|name| (*name).to_owned()).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Provider wire form: names joined by commas.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyFieldName);
    }
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(ValidationError::InvalidFieldName {
            value: trimmed.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}
