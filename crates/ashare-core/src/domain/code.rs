use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const EXCHANGES: [&str; 3] = ["sh", "sz", "bj"];
const CODE_DIGITS: usize = 6;

/// Canonical A-share security code, e.g. `sh.600000`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StockCode(String);

impl StockCode {
    /// Parses the canonical `exchange.digits` form only.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyStockCode);
        }

        let lowered = trimmed.to_ascii_lowercase();
        let Some((exchange, digits)) = lowered.split_once('.') else {
            return Err(invalid(input));
        };
        if !EXCHANGES.contains(&exchange) || !is_code_digits(digits) {
            return Err(invalid(input));
        }

        Ok(Self(lowered))
    }

    /// Accepts the canonical form plus `600000`, `600000.SH`, `SH600000` and `sh600000`.
    ///
    /// Bare six-digit codes starting with `6` resolve to Shanghai, all others to Shenzhen.
    pub fn normalize(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyStockCode);
        }
        if let Ok(code) = Self::parse(trimmed) {
            return Ok(code);
        }

        let lowered = trimmed.to_ascii_lowercase();

        if is_code_digits(&lowered) {
            let exchange = if lowered.starts_with('6') { "sh" } else { "sz" };
            return Ok(Self(format!("{exchange}.{lowered}")));
        }

        if let Some((digits, exchange)) = lowered.split_once('.') {
            if EXCHANGES.contains(&exchange) && is_code_digits(digits) {
                return Ok(Self(format!("{exchange}.{digits}")));
            }
            return Err(invalid(input));
        }

        if lowered.len() == CODE_DIGITS + 2 && lowered.is_char_boundary(2) {
            let (exchange, digits) = lowered.split_at(2);
            if EXCHANGES.contains(&exchange) && is_code_digits(digits) {
                return Ok(Self(format!("{exchange}.{digits}")));
            }
        }

        Err(invalid(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn exchange(&self) -> &str {
        self.0.split_once('.').map_or("", |(exchange, _)| exchange)
    }

    pub fn digits(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, digits)| digits)
    }
}

fn is_code_digits(value: &str) -> bool {
    value.len() == CODE_DIGITS && value.chars().all(|ch| ch.is_ascii_digit())
}

fn invalid(input: &str) -> ValidationError {
    ValidationError::InvalidStockCode {
        value: input.trim().to_owned(),
    }
}

impl Display for StockCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for StockCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for StockCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<StockCode> for String {
    fn from(value: StockCode) -> Self {
        value.0
    }
}
