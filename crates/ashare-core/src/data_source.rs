use std::fmt::{Display, Formatter};

use crate::{AdjustFlag, Frequency, ReserveYearType, TabularResult, ValidationError, YearType};

/// Closed taxonomy of failures that cross the facade boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataErrorKind {
    /// Provider session could not be established.
    Login,
    /// Well-formed query that matched nothing.
    NoData,
    /// Provider reported a failure other than "no data", or failed unexpectedly.
    ProviderError,
    /// Caller argument failed a local precondition.
    InvalidInput,
}

/// Classified error carrying the provider's raw code when one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataError {
    kind: DataErrorKind,
    message: String,
    code: Option<String>,
    operation: Option<String>,
}

impl DataError {
    fn with_kind(kind: DataErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            operation: None,
        }
    }

    pub fn login(message: impl Into<String>) -> Self {
        Self::with_kind(DataErrorKind::Login, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::with_kind(DataErrorKind::NoData, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::with_kind(DataErrorKind::ProviderError, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::with_kind(DataErrorKind::InvalidInput, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub const fn kind(&self) -> DataErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw provider status code, when the provider supplied one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub const fn is_no_data(&self) -> bool {
        matches!(self.kind, DataErrorKind::NoData)
    }

    /// Stable dotted identifier for machine-readable output.
    pub const fn code_str(&self) -> &'static str {
        match self.kind {
            DataErrorKind::Login => "data.login",
            DataErrorKind::NoData => "data.no_data",
            DataErrorKind::ProviderError => "data.provider_error",
            DataErrorKind::InvalidInput => "data.invalid_input",
        }
    }
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for DataError {}

impl From<ValidationError> for DataError {
    fn from(value: ValidationError) -> Self {
        Self::invalid_input(value.to_string())
    }
}

/// Options for historical k-line requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KDataOptions {
    pub frequency: Frequency,
    pub adjust_flag: AdjustFlag,
    /// Requested columns; `None` or empty selects the default k-line fields.
    pub fields: Option<Vec<String>>,
}

/// One method per dataset. Arguments are validated before any provider call.
///
/// Dates are `YYYY-MM-DD`, years are 4-digit strings and quarters are 1 to 4.
pub trait DataSource: Send + Sync {
    fn historical_k_data(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
        options: &KDataOptions,
    ) -> Result<TabularResult, DataError>;

    /// Fetches every column, then keeps the requested ones that exist.
    fn stock_basic_info(
        &self,
        code: &str,
        fields: Option<&[String]>,
    ) -> Result<TabularResult, DataError>;

    fn dividend_data(
        &self,
        code: &str,
        year: &str,
        year_type: YearType,
    ) -> Result<TabularResult, DataError>;

    fn adjust_factor_data(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<TabularResult, DataError>;

    fn profit_data(&self, code: &str, year: &str, quarter: u32)
        -> Result<TabularResult, DataError>;

    fn operation_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<TabularResult, DataError>;

    fn growth_data(&self, code: &str, year: &str, quarter: u32)
        -> Result<TabularResult, DataError>;

    fn balance_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<TabularResult, DataError>;

    fn cash_flow_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<TabularResult, DataError>;

    fn dupont_data(&self, code: &str, year: &str, quarter: u32)
        -> Result<TabularResult, DataError>;

    fn performance_express_report(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<TabularResult, DataError>;

    fn forecast_report(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<TabularResult, DataError>;

    fn stock_industry(
        &self,
        code: Option<&str>,
        date: Option<&str>,
    ) -> Result<TabularResult, DataError>;

    fn sz50_stocks(&self, date: Option<&str>) -> Result<TabularResult, DataError>;

    fn hs300_stocks(&self, date: Option<&str>) -> Result<TabularResult, DataError>;

    fn zz500_stocks(&self, date: Option<&str>) -> Result<TabularResult, DataError>;

    fn trade_dates(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError>;

    fn all_stock(&self, date: Option<&str>) -> Result<TabularResult, DataError>;

    fn deposit_rate_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError>;

    fn loan_rate_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError>;

    fn required_reserve_ratio_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        year_type: ReserveYearType,
    ) -> Result<TabularResult, DataError>;

    fn money_supply_data_month(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError>;

    fn money_supply_data_year(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_message_with_dotted_id() {
        let err = DataError::provider("upstream rejected request")
            .with_code("10001")
            .with_operation("profit");
        assert_eq!(err.to_string(), "upstream rejected request (data.provider_error)");
        assert_eq!(err.code(), Some("10001"));
        assert_eq!(err.operation(), Some("profit"));
    }

    #[test]
    fn validation_errors_become_invalid_input() {
        let err = DataError::from(ValidationError::InvalidQuarter { value: 7 });
        assert_eq!(err.kind(), DataErrorKind::InvalidInput);
        assert_eq!(err.code_str(), "data.invalid_input");
        assert!(err.code().is_none());
    }

    #[test]
    fn k_data_options_default_to_daily_unadjusted() {
        let options = KDataOptions::default();
        assert_eq!(options.frequency, Frequency::Daily);
        assert_eq!(options.adjust_flag, AdjustFlag::Unadjusted);
        assert!(options.fields.is_none());
    }
}
