//! Maps raw provider outcomes onto [`DataErrorKind`](crate::DataErrorKind).

use tracing::{error, warn};

use crate::{DataError, ProviderFault, ProviderStatus};

pub use crate::provider::SUCCESS_CODE;

/// Provider status code for "no record found".
pub const NO_RECORD_CODE: &str = "10002";

const NO_RECORD_PATTERN: &str = "no record found";

/// True when `status` means the query matched nothing.
pub fn is_no_record(status: &ProviderStatus) -> bool {
    status.code == NO_RECORD_CODE || status.message.to_lowercase().contains(NO_RECORD_PATTERN)
}

/// Classifies a non-success status as `NoData` or `ProviderError`.
///
/// `operation` and `key` identify the call in log lines and error messages.
pub fn classify_status(status: &ProviderStatus, operation: &str, key: &str) -> DataError {
    if is_no_record(status) {
        warn!(
            operation,
            key,
            code = %status.code,
            message = %status.message,
            "provider returned no records"
        );
        DataError::no_data(format!(
            "no {operation} data found for {key}: {}",
            status.message
        ))
        .with_code(status.code.clone())
        .with_operation(operation)
    } else {
        error!(
            operation,
            key,
            code = %status.code,
            message = %status.message,
            "provider reported an error"
        );
        DataError::provider(format!(
            "provider error while fetching {operation} for {key}: {} (code {})",
            status.message, status.code
        ))
        .with_code(status.code.clone())
        .with_operation(operation)
    }
}

/// `NoData` for a successful status that produced zero rows.
pub fn classify_empty(operation: &str, key: &str) -> DataError {
    warn!(operation, key, "provider returned an empty result set");
    DataError::no_data(format!("no {operation} data found for {key} (empty result set)"))
        .with_operation(operation)
}

/// Re-wraps an unclassified provider failure as `ProviderError`.
pub fn wrap_fault(fault: &ProviderFault, operation: &str, key: &str) -> DataError {
    error!(operation, key, error = %fault, "unexpected provider failure");
    DataError::provider(format!(
        "unexpected failure while fetching {operation} for {key}: {fault}"
    ))
    .with_operation(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataErrorKind;

    #[test]
    fn sentinel_code_is_no_data() {
        let status = ProviderStatus::new(NO_RECORD_CODE, "查询无结果");
        let err = classify_status(&status, "profit", "sh.600000");
        assert_eq!(err.kind(), DataErrorKind::NoData);
        assert_eq!(err.code(), Some("10002"));
        assert_eq!(err.operation(), Some("profit"));
    }

    #[test]
    fn message_pattern_is_case_insensitive() {
        let status = ProviderStatus::new("10004", "No Record Found for query");
        let err = classify_status(&status, "dividend", "sz.000001");
        assert_eq!(err.kind(), DataErrorKind::NoData);
        assert_eq!(err.code(), Some("10004"));
    }

    #[test]
    fn other_codes_are_provider_errors() {
        let status = ProviderStatus::new("10001001", "network timeout");
        let err = classify_status(&status, "k_data", "sh.600000");
        assert_eq!(err.kind(), DataErrorKind::ProviderError);
        assert!(err.message().contains("network timeout"));
        assert!(err.message().contains("10001001"));
    }

    #[test]
    fn empty_and_fault_classification() {
        assert_eq!(
            classify_empty("hs300", "-").kind(),
            DataErrorKind::NoData
        );
        let err = wrap_fault(&ProviderFault::new("socket closed"), "trade_dates", "-");
        assert_eq!(err.kind(), DataErrorKind::ProviderError);
        assert!(err.code().is_none());
    }
}
