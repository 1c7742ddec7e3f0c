//! The single retrieval pipeline every dataset goes through.
//!
//! open session -> query -> classify non-success status -> drain rows ->
//! `NoData` on empty -> assemble a [`TabularResult`] in provider column order.

use std::collections::BTreeMap;

use tracing::{error, info, warn};

use crate::classify::{classify_empty, classify_status, wrap_fault};
use crate::{
    validate_year, DataError, DatasetKind, IndexKind, ProviderClient, QueryDescriptor,
    ReportPeriod, SessionGuard, StockCode, TabularResult, TradeDate, ValidationError, YearMonth,
};

/// Runs one descriptor through the shared pipeline.
///
/// Only [`ProviderFault`](crate::ProviderFault)s are classified. A panic inside
/// the provider is a bug: it propagates to the caller unclassified, and the
/// session still logs out while unwinding.
pub fn fetch_table<P: ProviderClient>(
    guard: &SessionGuard<P>,
    query: &QueryDescriptor,
) -> Result<TabularResult, DataError> {
    let operation = query.dataset().as_str();
    let label = query.dataset().label();
    let key = query.key().to_string();
    info!(operation, label, key = %key, params = ?query.parameters(), "fetching dataset");

    let table = guard.with_session(|session| {
        let mut cursor = session
            .query(query)
            .map_err(|fault| wrap_fault(&fault, operation, &key))?;

        if !cursor.status().is_success() {
            return Err(classify_status(cursor.status(), operation, &key));
        }

        let columns = cursor.fields().to_vec();
        let mut rows = Vec::new();
        while let Some(row) = cursor
            .next_row()
            .map_err(|fault| wrap_fault(&fault, operation, &key))?
        {
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(classify_empty(operation, &key));
        }

        TabularResult::from_provider(columns, rows).map_err(|err| {
            error!(operation, key = %key, error = %err, "provider returned a malformed table");
            DataError::provider(format!("malformed {operation} result for {key}: {err}"))
                .with_operation(operation)
        })
    })?;

    info!(operation, key = %key, rows = table.len(), "fetched dataset");
    Ok(table)
}

/// Quarterly ratio report for one stock.
///
/// The year must be four digits and the quarter 1 to 4; otherwise the call
/// fails with `InvalidInput` before the provider is contacted.
pub fn fetch_periodic_report<P: ProviderClient>(
    guard: &SessionGuard<P>,
    kind: DatasetKind,
    code: &str,
    year: &str,
    quarter: u32,
) -> Result<TabularResult, DataError> {
    let operation = kind.as_str();
    if !kind.is_periodic_report() {
        return Err(
            DataError::invalid_input(format!("'{operation}' is not a periodic report"))
                .with_operation(operation),
        );
    }

    let code = StockCode::parse(code).map_err(|err| rejected(operation, err))?;
    let period = ReportPeriod::new(year, quarter).map_err(|err| rejected(operation, err))?;

    let query = QueryDescriptor::builder(kind)
        .stock(code)
        .quarter(period)
        .build();
    fetch_table(guard, &query)
}

/// Constituents of an index; `None` asks for the provider's latest list.
pub fn fetch_constituents<P: ProviderClient>(
    guard: &SessionGuard<P>,
    index: IndexKind,
    date: Option<&str>,
) -> Result<TabularResult, DataError> {
    let kind = DatasetKind::constituents_of(index);
    let date = parse_optional(date, TradeDate::parse).map_err(|err| rejected(kind.as_str(), err))?;

    let query = QueryDescriptor::builder(kind).index(index).day(date).build();
    fetch_table(guard, &query)
}

/// Date-bounded series. `extra` is passed to the provider verbatim.
///
/// Bounds are `YYYY-MM` for monthly money supply, `YYYY` for yearly money
/// supply and `YYYY-MM-DD` for everything else.
pub fn fetch_series<P: ProviderClient>(
    guard: &SessionGuard<P>,
    kind: DatasetKind,
    start: Option<&str>,
    end: Option<&str>,
    extra: BTreeMap<String, String>,
) -> Result<TabularResult, DataError> {
    let operation = kind.as_str();
    let builder = QueryDescriptor::builder(kind);

    let builder = match kind {
        DatasetKind::MoneySupplyMonth => builder.month_range(
            parse_optional(start, YearMonth::parse).map_err(|err| rejected(operation, err))?,
            parse_optional(end, YearMonth::parse).map_err(|err| rejected(operation, err))?,
        ),
        DatasetKind::MoneySupplyYear => builder.year_range(
            parse_optional(start, validate_year).map_err(|err| rejected(operation, err))?,
            parse_optional(end, validate_year).map_err(|err| rejected(operation, err))?,
        ),
        _ => builder.range(
            parse_optional(start, TradeDate::parse).map_err(|err| rejected(operation, err))?,
            parse_optional(end, TradeDate::parse).map_err(|err| rejected(operation, err))?,
        ),
    };

    fetch_table(guard, &builder.params(extra).build())
}

/// Converts a local precondition failure into `InvalidInput`.
pub(crate) fn rejected(operation: &str, err: ValidationError) -> DataError {
    warn!(operation, error = %err, "rejected invalid input");
    DataError::from(err).with_operation(operation)
}

/// Blank strings count as absent.
pub(crate) fn parse_optional<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse(value).map(Some),
    }
}
