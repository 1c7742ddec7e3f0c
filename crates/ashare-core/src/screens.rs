//! Market screens composed from [`DataSource`] results.
//!
//! Screens never talk to a provider directly. A screen that matches nothing
//! returns an empty table rather than `NoData`.

use std::str::FromStr;

use tracing::{debug, error};

use crate::fetch::rejected;
use crate::{DataError, DataSource, IndexKind, TabularResult, ValidationError};

const CODE_COLUMN: &str = "code";
const TRADE_STATUS_COLUMN: &str = "tradeStatus";
const INDUSTRY_COLUMN: &str = "industry";
const SUSPENDED: &str = "0";

/// Constituents of the index named by `index` (`hs300`, `sz50` or `zz500`).
pub fn index_constituents(
    source: &dyn DataSource,
    index: &str,
    date: Option<&str>,
) -> Result<TabularResult, DataError> {
    let index = IndexKind::from_str(index).map_err(|err| rejected("index_constituents", err))?;
    match index {
        IndexKind::Sz50 => source.sz50_stocks(date),
        IndexKind::Hs300 => source.hs300_stocks(date),
        IndexKind::Zz500 => source.zz500_stocks(date),
    }
}

/// Roster rows whose code contains `keyword`, ignoring case.
pub fn search_stocks(
    source: &dyn DataSource,
    keyword: &str,
    date: Option<&str>,
) -> Result<TabularResult, DataError> {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return Err(rejected(
            "search_stocks",
            ValidationError::MissingArgument { field: "keyword" },
        ));
    }

    let roster = source.all_stock(date)?;
    let code = required_column(&roster, CODE_COLUMN, "search_stocks")?;
    let matches = roster.filter_rows(|row| row[code].to_string().to_lowercase().contains(&needle));
    debug!(keyword = %needle, matches = matches.len(), "searched stock roster");
    Ok(matches)
}

/// Roster rows whose trade status marks them suspended.
pub fn suspensions(source: &dyn DataSource, date: Option<&str>) -> Result<TabularResult, DataError> {
    let roster = source.all_stock(date)?;
    let status = required_column(&roster, TRADE_STATUS_COLUMN, "suspensions")?;
    Ok(roster.filter_rows(|row| row[status].matches(SUSPENDED)))
}

/// Distinct industry names, sorted, as a single `industry` column.
pub fn list_industries(
    source: &dyn DataSource,
    date: Option<&str>,
) -> Result<TabularResult, DataError> {
    let table = source.stock_industry(None, date)?;
    let column = industry_column(&table)?;
    let name = table.columns()[column].clone();
    table
        .distinct(&name)
        .map(|industries| industries.rename_column(&name, INDUSTRY_COLUMN))
        .ok_or_else(|| malformed("list_industries", &name))
}

/// Rows of the industry classification whose industry equals `industry`.
pub fn industry_members(
    source: &dyn DataSource,
    industry: &str,
    date: Option<&str>,
) -> Result<TabularResult, DataError> {
    let industry = industry.trim();
    if industry.is_empty() {
        return Err(rejected(
            "industry_members",
            ValidationError::MissingArgument { field: "industry" },
        ));
    }

    let table = source.stock_industry(None, date)?;
    let column = industry_column(&table)?;
    Ok(table.filter_rows(|row| row[column].matches(industry)))
}

fn required_column(
    table: &TabularResult,
    name: &str,
    operation: &str,
) -> Result<usize, DataError> {
    table
        .column_index(name)
        .ok_or_else(|| malformed(operation, name))
}

/// `industry`, else the last column.
fn industry_column(table: &TabularResult) -> Result<usize, DataError> {
    table
        .column_index(INDUSTRY_COLUMN)
        .or_else(|| table.columns().len().checked_sub(1))
        .ok_or_else(|| malformed("stock_industry", INDUSTRY_COLUMN))
}

fn malformed(operation: &str, column: &str) -> DataError {
    error!(operation, column, "provider result is missing a required column");
    DataError::provider(format!("{operation} result has no '{column}' column"))
        .with_operation(operation)
}
