use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{DatasetKind, IndexKind, ReportPeriod, StockCode, TradeDate, YearMonth};

/// What a query is keyed on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum QueryKey {
    #[default]
    None,
    Stock(StockCode),
    Index(IndexKind),
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("-"),
            Self::Stock(code) => Display::fmt(code, f),
            Self::Index(index) => Display::fmt(index, f),
        }
    }
}

/// Time window a query covers. `None` bounds mean "provider default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TemporalScope {
    #[default]
    None,
    Day {
        date: Option<TradeDate>,
    },
    Range {
        start: Option<TradeDate>,
        end: Option<TradeDate>,
    },
    MonthRange {
        start: Option<YearMonth>,
        end: Option<YearMonth>,
    },
    YearRange {
        start: Option<String>,
        end: Option<String>,
    },
    Quarter {
        period: ReportPeriod,
    },
    Year {
        year: String,
    },
}

/// Immutable description of one provider round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    dataset: DatasetKind,
    key: QueryKey,
    scope: TemporalScope,
    extra: BTreeMap<String, String>,
}

impl QueryDescriptor {
    pub fn builder(dataset: DatasetKind) -> QueryDescriptorBuilder {
        QueryDescriptorBuilder {
            dataset,
            key: QueryKey::None,
            scope: TemporalScope::None,
            extra: BTreeMap::new(),
        }
    }

    pub const fn dataset(&self) -> DatasetKind {
        self.dataset
    }

    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    pub const fn scope(&self) -> &TemporalScope {
        &self.scope
    }

    pub const fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.extra.get(name).map(String::as_str)
    }

    pub fn stock_code(&self) -> Option<&StockCode> {
        match &self.key {
            QueryKey::Stock(code) => Some(code),
            _ => None,
        }
    }

    /// Flattened `name -> value` view used in logs and call records.
    pub fn parameters(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        match &self.key {
            QueryKey::None => {}
            QueryKey::Stock(code) => {
                params.insert("code".to_owned(), code.to_string());
            }
            QueryKey::Index(index) => {
                params.insert("index".to_owned(), index.to_string());
            }
        }
        match &self.scope {
            TemporalScope::None => {}
            TemporalScope::Day { date } => {
                if let Some(date) = date {
                    params.insert("date".to_owned(), date.to_string());
                }
            }
            TemporalScope::Range { start, end } => {
                insert_bounds(&mut params, start.as_ref(), end.as_ref());
            }
            TemporalScope::MonthRange { start, end } => {
                insert_bounds(&mut params, start.as_ref(), end.as_ref());
            }
            TemporalScope::YearRange { start, end } => {
                insert_bounds(&mut params, start.as_ref(), end.as_ref());
            }
            TemporalScope::Quarter { period } => {
                params.insert("year".to_owned(), period.year().to_owned());
                params.insert("quarter".to_owned(), period.quarter().to_string());
            }
            TemporalScope::Year { year } => {
                params.insert("year".to_owned(), year.clone());
            }
        }
        for (name, value) in &self.extra {
            params.insert(name.clone(), value.clone());
        }
        params
    }
}

fn insert_bounds<T: Display>(
    params: &mut BTreeMap<String, String>,
    start: Option<&T>,
    end: Option<&T>,
) {
    if let Some(start) = start {
        params.insert("start_date".to_owned(), start.to_string());
    }
    if let Some(end) = end {
        params.insert("end_date".to_owned(), end.to_string());
    }
}

/// Consuming builder; the descriptor cannot change once built.
#[derive(Debug, Clone)]
pub struct QueryDescriptorBuilder {
    dataset: DatasetKind,
    key: QueryKey,
    scope: TemporalScope,
    extra: BTreeMap<String, String>,
}

impl QueryDescriptorBuilder {
    pub fn stock(mut self, code: StockCode) -> Self {
        self.key = QueryKey::Stock(code);
        self
    }

    pub fn maybe_stock(mut self, code: Option<StockCode>) -> Self {
        self.key = code.map_or(QueryKey::None, QueryKey::Stock);
        self
    }

    pub fn index(mut self, index: IndexKind) -> Self {
        self.key = QueryKey::Index(index);
        self
    }

    pub fn day(mut self, date: Option<TradeDate>) -> Self {
        self.scope = TemporalScope::Day { date };
        self
    }

    pub fn range(mut self, start: Option<TradeDate>, end: Option<TradeDate>) -> Self {
        self.scope = TemporalScope::Range { start, end };
        self
    }

    pub fn month_range(mut self, start: Option<YearMonth>, end: Option<YearMonth>) -> Self {
        self.scope = TemporalScope::MonthRange { start, end };
        self
    }

    pub fn year_range(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.scope = TemporalScope::YearRange { start, end };
        self
    }

    pub fn quarter(mut self, period: ReportPeriod) -> Self {
        self.scope = TemporalScope::Quarter { period };
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.scope = TemporalScope::Year { year: year.into() };
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn params(mut self, extra: BTreeMap<String, String>) -> Self {
        self.extra.extend(extra);
        self
    }

    pub fn build(self) -> QueryDescriptor {
        QueryDescriptor {
            dataset: self.dataset,
            key: self.key,
            scope: self.scope,
            extra: self.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_parameters_for_logging() {
        let code = StockCode::parse("sh.600000").expect("valid code");
        let period = ReportPeriod::new("2024", 2).expect("valid period");
        let query = QueryDescriptor::builder(DatasetKind::Profit)
            .stock(code)
            .quarter(period)
            .build();

        let params = query.parameters();
        assert_eq!(params.get("code").map(String::as_str), Some("sh.600000"));
        assert_eq!(params.get("year").map(String::as_str), Some("2024"));
        assert_eq!(params.get("quarter").map(String::as_str), Some("2"));
        assert_eq!(query.key().to_string(), "sh.600000");
    }

    #[test]
    fn open_range_omits_missing_bounds() {
        let end = TradeDate::parse("2025-01-31").expect("valid date");
        let query = QueryDescriptor::builder(DatasetKind::DepositRate)
            .range(None, Some(end))
            .param("yearType", "0")
            .build();

        let params = query.parameters();
        assert!(!params.contains_key("start_date"));
        assert_eq!(params.get("end_date").map(String::as_str), Some("2025-01-31"));
        assert_eq!(query.param("yearType"), Some("0"));
        assert_eq!(query.key().to_string(), "-");
    }

    #[test]
    fn identical_builds_compare_equal() {
        let build = || {
            QueryDescriptor::builder(DatasetKind::Hs300)
                .index(IndexKind::Hs300)
                .day(None)
                .build()
        };
        assert_eq!(build(), build());
    }
}
