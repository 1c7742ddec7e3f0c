//! Trading-calendar reasoning over the [`DataSource`] facade.
//!
//! Every lookup degrades instead of failing: a facade error falls back to
//! today's date, the unmodified anchor date, or "not a trading day".

use std::fmt::{Display, Formatter};

use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use tracing::{error, info, warn};

use crate::{DataConfig, DataError, DataSource, TabularResult, TradeDate};

/// Last day of the current month probed for the latest trading day.
pub const LATEST_PROBE_LAST_DAY: u8 = 28;
/// Days searched before or after an anchor date.
pub const NEIGHBOR_WINDOW_DAYS: i64 = 30;
/// From this day of month on, "recent" anchors on the previous month only.
pub const RECENT_CUTOFF_DAY: u8 = 15;

const FLAG_COLUMN: &str = "is_trading_day";
const DAY_COLUMN: &str = "calendar_date";
const TRADING_FLAG: &str = "1";

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> TradeDate;
}

/// Wall clock shifted to a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset_hours: i8) -> Self {
        Self {
            offset: UtcOffset::from_hms(offset_hours, 0, 0).unwrap_or(UtcOffset::UTC),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(config.calendar_utc_offset_hours)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> TradeDate {
        TradeDate::from_date(OffsetDateTime::now_utc().to_offset(self.offset).date())
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub TradeDate);

impl Clock for FixedClock {
    fn today(&self) -> TradeDate {
        self.0
    }
}

/// Window keyword for [`TradingCalendar::analysis_timeframe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPeriod {
    #[default]
    Recent,
    Quarter,
    HalfYear,
    Year,
    /// Fallback for unrecognized keywords.
    PreviousMonth,
}

impl AnalysisPeriod {
    /// Never fails: unknown keywords select the previous month.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "" | "recent" => Self::Recent,
            "quarter" => Self::Quarter,
            "half_year" => Self::HalfYear,
            "year" => Self::Year,
            other => {
                warn!(period = other, "unknown analysis period, using previous month");
                Self::PreviousMonth
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Quarter => "quarter",
            Self::HalfYear => "half_year",
            Self::Year => "year",
            Self::PreviousMonth => "previous_month",
        }
    }
}

/// Human label plus ISO bounds, e.g. `2025年1月-3月 (ISO: 2025-01-01 to 2025-03-14)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisTimeframe {
    pub label: String,
    pub start: TradeDate,
    pub end: TradeDate,
}

impl Display for AnalysisTimeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (ISO: {} to {})", self.label, self.start, self.end)
    }
}

/// Computes the analysis window for `today`. Pure date arithmetic.
pub fn analysis_timeframe_at(today: TradeDate, period: AnalysisPeriod) -> AnalysisTimeframe {
    let (year, month, day) = (today.year(), today.month(), today.day());

    let previous_month = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };

    let (start, middle) = match period {
        AnalysisPeriod::Recent if day < RECENT_CUTOFF_DAY => match month {
            1 => ((year - 1, 11), (year - 1, 12)),
            2 => ((year, 1), (year, 1)),
            _ => ((year, month - 2), (year, month - 1)),
        },
        AnalysisPeriod::Recent | AnalysisPeriod::PreviousMonth => {
            (previous_month, previous_month)
        }
        AnalysisPeriod::Quarter => {
            let start = if month <= 3 {
                (year - 1, month + 9)
            } else {
                (year, month - 3)
            };
            (start, start)
        }
        AnalysisPeriod::HalfYear => {
            let start = if month <= 6 {
                (year - 1, month + 6)
            } else {
                (year, month - 6)
            };
            (start, add_months(start, 3))
        }
        AnalysisPeriod::Year => {
            let start = (year - 1, month);
            (start, add_months(start, 6))
        }
    };

    let ((start_year, start_month), (_, middle_month)) = (start, middle);
    let end_day = days_in_month(year, month).min(day);

    let label = if start_year != year {
        format!("{start_year}年{start_month}月-{year}年{month}月")
    } else if middle_month != start_month && middle_month != month {
        format!("{start_year}年{start_month}月-{middle_month}月-{month}月")
    } else if start_month != month {
        format!("{start_year}年{start_month}月-{month}月")
    } else {
        format!("{start_year}年{start_month}月")
    };

    AnalysisTimeframe {
        label,
        start: TradeDate::from_ymd(start_year, start_month, 1)
            .unwrap_or_else(|_| today.first_of_month()),
        end: TradeDate::from_ymd(year, month, end_day).unwrap_or(today),
    }
}

fn add_months((year, month): (i32, u8), months: u8) -> (i32, u8) {
    let zero_based = u32::from(month - 1) + u32::from(months);
    (year + (zero_based / 12) as i32, (zero_based % 12) as u8 + 1)
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if time::util::is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Answers trading-day questions using provider calendar flags.
pub struct TradingCalendar<'a> {
    source: &'a dyn DataSource,
    clock: &'a dyn Clock,
}

impl<'a> TradingCalendar<'a> {
    pub fn new(source: &'a dyn DataSource, clock: &'a dyn Clock) -> Self {
        Self { source, clock }
    }

    pub fn today(&self) -> TradeDate {
        self.clock.today()
    }

    /// Latest trading day on or before today within the current month; today if none.
    pub fn latest_trading_date(&self) -> TradeDate {
        let today = self.today();
        let start = today.first_of_month();
        let end = TradeDate::from_ymd(today.year(), today.month(), LATEST_PROBE_LAST_DAY)
            .unwrap_or(today);

        let latest = self
            .flags(start, end, "latest_trading_date")
            .and_then(|table| {
                flagged_dates(&table)
                    .into_iter()
                    .filter(|date| *date <= today)
                    .max()
            });

        match latest {
            Some(date) => {
                info!(date = %date, "found latest trading day");
                date
            }
            None => {
                warn!(today = %today, "no trading day found this month, using today");
                today
            }
        }
    }

    /// Closest trading day strictly before `date` within 30 days; `date` if none.
    pub fn previous_trading_day(&self, date: TradeDate) -> TradeDate {
        let Some(start) = date.shifted(-NEIGHBOR_WINDOW_DAYS) else {
            return date;
        };

        self.flags(start, date, "previous_trading_day")
            .and_then(|table| {
                flagged_dates(&table)
                    .into_iter()
                    .filter(|day| *day < date)
                    .max()
            })
            .unwrap_or(date)
    }

    /// Closest trading day strictly after `date` within 30 days; `date` if none.
    pub fn next_trading_day(&self, date: TradeDate) -> TradeDate {
        let Some(end) = date.shifted(NEIGHBOR_WINDOW_DAYS) else {
            return date;
        };

        self.flags(date, end, "next_trading_day")
            .and_then(|table| {
                flagged_dates(&table)
                    .into_iter()
                    .filter(|day| *day > date)
                    .min()
            })
            .unwrap_or(date)
    }

    /// `false` when the provider has no calendar row for `date`.
    pub fn is_trading_day(&self, date: TradeDate) -> bool {
        let Some(table) = self.flags(date, date, "is_trading_day") else {
            return false;
        };
        let Some(flag) = flag_column(&table) else {
            return false;
        };
        table
            .rows()
            .first()
            .is_some_and(|row| row[flag].matches(TRADING_FLAG))
    }

    pub fn analysis_timeframe(&self, period: AnalysisPeriod) -> AnalysisTimeframe {
        let timeframe = analysis_timeframe_at(self.today(), period);
        info!(period = period.as_str(), timeframe = %timeframe, "computed analysis timeframe");
        timeframe
    }

    fn flags(&self, start: TradeDate, end: TradeDate, operation: &str) -> Option<TabularResult> {
        let start_text = start.to_string();
        let end_text = end.to_string();
        match self
            .source
            .trade_dates(Some(start_text.as_str()), Some(end_text.as_str()))
        {
            Ok(table) if !table.is_empty() => Some(table),
            Ok(_) => None,
            Err(err) => {
                log_fallback(operation, &start_text, &end_text, &err);
                None
            }
        }
    }
}

fn log_fallback(operation: &str, start: &str, end: &str, err: &DataError) {
    if err.is_no_data() {
        warn!(operation, start, end, error = %err, "no calendar data, falling back");
    } else {
        error!(operation, start, end, error = %err, "calendar lookup failed, falling back");
    }
}

fn flag_column(table: &TabularResult) -> Option<usize> {
    table
        .column_index(FLAG_COLUMN)
        .or_else(|| table.columns().len().checked_sub(1))
}

fn flagged_dates(table: &TabularResult) -> Vec<TradeDate> {
    let Some(flag) = flag_column(table) else {
        return Vec::new();
    };
    let day = table.column_index(DAY_COLUMN).unwrap_or(0);

    table
        .rows()
        .iter()
        .filter(|row| row[flag].matches(TRADING_FLAG))
        .filter_map(|row| TradeDate::parse(&row[day].to_string()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> TradeDate {
        TradeDate::parse(value).expect("valid date")
    }

    fn rendered(today: &str, period: AnalysisPeriod) -> String {
        analysis_timeframe_at(date(today), period).to_string()
    }

    #[test]
    fn recent_before_cutoff_spans_two_prior_months() {
        assert_eq!(
            rendered("2025-03-10", AnalysisPeriod::Recent),
            "2025年1月-2月-3月 (ISO: 2025-01-01 to 2025-03-10)"
        );
    }

    #[test]
    fn recent_in_february_before_cutoff() {
        assert_eq!(
            rendered("2025-02-05", AnalysisPeriod::Recent),
            "2025年1月-2月 (ISO: 2025-01-01 to 2025-02-05)"
        );
    }

    #[test]
    fn recent_on_cutoff_day_uses_previous_month() {
        assert_eq!(
            rendered("2025-06-15", AnalysisPeriod::Recent),
            "2025年5月-6月 (ISO: 2025-05-01 to 2025-06-15)"
        );
    }

    #[test]
    fn quarter_wraps_into_previous_year() {
        assert_eq!(
            rendered("2025-02-20", AnalysisPeriod::Quarter),
            "2024年11月-2025年2月 (ISO: 2024-11-01 to 2025-02-20)"
        );
        assert_eq!(
            rendered("2025-08-20", AnalysisPeriod::Quarter),
            "2025年5月-8月 (ISO: 2025-05-01 to 2025-08-20)"
        );
    }

    #[test]
    fn half_year_middle_month_is_three_after_start() {
        assert_eq!(
            rendered("2025-09-03", AnalysisPeriod::HalfYear),
            "2025年3月-6月-9月 (ISO: 2025-03-01 to 2025-09-03)"
        );
        assert_eq!(
            rendered("2025-05-03", AnalysisPeriod::HalfYear),
            "2024年11月-2025年5月 (ISO: 2024-11-01 to 2025-05-03)"
        );
    }

    #[test]
    fn year_starts_same_month_last_year() {
        assert_eq!(
            rendered("2025-07-31", AnalysisPeriod::Year),
            "2024年7月-2025年7月 (ISO: 2024-07-01 to 2025-07-31)"
        );
    }

    #[test]
    fn previous_month_covers_january_wrap() {
        assert_eq!(
            rendered("2026-01-20", AnalysisPeriod::PreviousMonth),
            "2025年12月-2026年1月 (ISO: 2025-12-01 to 2026-01-20)"
        );
    }

    #[test]
    fn keywords_parse_with_fallback() {
        assert_eq!(AnalysisPeriod::from_keyword("HALF_YEAR"), AnalysisPeriod::HalfYear);
        assert_eq!(AnalysisPeriod::from_keyword(""), AnalysisPeriod::Recent);
        assert_eq!(AnalysisPeriod::from_keyword("decade"), AnalysisPeriod::PreviousMonth);
    }

    #[test]
    fn month_arithmetic_wraps_years() {
        assert_eq!(add_months((2024, 11), 3), (2025, 2));
        assert_eq!(add_months((2024, 7), 6), (2025, 1));
        assert_eq!(add_months((2024, 3), 6), (2024, 9));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
    }

    #[test]
    fn flag_and_day_columns_fall_back_to_edges() {
        let table = TabularResult::from_provider(
            vec!["day".into(), "flag".into()],
            vec![
                vec!["2025-01-02".into(), "1".into()],
                vec!["2025-01-04".into(), "0".into()],
            ],
        )
        .expect("valid table");
        assert_eq!(flagged_dates(&table), vec![date("2025-01-02")]);
    }
}
