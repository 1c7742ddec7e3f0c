//! Trading-calendar reasoning over a data source.
//!
//! The calendar never fails: provider errors and empty windows fall back to
//! the date it was asked about.

use ashare_core::{
    analysis_timeframe_at, AnalysisPeriod, DataConfig, DatasetKind, FixedClock, ProviderCall, ProviderDataSource,
    ScriptedProvider, SimulatedProvider, TradeDate, TradingCalendar,
};

fn quiet() -> DataConfig {
    DataConfig {
        suppress_provider_stdout: false,
        ..DataConfig::default()
    }
}

fn date(value: &str) -> TradeDate {
    TradeDate::parse(value).expect("valid date")
}

fn simulated() -> ProviderDataSource<SimulatedProvider> {
    ProviderDataSource::with_config(SimulatedProvider::new(), &quiet())
}

// =============================================================================
// Latest trading date
// =============================================================================

#[test]
fn latest_is_today_when_today_trades() {
    // Given: today is a Friday with the market open
    let source = simulated();
    let clock = FixedClock(date("2025-01-10"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When: the latest trading date is asked for
    let latest = calendar.latest_trading_date();

    // Then: today is the answer
    assert_eq!(latest, date("2025-01-10"));
}

#[test]
fn latest_skips_back_over_the_weekend() {
    // Given: today is a Sunday
    let source = simulated();
    let clock = FixedClock(date("2025-01-19"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When: the latest trading date is asked for
    // Then: the Friday before is returned
    assert_eq!(calendar.latest_trading_date(), date("2025-01-17"));
}

#[test]
fn latest_probe_ends_on_the_28th_in_a_short_february() {
    // Given: a scripted calendar and today at the end of a non-leap February
    let provider = ScriptedProvider::new().with_table(
        DatasetKind::TradeDates,
        &["calendar_date", "is_trading_day"],
        &[&["2025-02-27", "1"], &["2025-02-28", "1"]],
    );
    let source = ProviderDataSource::with_config(provider.clone(), &quiet());
    let clock = FixedClock(date("2025-02-28"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When: the latest trading date is asked for
    let latest = calendar.latest_trading_date();

    // Then: today is found and the probe covered the first through the 28th
    assert_eq!(latest, date("2025-02-28"));
    let query = provider
        .calls()
        .into_iter()
        .find_map(|call| match call {
            ProviderCall::Query(query) => Some(query),
            _ => None,
        })
        .expect("calendar was queried");
    let params = query.parameters();
    assert_eq!(params["start_date"], "2025-02-01");
    assert_eq!(params["end_date"], "2025-02-28");
}

#[test]
fn latest_ignores_flagged_days_after_today() {
    // Given: a calendar that also flags a future day
    let provider = ScriptedProvider::new().with_table(
        DatasetKind::TradeDates,
        &["calendar_date", "is_trading_day"],
        &[
            &["2025-01-09", "1"],
            &["2025-01-10", "0"],
            &["2025-01-13", "1"],
        ],
    );
    let source = ProviderDataSource::with_config(provider, &quiet());
    let clock = FixedClock(date("2025-01-10"));

    // When: the latest trading date is asked for
    let latest = TradingCalendar::new(&source, &clock).latest_trading_date();

    // Then: the future day is ignored
    assert_eq!(latest, date("2025-01-09"));
}

#[test]
fn latest_falls_back_to_today_early_in_a_closed_month() {
    // Given: the first day of February 2025 is a Saturday
    let source = simulated();
    let clock = FixedClock(date("2025-02-01"));

    // When: the latest trading date is asked for
    let latest = TradingCalendar::new(&source, &clock).latest_trading_date();

    // Then: no earlier trading day exists this month, so today is returned
    assert_eq!(latest, date("2025-02-01"));
}

// =============================================================================
// Neighbouring trading days
// =============================================================================

#[test]
fn previous_and_next_cross_the_spring_festival() {
    // Given: the simulated calendar with the 2025 holiday
    let source = simulated();
    let clock = FixedClock(date("2025-03-01"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When / Then: the neighbours jump the closed week
    assert_eq!(calendar.previous_trading_day(date("2025-02-05")), date("2025-01-27"));
    assert_eq!(calendar.next_trading_day(date("2025-01-27")), date("2025-02-05"));
}

#[test]
fn neighbours_of_a_trading_day_are_strict() {
    // Given: a Wednesday with the market open on both sides
    let source = simulated();
    let clock = FixedClock(date("2025-03-01"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When / Then: the day itself is never returned
    assert_eq!(calendar.previous_trading_day(date("2025-01-08")), date("2025-01-07"));
    assert_eq!(calendar.next_trading_day(date("2025-01-08")), date("2025-01-09"));
}

#[test]
fn previous_without_flags_returns_the_input() {
    // Given: a provider with no calendar data
    let source = ProviderDataSource::with_config(ScriptedProvider::new(), &quiet());
    let clock = FixedClock(date("2025-03-01"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When / Then: both neighbours fall back to the input date
    assert_eq!(calendar.previous_trading_day(date("2025-01-08")), date("2025-01-08"));
    assert_eq!(calendar.next_trading_day(date("2025-01-08")), date("2025-01-08"));
}

// =============================================================================
// Single-day checks and failure fallbacks
// =============================================================================

#[test]
fn is_trading_day_reads_the_flag() {
    // Given: the simulated calendar
    let source = simulated();
    let clock = FixedClock(date("2025-03-01"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When / Then: weekdays trade, weekends and holidays do not
    assert!(calendar.is_trading_day(date("2025-01-06")));
    assert!(!calendar.is_trading_day(date("2025-01-05")));
    assert!(!calendar.is_trading_day(date("2025-01-29")));
}

#[test]
fn is_trading_day_outside_the_data_is_false() {
    // Given: a date far outside the simulated coverage
    let source = simulated();
    let clock = FixedClock(date("2025-03-01"));

    // When: the day is checked
    let trading = TradingCalendar::new(&source, &clock).is_trading_day(date("1990-01-02"));

    // Then: the answer is "not trading" rather than an error
    assert!(!trading);
}

#[test]
fn provider_failure_falls_back_instead_of_failing() {
    // Given: a provider whose calendar query faults
    let provider =
        ScriptedProvider::new().with_query_fault(DatasetKind::TradeDates, "connection refused");
    let source = ProviderDataSource::with_config(provider.clone(), &quiet());
    let clock = FixedClock(date("2025-01-15"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When: every calendar question is asked
    let latest = calendar.latest_trading_date();
    let previous = calendar.previous_trading_day(date("2025-01-15"));
    let trading = calendar.is_trading_day(date("2025-01-15"));

    // Then: each falls back and each session was still closed
    assert_eq!(latest, date("2025-01-15"));
    assert_eq!(previous, date("2025-01-15"));
    assert!(!trading);
    let logouts = provider
        .calls()
        .iter()
        .filter(|call| matches!(call, ProviderCall::Logout))
        .count();
    assert_eq!(logouts, 3);
}

// =============================================================================
// Analysis timeframe
// =============================================================================

#[test]
fn analysis_timeframe_uses_the_clock() {
    // Given: a pinned clock in mid-June
    let source = simulated();
    let clock = FixedClock(date("2025-06-15"));
    let calendar = TradingCalendar::new(&source, &clock);

    // When: the recent and yearly windows are computed
    let recent = calendar.analysis_timeframe(AnalysisPeriod::Recent);
    let year = calendar.analysis_timeframe(AnalysisPeriod::from_keyword("year"));

    // Then: the windows end today
    assert_eq!(recent.to_string(), "2025年5月-6月 (ISO: 2025-05-01 to 2025-06-15)");
    assert_eq!(year.start, date("2024-06-01"));
    assert_eq!(year.end, date("2025-06-15"));
}

#[test]
fn recent_window_wraps_into_the_previous_year() {
    // Given: anchors on either side of the mid-January cutoff
    let early = date("2025-01-10");
    let late = date("2025-01-20");

    // When: the recent window is computed for each
    let early = analysis_timeframe_at(early, AnalysisPeriod::Recent);
    let late = analysis_timeframe_at(late, AnalysisPeriod::Recent);

    // Then: the early window starts in November, the late one in December
    assert_eq!(
        early.to_string(),
        "2024年11月-2025年1月 (ISO: 2024-11-01 to 2025-01-10)"
    );
    assert_eq!(
        late.to_string(),
        "2024年12月-2025年1月 (ISO: 2024-12-01 to 2025-01-20)"
    );
}

#[test]
fn recent_window_on_the_last_day_of_february() {
    // Given: the last day of a non-leap February
    let today = date("2025-02-28");

    // When: the recent window is computed
    let window = analysis_timeframe_at(today, AnalysisPeriod::Recent);

    // Then: it starts on the first of January and ends on the 28th
    assert_eq!(
        window.to_string(),
        "2025年1月-2月 (ISO: 2025-01-01 to 2025-02-28)"
    );
}
