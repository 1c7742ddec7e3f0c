use std::f64::consts::TAU;
use std::str::FromStr;

use time::macros::date;
use time::Date;
use tracing::debug;

use super::catalog::{
    self, Listing, CALENDAR_YEARS, COVERAGE, DEPOSIT_RATES, LISTINGS, LOAN_RATES,
    MONEY_SUPPLY_YEARS, RESERVE_RATIOS,
};
use crate::classify::NO_RECORD_CODE;
use crate::{
    AdjustFlag, BufferedCursor, DatasetKind, Frequency, IndexKind, ProviderClient, ProviderFault,
    ProviderStatus, QueryDescriptor, QueryKey, ReserveYearType, RowCursor, TemporalScope,
    TradeDate, YearMonth, DEFAULT_K_FIELDS,
};

/// Status code for a parameter the provider does not accept.
pub const BAD_PARAMETER_CODE: &str = "10004011";

const INTRADAY_FIELDS: [&str; 10] = [
    "date", "time", "code", "open", "high", "low", "close", "volume", "amount", "adjustflag",
];

/// Used when roster-style queries carry no date.
const DEFAULT_ROSTER_DATE: Date = date!(2026 - 01 - 05);

/// Deterministic offline provider.
///
/// The trading calendar is weekdays minus a built-in holiday table for
/// 2024-2026; every other dataset is synthesized from a hash of the query so
/// repeated calls return identical rows. Codes outside the built-in roster
/// answer "no record found".
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProvider;

impl SimulatedProvider {
    pub fn new() -> Self {
        Self
    }

    fn answer(&self, query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
        match query.dataset() {
            DatasetKind::KData => k_data(query),
            DatasetKind::BasicInfo => basic_info(query),
            DatasetKind::Dividend => dividend(query),
            DatasetKind::AdjustFactor => adjust_factor(query),
            kind @ (DatasetKind::Profit
            | DatasetKind::Operation
            | DatasetKind::Growth
            | DatasetKind::Balance
            | DatasetKind::CashFlow
            | DatasetKind::Dupont) => periodic_report(kind, query),
            DatasetKind::PerformanceExpress => performance_express(query),
            DatasetKind::Forecast => forecast(query),
            DatasetKind::StockIndustry => stock_industry(query),
            DatasetKind::Sz50 => constituents(IndexKind::Sz50, query),
            DatasetKind::Hs300 => constituents(IndexKind::Hs300, query),
            DatasetKind::Zz500 => constituents(IndexKind::Zz500, query),
            DatasetKind::TradeDates => trade_dates(query),
            DatasetKind::AllStock => all_stock(query),
            DatasetKind::DepositRate => rate_table(query, &DEPOSIT_COLUMNS, DEPOSIT_RATES),
            DatasetKind::LoanRate => rate_table(query, &LOAN_COLUMNS, LOAN_RATES),
            DatasetKind::ReserveRatio => reserve_ratio(query),
            DatasetKind::MoneySupplyMonth => money_supply_month(query),
            DatasetKind::MoneySupplyYear => money_supply_year(query),
        }
    }
}

impl ProviderClient for SimulatedProvider {
    fn login(&self) -> ProviderStatus {
        ProviderStatus::success()
    }

    fn logout(&self) -> Result<(), ProviderFault> {
        Ok(())
    }

    fn query(&self, query: &QueryDescriptor) -> Result<Box<dyn RowCursor>, ProviderFault> {
        let cursor = match self.answer(query) {
            Ok(sheet) => {
                debug!(dataset = %query.dataset(), rows = sheet.rows.len(), "simulated answer");
                BufferedCursor::ok(sheet.fields, sheet.rows)
            }
            Err(status) => BufferedCursor::failed(status),
        };
        Ok(Box::new(cursor))
    }
}

#[derive(Debug)]
struct Sheet {
    fields: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|field| (*field).to_owned()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

fn no_record() -> ProviderStatus {
    ProviderStatus::new(NO_RECORD_CODE, "no record found")
}

fn bad_parameter(message: impl Into<String>) -> ProviderStatus {
    ProviderStatus::new(BAD_PARAMETER_CODE, message)
}

/// FNV-1a over the given parts.
fn seed(parts: &[&str]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for part in parts {
        for byte in part.bytes().chain(std::iter::once(0x1f)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
    }
    hash
}

/// Uniform value in `[0, 1)`.
fn unit(parts: &[&str]) -> f64 {
    (seed(parts) % 10_000) as f64 / 10_000.0
}

fn between(parts: &[&str], low: f64, high: f64) -> f64 {
    low + unit(parts) * (high - low)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn coverage() -> (TradeDate, TradeDate) {
    let (first, last) = COVERAGE;
    (TradeDate::from_date(first), TradeDate::from_date(last))
}

fn default_roster_date() -> TradeDate {
    TradeDate::from_date(DEFAULT_ROSTER_DATE)
}

fn date_bounds(scope: &TemporalScope) -> (Option<TradeDate>, Option<TradeDate>) {
    match scope {
        TemporalScope::Range { start, end } => (*start, *end),
        TemporalScope::Day { date } => (*date, *date),
        _ => (None, None),
    }
}

fn day_of(scope: &TemporalScope) -> Option<TradeDate> {
    match scope {
        TemporalScope::Day { date } => *date,
        _ => None,
    }
}

/// Inclusive days between the bounds, clipped to the calendar coverage.
fn covered_days(start: Option<TradeDate>, end: Option<TradeDate>) -> Vec<TradeDate> {
    let (first, last) = coverage();
    let start = start.map_or(first, |start| start.max(first));
    let end = end.map_or(last, |end| end.min(last));

    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        match day.shifted(1) {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

fn in_bounds(value: &str, start: Option<TradeDate>, end: Option<TradeDate>) -> bool {
    let Ok(date) = TradeDate::parse(value) else {
        return false;
    };
    start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
}

fn listing_of(query: &QueryDescriptor) -> Result<&'static Listing, ProviderStatus> {
    let code = query
        .stock_code()
        .ok_or_else(|| bad_parameter("code is required"))?;
    catalog::listing(code.as_str()).ok_or_else(no_record)
}

fn stock_of(query: &QueryDescriptor) -> Result<&'static Listing, ProviderStatus> {
    let listing = listing_of(query)?;
    if listing.is_stock() {
        Ok(listing)
    } else {
        Err(no_record())
    }
}

fn ipo(listing: &Listing) -> Option<TradeDate> {
    TradeDate::parse(listing.ipo_date).ok()
}

fn suspended(listing: &Listing, date: TradeDate) -> bool {
    listing.is_stock() && seed(&[listing.code, &date.to_string(), "halt"]) % 29 == 0
}

// ----- k-line -----

fn close_price(listing: &Listing, date: TradeDate) -> f64 {
    let base = if listing.is_stock() {
        5.0 + (seed(&[listing.code]) % 1_900) as f64 / 10.0
    } else {
        2_000.0 + (seed(&[listing.code]) % 9_000) as f64
    };
    let phase = (date.as_date().to_julian_day() % 360) as f64 / 360.0;
    let drift = (phase * TAU).sin() * 0.12;
    let noise = (unit(&[listing.code, &date.to_string()]) - 0.5) * 0.04;
    round2(base * (1.0 + drift + noise))
}

fn previous_open_day(date: TradeDate) -> Option<TradeDate> {
    (1..=20)
        .filter_map(|back| date.shifted(-back))
        .find(|day| catalog::is_open(*day))
}

fn adjustment(listing: &Listing, flag: AdjustFlag) -> f64 {
    let back = 1.0 + (seed(&[listing.code, "adjust"]) % 300) as f64 / 100.0;
    match flag {
        AdjustFlag::BackAdjusted => back,
        AdjustFlag::ForwardAdjusted => 0.9 + (seed(&[listing.code, "fore"]) % 10) as f64 / 100.0,
        AdjustFlag::Unadjusted => 1.0,
    }
}

#[derive(Debug, Clone)]
struct Bar {
    date: TradeDate,
    time: String,
    code: &'static str,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    preclose: f64,
    volume: u64,
    adjust_flag: AdjustFlag,
    halted: bool,
    seed: u64,
}

impl Bar {
    fn daily(listing: &'static Listing, date: TradeDate, flag: AdjustFlag) -> Self {
        let factor = adjustment(listing, flag);
        let day = date.to_string();
        let close = close_price(listing, date);
        let preclose = previous_open_day(date).map_or(close, |prev| close_price(listing, prev));
        let open = round2(preclose * (1.0 + (unit(&[listing.code, &day, "open"]) - 0.5) * 0.02));
        let high = round2(open.max(close) * (1.0 + unit(&[listing.code, &day, "high"]) * 0.01));
        let low = round2(open.min(close) * (1.0 - unit(&[listing.code, &day, "low"]) * 0.01));
        let halted = suspended(listing, date);

        Self {
            date,
            time: String::new(),
            code: listing.code,
            open: open * factor,
            high: high * factor,
            low: low * factor,
            close: close * factor,
            preclose: preclose * factor,
            volume: if halted {
                0
            } else {
                1_000_000 + seed(&[listing.code, &day, "volume"]) % 50_000_000
            },
            adjust_flag: flag,
            halted,
            seed: seed(&[listing.code, &day]),
        }
    }

    /// Splits a daily bar into `minutes`-wide intraday bars.
    fn intraday(&self, minutes: u32) -> Vec<Self> {
        let count = 240 / minutes;
        let step = (self.close - self.open) / f64::from(count);
        (0..count)
            .map(|index| {
                let elapsed = (index + 1) * minutes;
                let clock = if elapsed <= 120 {
                    9 * 60 + 30 + elapsed
                } else {
                    13 * 60 + elapsed - 120
                };
                let open = self.open + step * f64::from(index);
                let close = open + step;
                Self {
                    time: format!(
                        "{:04}{:02}{:02}{:02}{:02}00000",
                        self.date.year(),
                        self.date.month(),
                        self.date.day(),
                        clock / 60,
                        clock % 60
                    ),
                    open,
                    high: open.max(close) * 1.002,
                    low: open.min(close) * 0.998,
                    close,
                    preclose: open,
                    volume: self.volume / u64::from(count),
                    ..self.clone()
                }
            })
            .collect()
    }

    /// Folds consecutive daily bars into one period bar dated at the last day.
    fn fold(bars: &[Self]) -> Option<Self> {
        let first = bars.first()?;
        let last = bars.last()?;
        Some(Self {
            open: first.open,
            preclose: first.preclose,
            high: bars.iter().map(|bar| bar.high).fold(f64::MIN, f64::max),
            low: bars.iter().map(|bar| bar.low).fold(f64::MAX, f64::min),
            volume: bars.iter().map(|bar| bar.volume).sum(),
            ..last.clone()
        })
    }

    fn value(&self, field: &str) -> String {
        let average = (self.open + self.close) / 2.0;
        match field {
            "date" => self.date.to_string(),
            "time" => self.time.clone(),
            "code" => self.code.to_owned(),
            "open" => format!("{:.4}", self.open),
            "high" => format!("{:.4}", self.high),
            "low" => format!("{:.4}", self.low),
            "close" => format!("{:.4}", self.close),
            "preclose" => format!("{:.4}", self.preclose),
            "volume" => self.volume.to_string(),
            "amount" => format!("{:.4}", self.volume as f64 * average),
            "adjustflag" => self.adjust_flag.as_str().to_owned(),
            "turn" => format!("{:.6}", (self.seed % 500) as f64 / 100.0),
            "tradestatus" => String::from(if self.halted { "0" } else { "1" }),
            "pctChg" if self.preclose > 0.0 => {
                format!("{:.6}", (self.close / self.preclose - 1.0) * 100.0)
            }
            "peTTM" => format!("{:.6}", 5.0 + (self.seed % 4_000) as f64 / 100.0),
            "pbMRQ" => format!("{:.6}", 0.5 + (self.seed % 800) as f64 / 100.0),
            "psTTM" => format!("{:.6}", 0.8 + (self.seed % 1_200) as f64 / 100.0),
            "pcfNcfTTM" => format!("{:.6}", (self.seed % 6_000) as f64 / 100.0 - 10.0),
            "isST" => "0".to_owned(),
            _ => String::new(),
        }
    }
}

fn k_data(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let listing = listing_of(query)?;
    let frequency = query
        .param("frequency")
        .map(Frequency::from_str)
        .transpose()
        .map_err(|err| bad_parameter(err.to_string()))?
        .unwrap_or_default();
    let flag = query
        .param("adjustflag")
        .map(AdjustFlag::from_str)
        .transpose()
        .map_err(|err| bad_parameter(err.to_string()))?
        .unwrap_or_default();
    let fields: Vec<&str> = match query.param("fields") {
        Some(fields) => fields
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect(),
        None => DEFAULT_K_FIELDS.to_vec(),
    };

    let allowed: &[&str] = if frequency.is_intraday() {
        &INTRADAY_FIELDS
    } else {
        &DEFAULT_K_FIELDS
    };
    if let Some(unknown) = fields.iter().find(|field| !allowed.contains(*field)) {
        return Err(bad_parameter(format!(
            "field '{unknown}' is not available at frequency {frequency}"
        )));
    }

    let (start, end) = date_bounds(query.scope());
    let listed = ipo(listing);
    let daily: Vec<Bar> = covered_days(start, end)
        .into_iter()
        .filter(|day| catalog::is_open(*day) && listed.is_none_or(|ipo| *day >= ipo))
        .map(|day| Bar::daily(listing, day, flag))
        .collect();

    let bars: Vec<Bar> = match frequency {
        Frequency::Daily => daily,
        Frequency::Weekly => fold_by(&daily, |bar| {
            let (year, week, _) = bar.date.as_date().to_iso_week_date();
            (year, week)
        }),
        Frequency::Monthly => fold_by(&daily, |bar| (bar.date.year(), bar.date.month())),
        Frequency::FiveMinutes => daily.iter().flat_map(|bar| bar.intraday(5)).collect(),
        Frequency::FifteenMinutes => daily.iter().flat_map(|bar| bar.intraday(15)).collect(),
        Frequency::ThirtyMinutes => daily.iter().flat_map(|bar| bar.intraday(30)).collect(),
        Frequency::SixtyMinutes => daily.iter().flat_map(|bar| bar.intraday(60)).collect(),
    };

    let mut sheet = Sheet::new(&fields);
    for bar in bars {
        sheet.push(fields.iter().map(|field| bar.value(field)).collect());
    }
    Ok(sheet)
}

fn fold_by<K: PartialEq>(bars: &[Bar], key: impl Fn(&Bar) -> K) -> Vec<Bar> {
    bars.chunk_by(|left, right| key(left) == key(right))
        .filter_map(Bar::fold)
        .collect()
}

// ----- per-stock datasets -----

fn basic_info(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let listing = listing_of(query)?;
    let mut sheet = Sheet::new(&["code", "code_name", "ipoDate", "outDate", "type", "status"]);
    sheet.push(vec![
        listing.code.to_owned(),
        listing.name.to_owned(),
        listing.ipo_date.to_owned(),
        String::new(),
        listing.kind.code().to_owned(),
        "1".to_owned(),
    ]);
    Ok(sheet)
}

fn report_year(listing: &Listing, year: &str) -> Result<i32, ProviderStatus> {
    let year: i32 = year
        .parse()
        .map_err(|_| bad_parameter(format!("invalid year '{year}'")))?;
    if year <= listing.ipo_year() || year > CALENDAR_YEARS.1 {
        return Err(no_record());
    }
    Ok(year)
}

fn dividend(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let listing = stock_of(query)?;
    let TemporalScope::Year { year } = query.scope() else {
        return Err(bad_parameter("year is required"));
    };
    let year = report_year(listing, year)?;
    let tag = year.to_string();
    let day = 10 + (seed(&[listing.code, &tag, "regist"]) % 15) as u8;
    let cash = between(&[listing.code, &tag, "cash"], 0.05, 3.0);

    let mut sheet = Sheet::new(&[
        "code",
        "dividPreNoticeDate",
        "dividAgmPumDate",
        "dividPlanAnnounceDate",
        "dividPlanDate",
        "dividRegistDate",
        "dividOperateDate",
        "dividPayDate",
        "dividStockMarketDate",
        "dividCashPsBeforeTax",
        "dividCashPsAfterTax",
        "dividStocksPs",
        "dividCashStock",
        "dividReserveToStockPs",
    ]);
    sheet.push(vec![
        listing.code.to_owned(),
        String::new(),
        format!("{year}-05-20"),
        format!("{year}-03-28"),
        format!("{year}-06-{:02}", day.saturating_sub(5)),
        format!("{year}-06-{day:02}"),
        format!("{year}-06-{:02}", day + 1),
        format!("{year}-06-{:02}", day + 1),
        String::new(),
        format!("{cash:.4}"),
        format!("{cash:.4}元"),
        String::new(),
        format!("10派{:.2}元(含税)", cash * 10.0),
        String::new(),
    ]);
    Ok(sheet)
}

fn adjust_factor(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let listing = stock_of(query)?;
    let (start, end) = date_bounds(query.scope());
    let first_year = listing.ipo_year() + 1;
    let factor_at = |year: i32| 1.0 + 0.05 * f64::from(year - listing.ipo_year());
    let latest = factor_at(CALENDAR_YEARS.1);

    let mut sheet = Sheet::new(&[
        "code",
        "dividOperateDate",
        "foreAdjustFactor",
        "backAdjustFactor",
        "adjustFactor",
    ]);
    for year in first_year..=CALENDAR_YEARS.1 {
        let day = 15 + seed(&[listing.code, &year.to_string(), "xd"]) % 10;
        let date = format!("{year}-06-{day:02}");
        if !in_bounds(&date, start, end) {
            continue;
        }
        let back = factor_at(year);
        sheet.push(vec![
            listing.code.to_owned(),
            date,
            format!("{:.6}", back / latest),
            format!("{back:.6}"),
            format!("{back:.6}"),
        ]);
    }
    Ok(sheet)
}

// ----- periodic reports -----

type Metric = (&'static str, f64, f64);

const PROFIT_METRICS: &[Metric] = &[
    ("roeAvg", 0.01, 0.35),
    ("npMargin", 0.02, 0.55),
    ("gpMargin", 0.1, 0.92),
    ("netProfit", 1.0e8, 9.0e10),
    ("epsTTM", 0.1, 60.0),
    ("MBRevenue", 1.0e9, 9.0e11),
    ("totalShare", 1.0e9, 3.5e11),
    ("liqaShare", 1.0e9, 3.0e11),
];

const OPERATION_METRICS: &[Metric] = &[
    ("NRTurnRatio", 1.0, 80.0),
    ("NRTurnDays", 4.0, 180.0),
    ("INVTurnRatio", 0.2, 20.0),
    ("INVTurnDays", 18.0, 900.0),
    ("CATurnRatio", 0.2, 3.0),
    ("AssetTurnRatio", 0.02, 1.5),
];

const GROWTH_METRICS: &[Metric] = &[
    ("YOYEquity", -0.2, 0.4),
    ("YOYAsset", -0.1, 0.4),
    ("YOYNI", -0.5, 0.8),
    ("YOYEPSBasic", -0.5, 0.8),
    ("YOYPNI", -0.5, 0.8),
];

const BALANCE_METRICS: &[Metric] = &[
    ("currentRatio", 0.5, 4.0),
    ("quickRatio", 0.3, 3.5),
    ("cashRatio", 0.05, 2.0),
    ("YOYLiability", -0.2, 0.4),
    ("liabilityToAsset", 0.1, 0.93),
    ("assetToEquity", 1.1, 15.0),
];

const CASH_FLOW_METRICS: &[Metric] = &[
    ("CAToAsset", 0.1, 0.9),
    ("NCAToAsset", 0.1, 0.9),
    ("tangibleAssetToAsset", 0.5, 0.99),
    ("ebitToInterest", 1.0, 200.0),
    ("CFOToOR", -0.2, 0.6),
    ("CFOToNP", -1.0, 3.0),
    ("CFOToGr", -0.2, 0.6),
];

const DUPONT_METRICS: &[Metric] = &[
    ("dupontROE", 0.01, 0.35),
    ("dupontAssetStoEquity", 1.1, 15.0),
    ("dupontAssetTurn", 0.02, 1.5),
    ("dupontPnitoni", 0.8, 1.0),
    ("dupontNitogr", 0.02, 0.55),
    ("dupontTaxBurden", 0.7, 0.95),
    ("dupontIntburden", 0.8, 1.0),
    ("dupontEbittogr", 0.03, 0.6),
];

fn metrics_of(kind: DatasetKind) -> &'static [Metric] {
    match kind {
        DatasetKind::Profit => PROFIT_METRICS,
        DatasetKind::Operation => OPERATION_METRICS,
        DatasetKind::Growth => GROWTH_METRICS,
        DatasetKind::Balance => BALANCE_METRICS,
        DatasetKind::CashFlow => CASH_FLOW_METRICS,
        _ => DUPONT_METRICS,
    }
}

fn quarter_end(year: i32, quarter: u8) -> String {
    match quarter {
        1 => format!("{year}-03-31"),
        2 => format!("{year}-06-30"),
        3 => format!("{year}-09-30"),
        _ => format!("{year}-12-31"),
    }
}

fn quarter_publication(year: i32, quarter: u8) -> String {
    match quarter {
        1 => format!("{year}-04-28"),
        2 => format!("{year}-08-28"),
        3 => format!("{year}-10-28"),
        _ => format!("{}-03-28", year + 1),
    }
}

fn periodic_report(kind: DatasetKind, query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let listing = stock_of(query)?;
    let TemporalScope::Quarter { period } = query.scope() else {
        return Err(bad_parameter("year and quarter are required"));
    };
    let year = report_year(listing, period.year())?;
    let quarter = period.quarter();
    let stat_date = quarter_end(year, quarter);
    let metrics = metrics_of(kind);

    let mut fields = vec!["code", "pubDate", "statDate"];
    fields.extend(metrics.iter().map(|(name, _, _)| *name));
    let mut sheet = Sheet::new(&fields);

    let mut row = vec![
        listing.code.to_owned(),
        quarter_publication(year, quarter),
        stat_date.clone(),
    ];
    row.extend(metrics.iter().map(|(name, low, high)| {
        format!("{:.6}", between(&[listing.code, stat_date.as_str(), *name], *low, *high))
    }));
    sheet.push(row);
    Ok(sheet)
}

// ----- bulletins -----

fn performance_express(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let listing = stock_of(query)?;
    let (start, end) = date_bounds(query.scope());

    let mut sheet = Sheet::new(&[
        "code",
        "performanceExpPubDate",
        "performanceExpStatDate",
        "performanceExpUpdateDate",
        "performanceExpressTotalAsset",
        "performanceExpressNetAsset",
        "performanceExpressEPSChgPct",
        "performanceExpressROEWa",
        "performanceExpressEPSDiluted",
        "performanceExpressGRYOY",
        "performanceExpressOPYOY",
    ]);
    for year in listing.ipo_year()..CALENDAR_YEARS.1 {
        let published = format!("{}-01-20", year + 1);
        if !in_bounds(&published, start, end) {
            continue;
        }
        let stat_date = quarter_end(year, 4);
        let parts = |name: &'static str| [listing.code, stat_date.as_str(), name];
        sheet.push(vec![
            listing.code.to_owned(),
            published.clone(),
            stat_date.clone(),
            published,
            format!("{:.2}", between(&parts("asset"), 1.0e10, 9.0e12)),
            format!("{:.2}", between(&parts("net"), 1.0e9, 9.0e11)),
            format!("{:.6}", between(&parts("eps_chg"), -0.5, 0.8)),
            format!("{:.6}", between(&parts("roe"), 1.0, 35.0)),
            format!("{:.6}", between(&parts("eps"), 0.1, 60.0)),
            format!("{:.6}", between(&parts("gr"), -0.3, 0.6)),
            format!("{:.6}", between(&parts("op"), -0.5, 0.8)),
        ]);
    }
    Ok(sheet)
}

const FORECAST_TYPES: [&str; 5] = ["预增", "略增", "续盈", "略减", "预减"];

fn forecast(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let listing = stock_of(query)?;
    let (start, end) = date_bounds(query.scope());

    let mut sheet = Sheet::new(&[
        "code",
        "profitForcastExpPubDate",
        "profitForcastExpStatDate",
        "profitForcastType",
        "profitForcastAbstract",
        "profitForcastChgPctUp",
        "profitForcastChgPctDwn",
    ]);
    for year in listing.ipo_year()..=CALENDAR_YEARS.1 {
        for (published, quarter) in [
            (format!("{year}-07-10"), 2),
            (format!("{}-01-25", year + 1), 4),
        ] {
            if !in_bounds(&published, start, end) {
                continue;
            }
            let stat_date = quarter_end(year, quarter);
            let pick = seed(&[listing.code, &stat_date, "type"]) as usize % FORECAST_TYPES.len();
            let low = between(&[listing.code, &stat_date, "low"], -60.0, 80.0);
            let high = low + between(&[listing.code, &stat_date, "width"], 5.0, 30.0);
            sheet.push(vec![
                listing.code.to_owned(),
                published,
                stat_date,
                FORECAST_TYPES[pick].to_owned(),
                format!("预计净利润同比变动{low:.0}%至{high:.0}%"),
                format!("{high:.4}"),
                format!("{low:.4}"),
            ]);
        }
    }
    Ok(sheet)
}

// ----- rosters -----

const INDUSTRY_CLASSIFICATION: &str = "证监会行业分类";

fn roster_date(query: &QueryDescriptor) -> Option<TradeDate> {
    match day_of(query.scope()) {
        Some(date) if !catalog::covers(date) => None,
        Some(date) => Some(date),
        None => Some(default_roster_date()),
    }
}

fn stock_industry(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let mut sheet = Sheet::new(&[
        "updateDate",
        "code",
        "code_name",
        "industry",
        "industryClassification",
    ]);
    let Some(date) = roster_date(query) else {
        return Ok(sheet);
    };
    let selected: Vec<&Listing> = match query.stock_code() {
        Some(_) => vec![stock_of(query)?],
        None => LISTINGS.iter().filter(|listing| listing.is_stock()).collect(),
    };

    for listing in selected {
        sheet.push(vec![
            date.to_string(),
            listing.code.to_owned(),
            listing.name.to_owned(),
            listing.industry.to_owned(),
            INDUSTRY_CLASSIFICATION.to_owned(),
        ]);
    }
    Ok(sheet)
}

fn constituents(default_index: IndexKind, query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let index = match query.key() {
        QueryKey::Index(index) => *index,
        _ => default_index,
    };
    let mut sheet = Sheet::new(&["updateDate", "code", "code_name"]);
    let Some(date) = roster_date(query) else {
        return Ok(sheet);
    };

    for listing in LISTINGS.iter().filter(|listing| listing.indices.contains(&index)) {
        sheet.push(vec![
            date.to_string(),
            listing.code.to_owned(),
            listing.name.to_owned(),
        ]);
    }
    Ok(sheet)
}

fn trade_dates(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let (start, end) = date_bounds(query.scope());
    let mut sheet = Sheet::new(&["calendar_date", "is_trading_day"]);
    for day in covered_days(start, end) {
        let flag = if catalog::is_open(day) { "1" } else { "0" };
        sheet.push(vec![day.to_string(), flag.to_owned()]);
    }
    Ok(sheet)
}

fn all_stock(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let mut sheet = Sheet::new(&["code", "tradeStatus", "code_name"]);
    let date = day_of(query.scope()).unwrap_or_else(default_roster_date);
    if !catalog::is_open(date) {
        return Ok(sheet);
    }

    for listing in LISTINGS {
        if ipo(listing).is_some_and(|ipo| ipo > date) {
            continue;
        }
        let status = if suspended(listing, date) { "0" } else { "1" };
        sheet.push(vec![
            listing.code.to_owned(),
            status.to_owned(),
            listing.name.to_owned(),
        ]);
    }
    Ok(sheet)
}

// ----- macro series -----

const DEPOSIT_COLUMNS: [&str; 7] = [
    "pubDate",
    "demandDepositRate",
    "fixedDepositRate3Month",
    "fixedDepositRate6Month",
    "fixedDepositRate1Year",
    "fixedDepositRate2Year",
    "fixedDepositRate3Year",
];

const LOAN_COLUMNS: [&str; 8] = [
    "pubDate",
    "loanRate6Month",
    "loanRate6MonthTo1Year",
    "loanRate1YearTo3Year",
    "loanRate3YearTo5Year",
    "loanRateAbove5Year",
    "mortgateRateBelow5Year",
    "mortgateRateAbove5Year",
];

fn rate_table<const N: usize>(
    query: &QueryDescriptor,
    columns: &[&str; N],
    table: &[[&str; N]],
) -> Result<Sheet, ProviderStatus> {
    let (start, end) = date_bounds(query.scope());
    let mut sheet = Sheet::new(columns);
    for row in table.iter().filter(|row| in_bounds(row[0], start, end)) {
        sheet.push(row.iter().map(|value| (*value).to_owned()).collect());
    }
    Ok(sheet)
}

fn reserve_ratio(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let year_type = query
        .param("yearType")
        .map(ReserveYearType::from_str)
        .transpose()
        .map_err(|err| bad_parameter(err.to_string()))?
        .unwrap_or_default();
    let date_column = match year_type {
        ReserveYearType::Announcement => 0,
        ReserveYearType::Effective => 1,
    };
    let (start, end) = date_bounds(query.scope());

    let mut sheet = Sheet::new(&[
        "pubDate",
        "effectiveDate",
        "bigInstitutionsRatioPre",
        "bigInstitutionsRatioAfter",
        "mediumInstitutionsRatioPre",
        "mediumInstitutionsRatioAfter",
    ]);
    for row in RESERVE_RATIOS
        .iter()
        .filter(|row| in_bounds(row[date_column], start, end))
    {
        sheet.push(row.iter().map(|value| (*value).to_owned()).collect());
    }
    Ok(sheet)
}

/// Aggregate level in 100 million yuan, `months` after January of the first year.
fn money_level(aggregate: &str, months: i32) -> f64 {
    let (base, growth): (f64, f64) = match aggregate {
        "m0" => (63_000.0, 1.005),
        "m1" => (345_000.0, 1.006),
        _ => (1_357_000.0, 1.0075),
    };
    let wobble = (unit(&[aggregate, &months.to_string()]) - 0.5) * 0.01;
    round2(base * growth.powi(months) * (1.0 + wobble))
}

fn percent_change(current: f64, previous: f64) -> String {
    format!("{:.2}", (current / previous - 1.0) * 100.0)
}

fn months_since_start(year: i32, month: u8) -> i32 {
    (year - MONEY_SUPPLY_YEARS.0) * 12 + i32::from(month) - 1
}

fn money_supply_month(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let (start, end) = match query.scope() {
        TemporalScope::MonthRange { start, end } => (*start, *end),
        _ => (None, None),
    };
    let within = |year: i32, month: u8| {
        let key = (year, month);
        start.is_none_or(|start: YearMonth| key >= (start.year(), start.month()))
            && end.is_none_or(|end: YearMonth| key <= (end.year(), end.month()))
    };

    let mut sheet = Sheet::new(&[
        "statYear",
        "statMonth",
        "m0Month",
        "m0YOY",
        "m0ChainRelative",
        "m1Month",
        "m1YOY",
        "m1ChainRelative",
        "m2Month",
        "m2YOY",
        "m2ChainRelative",
    ]);
    for year in MONEY_SUPPLY_YEARS.0..=MONEY_SUPPLY_YEARS.1 {
        for month in 1..=12u8 {
            if !within(year, month) {
                continue;
            }
            let index = months_since_start(year, month);
            let mut row = vec![year.to_string(), month.to_string()];
            for aggregate in ["m0", "m1", "m2"] {
                let level = money_level(aggregate, index);
                row.push(format!("{level:.2}"));
                row.push(percent_change(level, money_level(aggregate, index - 12)));
                row.push(percent_change(level, money_level(aggregate, index - 1)));
            }
            sheet.push(row);
        }
    }
    Ok(sheet)
}

fn money_supply_year(query: &QueryDescriptor) -> Result<Sheet, ProviderStatus> {
    let (start, end) = match query.scope() {
        TemporalScope::YearRange { start, end } => (
            start.as_deref().and_then(|year| year.parse::<i32>().ok()),
            end.as_deref().and_then(|year| year.parse::<i32>().ok()),
        ),
        _ => (None, None),
    };

    let mut sheet = Sheet::new(&[
        "statYear", "m0Year", "m0YearYOY", "m1Year", "m1YearYOY", "m2Year", "m2YearYOY",
    ]);
    for year in MONEY_SUPPLY_YEARS.0..=MONEY_SUPPLY_YEARS.1 {
        if start.is_some_and(|start| year < start) || end.is_some_and(|end| year > end) {
            continue;
        }
        let december = months_since_start(year, 12);
        let mut row = vec![year.to_string()];
        for aggregate in ["m0", "m1", "m2"] {
            let level = money_level(aggregate, december);
            row.push(format!("{level:.2}"));
            row.push(percent_change(level, money_level(aggregate, december - 12)));
        }
        sheet.push(row);
    }
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ReportPeriod, StockCode};

    fn drain(provider: &SimulatedProvider, query: &QueryDescriptor) -> (ProviderStatus, Sheet) {
        let mut cursor = provider.query(query).expect("simulated queries never fault");
        let status = cursor.status().clone();
        let mut sheet = Sheet {
            fields: cursor.fields().to_vec(),
            rows: Vec::new(),
        };
        while let Some(row) = cursor.next_row().expect("no fault") {
            sheet.push(row);
        }
        (status, sheet)
    }

    fn date(value: &str) -> TradeDate {
        TradeDate::parse(value).expect("valid date")
    }

    fn code(value: &str) -> StockCode {
        StockCode::parse(value).expect("valid code")
    }

    #[test]
    fn calendar_flags_weekends_and_holidays() {
        let query = QueryDescriptor::builder(DatasetKind::TradeDates)
            .range(Some(date("2025-01-27")), Some(date("2025-02-05")))
            .build();
        let (status, sheet) = drain(&SimulatedProvider::new(), &query);

        assert!(status.is_success());
        assert_eq!(sheet.fields, ["calendar_date", "is_trading_day"]);
        assert_eq!(sheet.rows.len(), 10);
        let open: Vec<&str> = sheet
            .rows
            .iter()
            .filter(|row| row[1] == "1")
            .map(|row| row[0].as_str())
            .collect();
        assert_eq!(open, ["2025-01-27", "2025-02-05"]);
    }

    #[test]
    fn k_data_honors_requested_fields_and_is_deterministic() {
        let query = QueryDescriptor::builder(DatasetKind::KData)
            .stock(code("sh.600000"))
            .range(Some(date("2025-01-02")), Some(date("2025-01-10")))
            .param("fields", "date,code,close")
            .param("frequency", "d")
            .param("adjustflag", "3")
            .build();
        let provider = SimulatedProvider::new();
        let (status, first) = drain(&provider, &query);
        let (_, second) = drain(&provider, &query);

        assert!(status.is_success());
        assert_eq!(first.fields, ["date", "code", "close"]);
        assert_eq!(first.rows.len(), 7);
        assert_eq!(first.rows, second.rows);
        assert!(first.rows.iter().all(|row| row[1] == "sh.600000"));
    }

    #[test]
    fn weekly_and_intraday_bars() {
        let base = QueryDescriptor::builder(DatasetKind::KData)
            .stock(code("sz.000001"))
            .range(Some(date("2025-01-06")), Some(date("2025-01-17")))
            .param("fields", "date,code,close");
        let (_, weekly) = drain(
            &SimulatedProvider::new(),
            &base.clone().param("frequency", "w").build(),
        );
        assert_eq!(weekly.rows.len(), 2);
        assert_eq!(weekly.rows[0][0], "2025-01-10");

        let (_, hourly) = drain(
            &SimulatedProvider::new(),
            &base
                .param("frequency", "60")
                .param("fields", "date,time,close")
                .build(),
        );
        assert_eq!(hourly.rows.len(), 40);
        assert_eq!(hourly.rows[0][1], "20250106103000000");
    }

    #[test]
    fn unsupported_field_is_a_provider_status() {
        let query = QueryDescriptor::builder(DatasetKind::KData)
            .stock(code("sh.600000"))
            .range(Some(date("2025-01-02")), Some(date("2025-01-10")))
            .param("fields", "date,turn")
            .param("frequency", "5")
            .build();
        let (status, sheet) = drain(&SimulatedProvider::new(), &query);

        assert_eq!(status.code, BAD_PARAMETER_CODE);
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn unknown_code_is_no_record() {
        let query = QueryDescriptor::builder(DatasetKind::Profit)
            .stock(code("sh.688999"))
            .quarter(ReportPeriod::new("2024", 1).expect("valid period"))
            .build();
        let (status, _) = drain(&SimulatedProvider::new(), &query);
        assert_eq!(status.code, NO_RECORD_CODE);
    }

    #[test]
    fn periodic_report_has_provider_columns() {
        let query = QueryDescriptor::builder(DatasetKind::Dupont)
            .stock(code("sh.600519"))
            .quarter(ReportPeriod::new("2024", 4).expect("valid period"))
            .build();
        let (status, sheet) = drain(&SimulatedProvider::new(), &query);

        assert!(status.is_success());
        assert_eq!(&sheet.fields[..4], ["code", "pubDate", "statDate", "dupontROE"]);
        assert_eq!(sheet.rows[0][1], "2025-03-28");
        assert_eq!(sheet.rows[0][2], "2024-12-31");
    }

    #[test]
    fn constituents_follow_index_membership() {
        let query = QueryDescriptor::builder(DatasetKind::Zz500)
            .index(IndexKind::Zz500)
            .build();
        let (_, sheet) = drain(&SimulatedProvider::new(), &query);
        let codes: Vec<&str> = sheet.rows.iter().map(|row| row[1].as_str()).collect();
        assert_eq!(codes, ["sh.600060", "sz.000009"]);
    }

    #[test]
    fn all_stock_is_empty_on_closed_days() {
        let query = QueryDescriptor::builder(DatasetKind::AllStock)
            .day(Some(date("2025-01-04")))
            .build();
        let (status, sheet) = drain(&SimulatedProvider::new(), &query);
        assert!(status.is_success());
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn reserve_ratio_filters_on_selected_date_column() {
        let base = QueryDescriptor::builder(DatasetKind::ReserveRatio)
            .range(Some(date("2024-02-01")), Some(date("2024-02-29")));
        let (_, by_announcement) =
            drain(&SimulatedProvider::new(), &base.clone().param("yearType", "0").build());
        let (_, by_effect) = drain(&SimulatedProvider::new(), &base.param("yearType", "1").build());

        assert!(by_announcement.rows.is_empty());
        assert_eq!(by_effect.rows.len(), 1);
        assert_eq!(by_effect.rows[0][1], "2024-02-05");
    }

    #[test]
    fn money_supply_month_respects_bounds() {
        let query = QueryDescriptor::builder(DatasetKind::MoneySupplyMonth)
            .month_range(
                Some(YearMonth::parse("2023-11").expect("valid")),
                Some(YearMonth::parse("2024-02").expect("valid")),
            )
            .build();
        let (_, sheet) = drain(&SimulatedProvider::new(), &query);
        let months: Vec<(&str, &str)> = sheet
            .rows
            .iter()
            .map(|row| (row[0].as_str(), row[1].as_str()))
            .collect();
        assert_eq!(
            months,
            [("2023", "11"), ("2023", "12"), ("2024", "1"), ("2024", "2")]
        );
    }
}
