//! CLI argument definitions for ashare.
//!
//! One subcommand per data source method, calendar question, market screen
//! and helper.
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `markdown` | Output format (markdown, json, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--limit` | `ASHARE_ROW_LIMIT` or 250 | Maximum rows rendered |
//! | `--log-level` | `warn` | Log filter when `RUST_LOG` is unset |
//! | `--fixture` | none | Serve a scripted provider from a JSON file |
//! | `--today` | system clock | Pin "today" for calendar questions |
//!
//! # Examples
//!
//! ```bash
//! ashare k-data sh.600000 --start 2025-01-02 --end 2025-01-10
//! ashare profit sh.600519 --year 2024 --quarter 4 --format json --pretty
//! ashare previous-trading-day 2025-02-05
//! ashare analysis-timeframe quarter --today 2025-08-20
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "ashare",
    author,
    version,
    about = "A-share market data and trading calendar CLI"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Maximum rows to render; the envelope records the full count.
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// JSON fixture served by a scripted provider instead of the simulated one.
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Treat this YYYY-MM-DD date as today.
    #[arg(long, global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown table.
    Markdown,
    /// Envelope with metadata.
    Json,
    /// Header row plus data rows.
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Historical k-line bars.
    KData(KDataArgs),
    /// Basic listing information.
    BasicInfo(BasicInfoArgs),
    /// Dividend records for one year.
    Dividends(DividendArgs),
    /// Price adjustment factors.
    AdjustFactors(StockRangeArgs),
    /// Quarterly profitability ratios.
    Profit(ReportArgs),
    /// Quarterly operating efficiency ratios.
    Operation(ReportArgs),
    /// Quarterly growth ratios.
    Growth(ReportArgs),
    /// Quarterly solvency ratios.
    Balance(ReportArgs),
    /// Quarterly cash flow ratios.
    CashFlow(ReportArgs),
    /// Quarterly DuPont decomposition.
    Dupont(ReportArgs),
    /// Performance express reports.
    PerformanceExpress(StockRangeArgs),
    /// Performance forecasts.
    Forecast(StockRangeArgs),
    /// Industry classification.
    Industry(IndustryArgs),
    /// Constituents of hs300, sz50 or zz500.
    IndexConstituents(IndexArgs),
    /// Calendar days with trading flags.
    TradeDates(RangeArgs),
    /// Every listed security on a day.
    AllStock(DateArgs),
    /// Securities whose code contains a keyword.
    SearchStocks(SearchArgs),
    /// Securities suspended on a day.
    Suspensions(DateArgs),
    /// Distinct industry names.
    ListIndustries(DateArgs),
    /// Securities in one industry.
    IndustryMembers(IndustryMembersArgs),
    /// Benchmark deposit rates.
    DepositRate(RangeArgs),
    /// Benchmark lending rates.
    LoanRate(RangeArgs),
    /// Required reserve ratios.
    ReserveRatio(ReserveRatioArgs),
    /// Monthly money supply (bounds are YYYY-MM).
    MoneySupplyMonth(RangeArgs),
    /// Yearly money supply (bounds are YYYY).
    MoneySupplyYear(RangeArgs),
    /// Latest trading day this month on or before today.
    LatestTradingDate,
    /// Whether a date is a trading day.
    IsTradingDay(DayArgs),
    /// Closest trading day before a date.
    PreviousTradingDay(DayArgs),
    /// Closest trading day after a date.
    NextTradingDay(DayArgs),
    /// Human-readable analysis window.
    AnalysisTimeframe(TimeframeArgs),
    /// Normalize a stock code to sh.600000 form.
    NormalizeCode(CodeArgs),
    /// Accepted parameter values.
    Constants(ConstantsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct KDataArgs {
    pub code: String,
    #[arg(long)]
    pub start: String,
    #[arg(long)]
    pub end: String,
    /// d, w, m, 5, 15, 30 or 60.
    #[arg(long, default_value = "d")]
    pub frequency: String,
    /// 1 back-adjusted, 2 forward-adjusted, 3 unadjusted.
    #[arg(long, default_value = "3")]
    pub adjust_flag: String,
    /// Comma-separated column names.
    #[arg(long)]
    pub fields: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct BasicInfoArgs {
    pub code: String,
    /// Comma-separated column names to keep.
    #[arg(long)]
    pub fields: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DividendArgs {
    pub code: String,
    #[arg(long)]
    pub year: String,
    /// report or operate.
    #[arg(long, default_value = "report")]
    pub year_type: String,
}

#[derive(Debug, Clone, Args)]
pub struct StockRangeArgs {
    pub code: String,
    #[arg(long)]
    pub start: String,
    #[arg(long)]
    pub end: String,
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    pub code: String,
    #[arg(long)]
    pub year: String,
    #[arg(long)]
    pub quarter: u32,
}

#[derive(Debug, Clone, Args)]
pub struct IndustryArgs {
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct IndexArgs {
    /// hs300, sz50 or zz500.
    pub index: String,
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DateArgs {
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    pub keyword: String,
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct IndustryMembersArgs {
    pub industry: String,
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ReserveRatioArgs {
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
    /// 0 filters on announcement date, 1 on effective date.
    #[arg(long, default_value = "0")]
    pub year_type: String,
}

#[derive(Debug, Clone, Args)]
pub struct DayArgs {
    pub date: String,
}

#[derive(Debug, Clone, Args)]
pub struct TimeframeArgs {
    /// recent, quarter, half_year or year.
    #[arg(default_value = "recent")]
    pub period: String,
}

#[derive(Debug, Clone, Args)]
pub struct CodeArgs {
    pub code: String,
}

#[derive(Debug, Clone, Args)]
pub struct ConstantsArgs {
    /// frequency, adjust_flag, year_type, reserve_year_type or index; all when omitted.
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ashare",
            "profit",
            "sh.600000",
            "--year",
            "2024",
            "--quarter",
            "2",
            "--format",
            "csv",
            "--limit",
            "5",
        ])
        .expect("arguments parse");

        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.limit, Some(5));
        assert!(matches!(cli.command, Command::Profit(ReportArgs { quarter: 2, .. })));
    }

    #[test]
    fn subcommands_use_kebab_case() {
        let cli = Cli::try_parse_from(["ashare", "money-supply-month", "--start", "2024-01"])
            .expect("arguments parse");
        assert!(matches!(cli.command, Command::MoneySupplyMonth(_)));

        let cli = Cli::try_parse_from(["ashare", "analysis-timeframe"]).expect("default period");
        let Command::AnalysisTimeframe(args) = cli.command else {
            panic!("expected analysis-timeframe");
        };
        assert_eq!(args.period, "recent");
    }
}
