mod calendar;
mod financials;
mod helpers;
mod indices;
mod macro_data;
mod market;

use std::collections::BTreeMap;

use ashare_core::{
    Clock, DataConfig, DataSource, DatasetKind, FixedClock, ProviderDataSource, ScriptedProvider,
    SimulatedProvider, SystemClock, TabularResult, TradeDate,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Data source, clock and row limit shared by every command.
pub struct Context {
    source: Box<dyn DataSource>,
    clock: Box<dyn Clock>,
    limit: usize,
}

impl Context {
    pub fn new(source: Box<dyn DataSource>, clock: Box<dyn Clock>, limit: usize) -> Self {
        Self {
            source,
            clock,
            limit,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let config = DataConfig::from_env()?;

        let source: Box<dyn DataSource> = match &cli.fixture {
            Some(path) => {
                let fixture = std::fs::read_to_string(path)?;
                let provider = ScriptedProvider::from_fixture_str(&fixture)?;
                debug!(path = %path.display(), "serving scripted fixture");
                Box::new(ProviderDataSource::with_config(provider, &config))
            }
            None => Box::new(ProviderDataSource::with_config(
                SimulatedProvider::new(),
                &config,
            )),
        };

        let clock: Box<dyn Clock> = match &cli.today {
            Some(today) => Box::new(FixedClock(TradeDate::parse(today)?)),
            None => Box::new(SystemClock::from_config(&config)),
        };

        let limit = cli.limit.unwrap_or(config.default_row_limit);
        if limit == 0 {
            return Err(CliError::InvalidArgument(
                "--limit must be at least 1".to_owned(),
            ));
        }

        Ok(Self::new(source, clock, limit))
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// What a command produced, before rendering.
#[derive(Debug)]
pub enum Body {
    Table(TabularResult),
    /// A scalar answer: `text` for people, `json` for the envelope.
    Value { text: String, json: Value },
}

#[derive(Debug)]
pub struct CommandResult {
    pub label: String,
    pub dataset: Option<DatasetKind>,
    pub params: BTreeMap<String, String>,
    pub body: Body,
}

impl CommandResult {
    pub fn table(dataset: DatasetKind, table: TabularResult) -> Self {
        Self {
            label: dataset.label().to_owned(),
            dataset: Some(dataset),
            params: BTreeMap::new(),
            body: Body::Table(table),
        }
    }

    pub fn labelled_table(label: impl Into<String>, table: TabularResult) -> Self {
        Self {
            label: label.into(),
            dataset: None,
            params: BTreeMap::new(),
            body: Body::Table(table),
        }
    }

    pub fn value(label: impl Into<String>, text: impl Into<String>, json: Value) -> Self {
        Self {
            label: label.into(),
            dataset: None,
            params: BTreeMap::new(),
            body: Body::Value {
                text: text.into(),
                json,
            },
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(name.to_owned(), value.into());
        self
    }

    pub fn with_optional_param(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with_param(name, value),
            None => self,
        }
    }
}

pub fn run(command: &Command, context: &Context) -> Result<CommandResult, CliError> {
    match command {
        Command::KData(args) => market::k_data(args, context),
        Command::BasicInfo(args) => market::basic_info(args, context),
        Command::Dividends(args) => market::dividends(args, context),
        Command::AdjustFactors(args) => market::adjust_factors(args, context),
        Command::Profit(args) => financials::report(DatasetKind::Profit, args, context),
        Command::Operation(args) => financials::report(DatasetKind::Operation, args, context),
        Command::Growth(args) => financials::report(DatasetKind::Growth, args, context),
        Command::Balance(args) => financials::report(DatasetKind::Balance, args, context),
        Command::CashFlow(args) => financials::report(DatasetKind::CashFlow, args, context),
        Command::Dupont(args) => financials::report(DatasetKind::Dupont, args, context),
        Command::PerformanceExpress(args) => {
            financials::bulletin(DatasetKind::PerformanceExpress, args, context)
        }
        Command::Forecast(args) => financials::bulletin(DatasetKind::Forecast, args, context),
        Command::Industry(args) => indices::industry(args, context),
        Command::IndexConstituents(args) => indices::constituents(args, context),
        Command::TradeDates(args) => indices::trade_dates(args, context),
        Command::AllStock(args) => indices::all_stock(args, context),
        Command::SearchStocks(args) => indices::search(args, context),
        Command::Suspensions(args) => indices::suspensions(args, context),
        Command::ListIndustries(args) => indices::list_industries(args, context),
        Command::IndustryMembers(args) => indices::industry_members(args, context),
        Command::DepositRate(args) => macro_data::series(DatasetKind::DepositRate, args, context),
        Command::LoanRate(args) => macro_data::series(DatasetKind::LoanRate, args, context),
        Command::ReserveRatio(args) => macro_data::reserve_ratio(args, context),
        Command::MoneySupplyMonth(args) => {
            macro_data::series(DatasetKind::MoneySupplyMonth, args, context)
        }
        Command::MoneySupplyYear(args) => {
            macro_data::series(DatasetKind::MoneySupplyYear, args, context)
        }
        Command::LatestTradingDate => Ok(calendar::latest(context)),
        Command::IsTradingDay(args) => calendar::is_trading_day(args, context),
        Command::PreviousTradingDay(args) => calendar::previous(args, context),
        Command::NextTradingDay(args) => calendar::next(args, context),
        Command::AnalysisTimeframe(args) => calendar::timeframe(args, context),
        Command::NormalizeCode(args) => helpers::normalize_code(args),
        Command::Constants(args) => helpers::constants(args),
    }
}
