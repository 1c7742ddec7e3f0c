use std::collections::BTreeMap;

use tracing::debug;

use crate::fetch::{
    fetch_constituents, fetch_periodic_report, fetch_series, fetch_table, parse_optional, rejected,
};
use crate::{
    validate_year, DataConfig, DataError, DataSource, DatasetKind, FieldList, IndexKind,
    KDataOptions, ProviderClient, QueryDescriptor, QueryDescriptorBuilder, ReserveYearType,
    SessionGuard, StockCode, TabularResult, TradeDate, ValidationError, YearType,
};

/// [`DataSource`] backed by a provider client through the fetch pipeline.
pub struct ProviderDataSource<P> {
    guard: SessionGuard<P>,
}

impl<P: ProviderClient> ProviderDataSource<P> {
    pub fn new(provider: P) -> Self {
        Self {
            guard: SessionGuard::new(provider),
        }
    }

    pub fn with_config(provider: P, config: &DataConfig) -> Self {
        Self {
            guard: SessionGuard::with_config(provider, config),
        }
    }

    pub fn guard(&self) -> &SessionGuard<P> {
        &self.guard
    }

    pub fn provider(&self) -> &P {
        self.guard.provider()
    }
}

/// Builder for a stock keyed over a required date range.
fn stock_range(
    kind: DatasetKind,
    code: &str,
    start_date: &str,
    end_date: &str,
) -> Result<QueryDescriptorBuilder, DataError> {
    let operation = kind.as_str();
    let code = StockCode::parse(code).map_err(|err| rejected(operation, err))?;
    let start = TradeDate::parse(start_date).map_err(|err| rejected(operation, err))?;
    let end = TradeDate::parse(end_date).map_err(|err| rejected(operation, err))?;

    Ok(QueryDescriptor::builder(kind)
        .stock(code)
        .range(Some(start), Some(end)))
}

impl<P: ProviderClient> DataSource for ProviderDataSource<P> {
    fn historical_k_data(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
        options: &KDataOptions,
    ) -> Result<TabularResult, DataError> {
        let operation = DatasetKind::KData.as_str();
        let fields = match options.fields.as_deref() {
            None | Some([]) => FieldList::k_defaults(),
            Some(names) => FieldList::new(names).map_err(|err| rejected(operation, err))?,
        };
        debug!(fields = %fields.joined(), "requesting k-line fields");

        let query = stock_range(DatasetKind::KData, code, start_date, end_date)?
            .param("fields", fields.joined())
            .param("frequency", options.frequency.as_str())
            .param("adjustflag", options.adjust_flag.as_str())
            .build();
        fetch_table(&self.guard, &query)
    }

    fn stock_basic_info(
        &self,
        code: &str,
        fields: Option<&[String]>,
    ) -> Result<TabularResult, DataError> {
        let operation = DatasetKind::BasicInfo.as_str();
        let code = StockCode::parse(code).map_err(|err| rejected(operation, err))?;
        let requested = match fields {
            None | Some([]) => None,
            Some(names) => Some(FieldList::new(names).map_err(|err| rejected(operation, err))?),
        };

        let query = QueryDescriptor::builder(DatasetKind::BasicInfo)
            .stock(code)
            .build();
        let table = fetch_table(&self.guard, &query)?;

        let Some(requested) = requested else {
            return Ok(table);
        };
        let selected = table.select(requested.as_slice());
        if selected.columns().is_empty() {
            return Err(rejected(
                operation,
                ValidationError::NoMatchingFields {
                    requested: requested.as_slice().to_vec(),
                },
            ));
        }
        debug!(columns = ?selected.columns(), "selected basic info columns");
        Ok(selected)
    }

    fn dividend_data(
        &self,
        code: &str,
        year: &str,
        year_type: YearType,
    ) -> Result<TabularResult, DataError> {
        let operation = DatasetKind::Dividend.as_str();
        let code = StockCode::parse(code).map_err(|err| rejected(operation, err))?;
        let year = validate_year(year).map_err(|err| rejected(operation, err))?;

        let query = QueryDescriptor::builder(DatasetKind::Dividend)
            .stock(code)
            .year(year)
            .param("yearType", year_type.as_str())
            .build();
        fetch_table(&self.guard, &query)
    }

    fn adjust_factor_data(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<TabularResult, DataError> {
        let query = stock_range(DatasetKind::AdjustFactor, code, start_date, end_date)?.build();
        fetch_table(&self.guard, &query)
    }

    fn profit_data(&self, code: &str, year: &str, quarter: u32) -> Result<TabularResult, DataError> {
        fetch_periodic_report(&self.guard, DatasetKind::Profit, code, year, quarter)
    }

    fn operation_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<TabularResult, DataError> {
        fetch_periodic_report(&self.guard, DatasetKind::Operation, code, year, quarter)
    }

    fn growth_data(&self, code: &str, year: &str, quarter: u32) -> Result<TabularResult, DataError> {
        fetch_periodic_report(&self.guard, DatasetKind::Growth, code, year, quarter)
    }

    fn balance_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<TabularResult, DataError> {
        fetch_periodic_report(&self.guard, DatasetKind::Balance, code, year, quarter)
    }

    fn cash_flow_data(
        &self,
        code: &str,
        year: &str,
        quarter: u32,
    ) -> Result<TabularResult, DataError> {
        fetch_periodic_report(&self.guard, DatasetKind::CashFlow, code, year, quarter)
    }

    fn dupont_data(&self, code: &str, year: &str, quarter: u32) -> Result<TabularResult, DataError> {
        fetch_periodic_report(&self.guard, DatasetKind::Dupont, code, year, quarter)
    }

    fn performance_express_report(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<TabularResult, DataError> {
        let query =
            stock_range(DatasetKind::PerformanceExpress, code, start_date, end_date)?.build();
        fetch_table(&self.guard, &query)
    }

    fn forecast_report(
        &self,
        code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<TabularResult, DataError> {
        let query = stock_range(DatasetKind::Forecast, code, start_date, end_date)?.build();
        fetch_table(&self.guard, &query)
    }

    fn stock_industry(
        &self,
        code: Option<&str>,
        date: Option<&str>,
    ) -> Result<TabularResult, DataError> {
        let operation = DatasetKind::StockIndustry.as_str();
        let code = parse_optional(code, StockCode::parse).map_err(|err| rejected(operation, err))?;
        let date = parse_optional(date, TradeDate::parse).map_err(|err| rejected(operation, err))?;

        let query = QueryDescriptor::builder(DatasetKind::StockIndustry)
            .maybe_stock(code)
            .day(date)
            .build();
        fetch_table(&self.guard, &query)
    }

    fn sz50_stocks(&self, date: Option<&str>) -> Result<TabularResult, DataError> {
        fetch_constituents(&self.guard, IndexKind::Sz50, date)
    }

    fn hs300_stocks(&self, date: Option<&str>) -> Result<TabularResult, DataError> {
        fetch_constituents(&self.guard, IndexKind::Hs300, date)
    }

    fn zz500_stocks(&self, date: Option<&str>) -> Result<TabularResult, DataError> {
        fetch_constituents(&self.guard, IndexKind::Zz500, date)
    }

    fn trade_dates(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError> {
        fetch_series(
            &self.guard,
            DatasetKind::TradeDates,
            start_date,
            end_date,
            BTreeMap::new(),
        )
    }

    fn all_stock(&self, date: Option<&str>) -> Result<TabularResult, DataError> {
        let operation = DatasetKind::AllStock.as_str();
        let date = parse_optional(date, TradeDate::parse).map_err(|err| rejected(operation, err))?;

        let query = QueryDescriptor::builder(DatasetKind::AllStock)
            .day(date)
            .build();
        fetch_table(&self.guard, &query)
    }

    fn deposit_rate_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError> {
        fetch_series(
            &self.guard,
            DatasetKind::DepositRate,
            start_date,
            end_date,
            BTreeMap::new(),
        )
    }

    fn loan_rate_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError> {
        fetch_series(
            &self.guard,
            DatasetKind::LoanRate,
            start_date,
            end_date,
            BTreeMap::new(),
        )
    }

    fn required_reserve_ratio_data(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        year_type: ReserveYearType,
    ) -> Result<TabularResult, DataError> {
        fetch_series(
            &self.guard,
            DatasetKind::ReserveRatio,
            start_date,
            end_date,
            BTreeMap::from([("yearType".to_owned(), year_type.as_str().to_owned())]),
        )
    }

    fn money_supply_data_month(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError> {
        fetch_series(
            &self.guard,
            DatasetKind::MoneySupplyMonth,
            start_date,
            end_date,
            BTreeMap::new(),
        )
    }

    fn money_supply_data_year(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<TabularResult, DataError> {
        fetch_series(
            &self.guard,
            DatasetKind::MoneySupplyYear,
            start_date,
            end_date,
            BTreeMap::new(),
        )
    }
}
