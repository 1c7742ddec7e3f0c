use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{IndexKind, ValidationError};

/// One variant per dataset the provider serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    KData,
    BasicInfo,
    Dividend,
    AdjustFactor,
    Profit,
    Operation,
    Growth,
    Balance,
    CashFlow,
    Dupont,
    PerformanceExpress,
    Forecast,
    StockIndustry,
    Sz50,
    Hs300,
    Zz500,
    TradeDates,
    AllStock,
    DepositRate,
    LoanRate,
    ReserveRatio,
    MoneySupplyMonth,
    MoneySupplyYear,
}

impl DatasetKind {
    pub const ALL: [Self; 23] = [
        Self::KData,
        Self::BasicInfo,
        Self::Dividend,
        Self::AdjustFactor,
        Self::Profit,
        Self::Operation,
        Self::Growth,
        Self::Balance,
        Self::CashFlow,
        Self::Dupont,
        Self::PerformanceExpress,
        Self::Forecast,
        Self::StockIndustry,
        Self::Sz50,
        Self::Hs300,
        Self::Zz500,
        Self::TradeDates,
        Self::AllStock,
        Self::DepositRate,
        Self::LoanRate,
        Self::ReserveRatio,
        Self::MoneySupplyMonth,
        Self::MoneySupplyYear,
    ];

    /// Quarterly ratio reports keyed by code, year and quarter.
    pub const PERIODIC_REPORTS: [Self; 6] = [
        Self::Profit,
        Self::Operation,
        Self::Growth,
        Self::Balance,
        Self::CashFlow,
        Self::Dupont,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KData => "k_data",
            Self::BasicInfo => "basic_info",
            Self::Dividend => "dividend",
            Self::AdjustFactor => "adjust_factor",
            Self::Profit => "profit",
            Self::Operation => "operation",
            Self::Growth => "growth",
            Self::Balance => "balance",
            Self::CashFlow => "cash_flow",
            Self::Dupont => "dupont",
            Self::PerformanceExpress => "performance_express",
            Self::Forecast => "forecast",
            Self::StockIndustry => "stock_industry",
            Self::Sz50 => "sz50",
            Self::Hs300 => "hs300",
            Self::Zz500 => "zz500",
            Self::TradeDates => "trade_dates",
            Self::AllStock => "all_stock",
            Self::DepositRate => "deposit_rate",
            Self::LoanRate => "loan_rate",
            Self::ReserveRatio => "reserve_ratio",
            Self::MoneySupplyMonth => "money_supply_month",
            Self::MoneySupplyYear => "money_supply_year",
        }
    }

    /// Human label used in log lines and error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::KData => "K线数据",
            Self::BasicInfo => "基本信息",
            Self::Dividend => "分红数据",
            Self::AdjustFactor => "复权因子",
            Self::Profit => "盈利能力",
            Self::Operation => "运营能力",
            Self::Growth => "成长能力",
            Self::Balance => "资产负债",
            Self::CashFlow => "现金流量",
            Self::Dupont => "杜邦指数",
            Self::PerformanceExpress => "业绩快报",
            Self::Forecast => "业绩预告",
            Self::StockIndustry => "行业分类",
            Self::Sz50 => IndexKind::Sz50.label(),
            Self::Hs300 => IndexKind::Hs300.label(),
            Self::Zz500 => IndexKind::Zz500.label(),
            Self::TradeDates => "交易日",
            Self::AllStock => "全部股票",
            Self::DepositRate => "存款利率",
            Self::LoanRate => "贷款利率",
            Self::ReserveRatio => "存款准备金率",
            Self::MoneySupplyMonth => "月度货币供应量",
            Self::MoneySupplyYear => "年度货币供应量",
        }
    }

    pub const fn is_periodic_report(self) -> bool {
        matches!(
            self,
            Self::Profit
                | Self::Operation
                | Self::Growth
                | Self::Balance
                | Self::CashFlow
                | Self::Dupont
        )
    }

    pub const fn constituents_of(index: IndexKind) -> Self {
        match index {
            IndexKind::Sz50 => Self::Sz50,
            IndexKind::Hs300 => Self::Hs300,
            IndexKind::Zz500 => Self::Zz500,
        }
    }
}

impl Display for DatasetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or(ValidationError::InvalidDataset { value: wanted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for kind in DatasetKind::ALL {
            let parsed = DatasetKind::from_str(kind.as_str()).expect("id must parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn rejects_unknown_dataset() {
        let err = DatasetKind::from_str("quotes").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDataset { .. }));
    }

    #[test]
    fn periodic_reports_are_flagged() {
        assert!(DatasetKind::PERIODIC_REPORTS
            .iter()
            .all(|kind| kind.is_periodic_report()));
        assert!(!DatasetKind::TradeDates.is_periodic_report());
        assert_eq!(DatasetKind::Profit.label(), "盈利能力");
    }

    #[test]
    fn maps_index_to_constituent_dataset() {
        assert_eq!(
            DatasetKind::constituents_of(IndexKind::Zz500),
            DatasetKind::Zz500
        );
        assert_eq!(DatasetKind::Hs300.label(), "沪深300");
    }
}
