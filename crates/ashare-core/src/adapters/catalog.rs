//! Static reference data served by [`SimulatedProvider`](super::SimulatedProvider).

use time::macros::date;
use time::{Date, Weekday};

use crate::{IndexKind, TradeDate};

/// First and last calendar year with holiday data.
pub(crate) const CALENDAR_YEARS: (i32, i32) = (2024, 2026);
/// First and last day with holiday data.
pub(crate) const COVERAGE: (Date, Date) = (date!(2024 - 01 - 01), date!(2026 - 12 - 31));

/// Weekday exchange closures.
#[rustfmt::skip]
const HOLIDAYS: &[&str] = &[
    "2024-01-01", "2024-02-09", "2024-02-12", "2024-02-13", "2024-02-14", "2024-02-15",
    "2024-02-16", "2024-04-04", "2024-04-05", "2024-05-01", "2024-05-02", "2024-05-03",
    "2024-06-10", "2024-09-16", "2024-09-17", "2024-10-01", "2024-10-02", "2024-10-03",
    "2024-10-04", "2024-10-07",
    "2025-01-01", "2025-01-28", "2025-01-29", "2025-01-30", "2025-01-31", "2025-02-03",
    "2025-02-04", "2025-04-04", "2025-05-01", "2025-05-02", "2025-05-05", "2025-06-02",
    "2025-10-01", "2025-10-02", "2025-10-03", "2025-10-06", "2025-10-07", "2025-10-08",
    "2026-01-01", "2026-01-02", "2026-02-16", "2026-02-17", "2026-02-18", "2026-02-19",
    "2026-02-20", "2026-02-23", "2026-04-06", "2026-05-01", "2026-05-04", "2026-05-05",
    "2026-06-19", "2026-09-25", "2026-10-01", "2026-10-02", "2026-10-05", "2026-10-06",
    "2026-10-07",
];

pub(crate) fn covers(date: TradeDate) -> bool {
    (CALENDAR_YEARS.0..=CALENDAR_YEARS.1).contains(&date.year())
}

/// `false` outside the covered years as well.
pub(crate) fn is_open(date: TradeDate) -> bool {
    if !covers(date) {
        return false;
    }
    let weekend = matches!(
        date.as_date().weekday(),
        Weekday::Saturday | Weekday::Sunday
    );
    !weekend && !HOLIDAYS.contains(&date.to_string().as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SecurityType {
    Stock,
    Index,
}

impl SecurityType {
    pub(crate) const fn code(self) -> &'static str {
        match self {
            Self::Stock => "1",
            Self::Index => "2",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Listing {
    pub code: &'static str,
    pub name: &'static str,
    pub industry: &'static str,
    pub ipo_date: &'static str,
    pub kind: SecurityType,
    pub indices: &'static [IndexKind],
}

impl Listing {
    pub(crate) fn ipo_year(&self) -> i32 {
        self.ipo_date
            .get(..4)
            .and_then(|year| year.parse().ok())
            .unwrap_or(CALENDAR_YEARS.0)
    }

    pub(crate) fn is_stock(&self) -> bool {
        self.kind == SecurityType::Stock
    }
}

const BANKING: &str = "J66货币金融服务";
const BEVERAGES: &str = "C15酒、饮料和精制茶制造业";
const ELECTRONICS: &str = "C39计算机、通信和其他电子设备制造业";
const ELECTRICAL: &str = "C38电气机械和器材制造业";

const SZ50_HS300: &[IndexKind] = &[IndexKind::Sz50, IndexKind::Hs300];
const HS300: &[IndexKind] = &[IndexKind::Hs300];
const ZZ500: &[IndexKind] = &[IndexKind::Zz500];

pub(crate) const LISTINGS: &[Listing] = &[
    stock("sh.600000", "浦发银行", BANKING, "1999-11-10", HS300),
    stock("sh.600030", "中信证券", "J67资本市场服务", "2003-01-06", SZ50_HS300),
    stock("sh.600036", "招商银行", BANKING, "2002-04-09", SZ50_HS300),
    stock("sh.600060", "海信视像", ELECTRONICS, "1997-04-22", ZZ500),
    stock("sh.600276", "恒瑞医药", "C27医药制造业", "2000-10-18", SZ50_HS300),
    stock("sh.600519", "贵州茅台", BEVERAGES, "2001-08-27", SZ50_HS300),
    stock("sh.600900", "长江电力", "D44电力、热力生产和供应业", "2003-11-18", SZ50_HS300),
    stock("sh.601318", "中国平安", "J68保险业", "2007-03-01", SZ50_HS300),
    stock("sh.601398", "工商银行", BANKING, "2006-10-27", SZ50_HS300),
    stock("sz.000001", "平安银行", BANKING, "1991-04-03", HS300),
    stock("sz.000002", "万科A", "K70房地产业", "1991-01-29", HS300),
    stock("sz.000009", "中国宝安", "S90综合", "1991-06-25", ZZ500),
    stock("sz.000063", "中兴通讯", ELECTRONICS, "1997-11-18", HS300),
    stock("sz.000333", "美的集团", ELECTRICAL, "2013-09-18", HS300),
    stock("sz.000858", "五粮液", BEVERAGES, "1998-04-27", HS300),
    stock("sz.002415", "海康威视", ELECTRONICS, "2010-05-28", HS300),
    stock("sz.300750", "宁德时代", ELECTRICAL, "2018-06-11", HS300),
    index("sh.000001", "上证综合指数", "1991-07-15"),
    index("sh.000300", "沪深300指数", "2005-04-08"),
    index("sz.399001", "深证成份指数", "1994-07-20"),
];

const fn stock(
    code: &'static str,
    name: &'static str,
    industry: &'static str,
    ipo_date: &'static str,
    indices: &'static [IndexKind],
) -> Listing {
    Listing {
        code,
        name,
        industry,
        ipo_date,
        kind: SecurityType::Stock,
        indices,
    }
}

const fn index(code: &'static str, name: &'static str, ipo_date: &'static str) -> Listing {
    Listing {
        code,
        name,
        industry: "",
        ipo_date,
        kind: SecurityType::Index,
        indices: &[],
    }
}

pub(crate) fn listing(code: &str) -> Option<&'static Listing> {
    LISTINGS.iter().find(|listing| listing.code == code)
}

/// `pubDate` then benchmark deposit rates in percent.
pub(crate) const DEPOSIT_RATES: &[[&str; 7]] = &[
    ["2012-06-08", "0.40", "2.85", "3.05", "3.25", "4.10", "4.65"],
    ["2012-07-06", "0.35", "2.60", "2.80", "3.00", "3.75", "4.25"],
    ["2014-11-22", "0.35", "2.35", "2.55", "2.75", "3.35", "4.00"],
    ["2015-03-01", "0.35", "2.10", "2.30", "2.50", "3.10", "3.75"],
    ["2015-05-11", "0.35", "1.85", "2.05", "2.25", "2.85", "3.50"],
    ["2015-06-28", "0.35", "1.60", "1.80", "2.00", "2.60", "3.25"],
    ["2015-08-26", "0.35", "1.35", "1.55", "1.75", "2.35", "3.00"],
    ["2015-10-24", "0.35", "1.10", "1.30", "1.50", "2.10", "2.75"],
];

/// `pubDate` then benchmark lending rates in percent.
pub(crate) const LOAN_RATES: &[[&str; 8]] = &[
    ["2012-06-08", "5.85", "6.31", "6.40", "6.65", "6.80", "4.45", "4.90"],
    ["2012-07-06", "5.60", "6.00", "6.15", "6.40", "6.55", "4.00", "4.50"],
    ["2014-11-22", "5.60", "5.60", "6.00", "6.00", "6.15", "3.75", "4.25"],
    ["2015-03-01", "5.35", "5.35", "5.75", "5.75", "5.90", "3.50", "4.00"],
    ["2015-05-11", "5.10", "5.10", "5.50", "5.50", "5.65", "3.25", "3.75"],
    ["2015-06-28", "4.85", "4.85", "5.25", "5.25", "5.40", "3.00", "3.50"],
    ["2015-08-26", "4.60", "4.60", "5.00", "5.00", "5.15", "2.75", "3.25"],
    ["2015-10-24", "4.35", "4.35", "4.75", "4.75", "4.90", "2.75", "3.25"],
];

/// `pubDate`, `effectiveDate`, then large and medium institution ratios before and after.
pub(crate) const RESERVE_RATIOS: &[[&str; 6]] = &[
    ["2019-09-06", "2019-09-16", "13.50", "13.00", "11.50", "11.00"],
    ["2020-01-01", "2020-01-06", "13.00", "12.50", "11.00", "10.50"],
    ["2021-07-09", "2021-07-15", "12.50", "12.00", "10.50", "10.00"],
    ["2021-12-06", "2021-12-15", "12.00", "11.50", "10.00", "9.50"],
    ["2022-04-15", "2022-04-25", "11.50", "11.25", "9.50", "9.25"],
    ["2022-11-25", "2022-12-05", "11.25", "11.00", "9.25", "9.00"],
    ["2023-03-17", "2023-03-27", "11.00", "10.75", "9.00", "8.75"],
    ["2023-09-14", "2023-09-15", "10.75", "10.50", "8.75", "8.50"],
    ["2024-01-24", "2024-02-05", "10.50", "10.00", "8.50", "8.00"],
    ["2024-09-27", "2024-09-27", "10.00", "9.50", "8.00", "7.50"],
    ["2025-05-07", "2025-05-15", "9.50", "9.00", "7.50", "7.00"],
];

/// First and last statistical year of the money supply series.
pub(crate) const MONEY_SUPPLY_YEARS: (i32, i32) = (2015, 2025);
