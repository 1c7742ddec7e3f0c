use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// K-line bar frequency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    #[serde(rename = "d")]
    Daily,
    #[serde(rename = "w")]
    Weekly,
    #[serde(rename = "m")]
    Monthly,
    #[serde(rename = "5")]
    FiveMinutes,
    #[serde(rename = "15")]
    FifteenMinutes,
    #[serde(rename = "30")]
    ThirtyMinutes,
    #[serde(rename = "60")]
    SixtyMinutes,
}

impl Frequency {
    pub const ALL: [Self; 7] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "d",
            Self::Weekly => "w",
            Self::Monthly => "m",
            Self::FiveMinutes => "5",
            Self::FifteenMinutes => "15",
            Self::ThirtyMinutes => "30",
            Self::SixtyMinutes => "60",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Daily => "每日",
            Self::Weekly => "每周",
            Self::Monthly => "每月",
            Self::FiveMinutes => "5分钟",
            Self::FifteenMinutes => "15分钟",
            Self::ThirtyMinutes => "30分钟",
            Self::SixtyMinutes => "60分钟",
        }
    }

    pub const fn is_intraday(self) -> bool {
        matches!(
            self,
            Self::FiveMinutes | Self::FifteenMinutes | Self::ThirtyMinutes | Self::SixtyMinutes
        )
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "d" => Ok(Self::Daily),
            "w" => Ok(Self::Weekly),
            "m" => Ok(Self::Monthly),
            "5" => Ok(Self::FiveMinutes),
            "15" => Ok(Self::FifteenMinutes),
            "30" => Ok(Self::ThirtyMinutes),
            "60" => Ok(Self::SixtyMinutes),
            other => Err(ValidationError::InvalidFrequency {
                value: other.to_owned(),
            }),
        }
    }
}

/// Price adjustment applied to k-line data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustFlag {
    #[serde(rename = "1")]
    BackAdjusted,
    #[serde(rename = "2")]
    ForwardAdjusted,
    #[default]
    #[serde(rename = "3")]
    Unadjusted,
}

impl AdjustFlag {
    pub const ALL: [Self; 3] = [Self::BackAdjusted, Self::ForwardAdjusted, Self::Unadjusted];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackAdjusted => "1",
            Self::ForwardAdjusted => "2",
            Self::Unadjusted => "3",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::BackAdjusted => "后复权",
            Self::ForwardAdjusted => "前复权",
            Self::Unadjusted => "不复权",
        }
    }
}

impl FromStr for AdjustFlag {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "1" => Ok(Self::BackAdjusted),
            "2" => Ok(Self::ForwardAdjusted),
            "3" => Ok(Self::Unadjusted),
            other => Err(ValidationError::InvalidAdjustFlag {
                value: other.to_owned(),
            }),
        }
    }
}

/// Which date a dividend year refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearType {
    /// Year of the announcement.
    #[default]
    Report,
    /// Year of ex-dividend operation.
    Operate,
}

impl YearType {
    pub const ALL: [Self; 2] = [Self::Report, Self::Operate];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Operate => "operate",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Report => "公告年份",
            Self::Operate => "除权除息年份",
        }
    }
}

impl FromStr for YearType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(Self::Report),
            "operate" => Ok(Self::Operate),
            other => Err(ValidationError::InvalidYearType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Which date the reserve-ratio range filters on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReserveYearType {
    #[default]
    #[serde(rename = "0")]
    Announcement,
    #[serde(rename = "1")]
    Effective,
}

impl ReserveYearType {
    pub const ALL: [Self; 2] = [Self::Announcement, Self::Effective];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Announcement => "0",
            Self::Effective => "1",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Announcement => "公告日期",
            Self::Effective => "生效日期",
        }
    }
}

impl FromStr for ReserveYearType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "0" => Ok(Self::Announcement),
            "1" => Ok(Self::Effective),
            other => Err(ValidationError::InvalidReserveYearType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Index with a published constituent list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Sz50,
    Hs300,
    Zz500,
}

impl IndexKind {
    pub const ALL: [Self; 3] = [Self::Hs300, Self::Sz50, Self::Zz500];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sz50 => "sz50",
            Self::Hs300 => "hs300",
            Self::Zz500 => "zz500",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sz50 => "上证50",
            Self::Hs300 => "沪深300",
            Self::Zz500 => "中证500",
        }
    }
}

impl FromStr for IndexKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sz50" => Ok(Self::Sz50),
            "hs300" => Ok(Self::Hs300),
            "zz500" => Ok(Self::Zz500),
            other => Err(ValidationError::InvalidIndex {
                value: other.to_owned(),
            }),
        }
    }
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

impl_display_via_as_str!(Frequency, AdjustFlag, YearType, ReserveYearType, IndexKind);

/// Fiscal year plus quarter for periodic financial reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReportPeriod {
    year: String,
    quarter: u8,
}

impl ReportPeriod {
    pub fn new(year: &str, quarter: u32) -> Result<Self, ValidationError> {
        let year = validate_year(year)?;
        let quarter = match quarter {
            1..=4 => quarter as u8,
            other => return Err(ValidationError::InvalidQuarter { value: other }),
        };
        Ok(Self { year, quarter })
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub const fn quarter(&self) -> u8 {
        self.quarter
    }
}

/// Accepts exactly four ASCII digits.
pub fn validate_year(year: &str) -> Result<String, ValidationError> {
    let trimmed = year.trim();
    if trimmed.len() == 4 && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        Ok(trimmed.to_owned())
    } else {
        Err(ValidationError::InvalidYear {
            value: year.to_owned(),
        })
    }
}
