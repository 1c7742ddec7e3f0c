//! # Domain Values
//!
//! Validated inputs accepted by the data access layer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StockCode`] | Canonical `sh.600000` style security code |
//! | [`TradeDate`] | Strict `YYYY-MM-DD` calendar date |
//! | [`YearMonth`] | `YYYY-MM` month for monthly macro series |
//! | [`FieldList`] | Ordered provider column names |
//! | [`Frequency`] | K-line bar frequency |
//! | [`AdjustFlag`] | Price adjustment mode |
//! | [`YearType`] | Dividend year interpretation |
//! | [`ReserveYearType`] | Reserve-ratio date interpretation |
//! | [`IndexKind`] | Index with a constituent list |
//! | [`ReportPeriod`] | Year plus quarter for periodic reports |
//!
//! Every constructor rejects malformed input with a [`ValidationError`](crate::ValidationError)
//! before any provider round trip happens.

mod code;
mod date;
mod fields;
mod params;

pub use code::StockCode;
pub use date::{TradeDate, UtcDateTime, YearMonth};
pub use fields::{FieldList, DEFAULT_K_FIELDS};
pub use params::{
    validate_year, AdjustFlag, Frequency, IndexKind, ReportPeriod, ReserveYearType, YearType,
};
