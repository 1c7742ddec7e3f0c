//! Core contracts for ashare.
//!
//! This crate contains:
//! - Validated domain values and the dataset catalogue
//! - The provider seam, session guard and shared fetch pipeline
//! - The classified error taxonomy and the data source facade
//! - Trading-calendar reasoning and market screens
//! - Scripted and simulated providers
//! - Response envelope for machine-readable output

pub mod adapters;
pub mod calendar;
pub mod classify;
pub mod config;
pub mod data_source;
pub mod dataset;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod facade;
pub mod fetch;
pub mod provider;
pub mod query;
pub mod screens;
pub mod session;
mod stdio;
pub mod table;

pub use adapters::{ProviderCall, ScriptedProvider, ScriptedResponse, SimulatedProvider};
pub use calendar::{
    analysis_timeframe_at, AnalysisPeriod, AnalysisTimeframe, Clock, FixedClock, SystemClock,
    TradingCalendar,
};
pub use config::{ConfigError, DataConfig};
pub use data_source::{DataError, DataErrorKind, DataSource, KDataOptions};
pub use dataset::DatasetKind;
pub use domain::{
    validate_year, AdjustFlag, FieldList, Frequency, IndexKind, ReportPeriod, ReserveYearType,
    StockCode, TradeDate, UtcDateTime, YearMonth, YearType, DEFAULT_K_FIELDS,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ValidationError};
pub use facade::ProviderDataSource;
pub use provider::{BufferedCursor, ProviderClient, ProviderFault, ProviderStatus, RowCursor};
pub use query::{QueryDescriptor, QueryDescriptorBuilder, QueryKey, TemporalScope};
pub use session::{ProviderSession, SessionGuard, SessionSlot};
pub use table::{Cell, TabularResult};
