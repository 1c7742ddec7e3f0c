use ashare_core::DatasetKind;

use crate::cli::{ReportArgs, StockRangeArgs};
use crate::error::CliError;

use super::{CommandResult, Context};

/// One of the six quarterly ratio reports.
pub fn report(
    kind: DatasetKind,
    args: &ReportArgs,
    context: &Context,
) -> Result<CommandResult, CliError> {
    let source = context.source();
    let (code, year, quarter) = (args.code.as_str(), args.year.as_str(), args.quarter);
    let table = match kind {
        DatasetKind::Profit => source.profit_data(code, year, quarter)?,
        DatasetKind::Operation => source.operation_data(code, year, quarter)?,
        DatasetKind::Growth => source.growth_data(code, year, quarter)?,
        DatasetKind::Balance => source.balance_data(code, year, quarter)?,
        DatasetKind::CashFlow => source.cash_flow_data(code, year, quarter)?,
        DatasetKind::Dupont => source.dupont_data(code, year, quarter)?,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "{} is not a quarterly report",
                other.as_str()
            )))
        }
    };

    Ok(CommandResult::table(kind, table)
        .with_param("code", &args.code)
        .with_param("year", &args.year)
        .with_param("quarter", args.quarter.to_string()))
}

/// Performance express reports and forecasts over a date range.
pub fn bulletin(
    kind: DatasetKind,
    args: &StockRangeArgs,
    context: &Context,
) -> Result<CommandResult, CliError> {
    let source = context.source();
    let table = match kind {
        DatasetKind::PerformanceExpress => {
            source.performance_express_report(&args.code, &args.start, &args.end)?
        }
        DatasetKind::Forecast => source.forecast_report(&args.code, &args.start, &args.end)?,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "{} is not a bulletin",
                other.as_str()
            )))
        }
    };

    Ok(CommandResult::table(kind, table)
        .with_param("code", &args.code)
        .with_param("start_date", &args.start)
        .with_param("end_date", &args.end))
}
