use std::str::FromStr;

use ashare_core::{DatasetKind, ReserveYearType};

use crate::cli::{RangeArgs, ReserveRatioArgs};
use crate::error::CliError;

use super::{CommandResult, Context};

/// Rate and money supply series that take only optional bounds.
pub fn series(
    kind: DatasetKind,
    args: &RangeArgs,
    context: &Context,
) -> Result<CommandResult, CliError> {
    let source = context.source();
    let (start, end) = (args.start.as_deref(), args.end.as_deref());
    let table = match kind {
        DatasetKind::DepositRate => source.deposit_rate_data(start, end)?,
        DatasetKind::LoanRate => source.loan_rate_data(start, end)?,
        DatasetKind::MoneySupplyMonth => source.money_supply_data_month(start, end)?,
        DatasetKind::MoneySupplyYear => source.money_supply_data_year(start, end)?,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "{} is not a macro series",
                other.as_str()
            )))
        }
    };

    Ok(CommandResult::table(kind, table)
        .with_optional_param("start_date", start)
        .with_optional_param("end_date", end))
}

pub fn reserve_ratio(args: &ReserveRatioArgs, context: &Context) -> Result<CommandResult, CliError> {
    let year_type = ReserveYearType::from_str(&args.year_type)?;
    let (start, end) = (args.start.as_deref(), args.end.as_deref());
    let table = context
        .source()
        .required_reserve_ratio_data(start, end, year_type)?;

    Ok(CommandResult::table(DatasetKind::ReserveRatio, table)
        .with_optional_param("start_date", start)
        .with_optional_param("end_date", end)
        .with_param("year_type", year_type.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;

    #[test]
    fn month_series_rejects_day_precision_bounds() {
        let args = RangeArgs {
            start: Some("2024-01-15".to_owned()),
            end: None,
        };
        let err = series(DatasetKind::MoneySupplyMonth, &args, &context("2025-01-20"))
            .expect_err("must fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn reserve_ratio_records_year_type() {
        let args = ReserveRatioArgs {
            start: Some("2015-01-01".to_owned()),
            end: Some("2025-12-31".to_owned()),
            year_type: "1".to_owned(),
        };
        let result = reserve_ratio(&args, &context("2025-01-20")).expect("simulated series");
        assert_eq!(result.params["year_type"], "1");
        assert_eq!(result.dataset, Some(DatasetKind::ReserveRatio));
    }

    #[test]
    fn bad_reserve_year_type_is_a_usage_error() {
        let args = ReserveRatioArgs {
            start: None,
            end: None,
            year_type: "2".to_owned(),
        };
        let err = reserve_ratio(&args, &context("2025-01-20")).expect_err("must fail");
        assert!(matches!(err, CliError::Validation(_)));
    }
}
