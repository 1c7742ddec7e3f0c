use std::str::FromStr;

use ashare_core::{AdjustFlag, DatasetKind, FieldList, Frequency, KDataOptions, YearType};

use crate::cli::{BasicInfoArgs, DividendArgs, KDataArgs, StockRangeArgs};
use crate::error::CliError;

use super::{CommandResult, Context};

pub fn k_data(args: &KDataArgs, context: &Context) -> Result<CommandResult, CliError> {
    let options = KDataOptions {
        frequency: Frequency::from_str(&args.frequency)?,
        adjust_flag: AdjustFlag::from_str(&args.adjust_flag)?,
        fields: requested_fields(args.fields.as_deref())?,
    };

    let table =
        context
            .source()
            .historical_k_data(&args.code, &args.start, &args.end, &options)?;

    Ok(CommandResult::table(DatasetKind::KData, table)
        .with_param("code", &args.code)
        .with_param("start_date", &args.start)
        .with_param("end_date", &args.end)
        .with_param("frequency", options.frequency.as_str())
        .with_param("adjust_flag", options.adjust_flag.as_str()))
}

pub fn basic_info(args: &BasicInfoArgs, context: &Context) -> Result<CommandResult, CliError> {
    let fields = requested_fields(args.fields.as_deref())?;
    let table = context
        .source()
        .stock_basic_info(&args.code, fields.as_deref())?;

    Ok(CommandResult::table(DatasetKind::BasicInfo, table)
        .with_param("code", &args.code)
        .with_optional_param("fields", args.fields.as_deref()))
}

pub fn dividends(args: &DividendArgs, context: &Context) -> Result<CommandResult, CliError> {
    let year_type = YearType::from_str(&args.year_type)?;
    let table = context
        .source()
        .dividend_data(&args.code, &args.year, year_type)?;

    Ok(CommandResult::table(DatasetKind::Dividend, table)
        .with_param("code", &args.code)
        .with_param("year", &args.year)
        .with_param("year_type", year_type.as_str()))
}

pub fn adjust_factors(args: &StockRangeArgs, context: &Context) -> Result<CommandResult, CliError> {
    let table = context
        .source()
        .adjust_factor_data(&args.code, &args.start, &args.end)?;

    Ok(CommandResult::table(DatasetKind::AdjustFactor, table)
        .with_param("code", &args.code)
        .with_param("start_date", &args.start)
        .with_param("end_date", &args.end))
}

/// `None` when no list was given; a given list must hold at least one valid name.
fn requested_fields(raw: Option<&str>) -> Result<Option<Vec<String>>, CliError> {
    raw.map(|raw| FieldList::from_csv(raw).map(|fields| fields.as_slice().to_vec()))
        .transpose()
        .map_err(CliError::from)
}

#[cfg(test)]
mod tests {
    use ashare_core::Cell;

    use super::*;
    use crate::commands::testing::context;
    use crate::commands::Body;

    fn k_args(fields: Option<&str>) -> KDataArgs {
        KDataArgs {
            code: "sh.600000".to_owned(),
            start: "2025-01-06".to_owned(),
            end: "2025-01-10".to_owned(),
            frequency: "d".to_owned(),
            adjust_flag: "3".to_owned(),
            fields: fields.map(str::to_owned),
        }
    }

    #[test]
    fn k_data_honors_requested_fields() {
        let result = k_data(&k_args(Some("date,code,close")), &context("2025-01-20"))
            .expect("simulated bars");

        let Body::Table(table) = result.body else {
            panic!("expected a table");
        };
        assert_eq!(table.columns(), ["date", "code", "close"]);
        assert_eq!(table.len(), 5);
        assert_eq!(table.rows()[0][1], Cell::from("sh.600000"));
        assert_eq!(result.dataset, Some(DatasetKind::KData));
        assert_eq!(result.params["frequency"], "d");
    }

    #[test]
    fn k_data_rejects_unknown_frequency_before_fetching() {
        let mut args = k_args(None);
        args.frequency = "hourly".to_owned();
        let err = k_data(&args, &context("2025-01-20")).expect_err("must fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn blank_field_list_is_rejected() {
        let err = requested_fields(Some(" , ")).expect_err("must fail");
        assert!(matches!(err, CliError::Validation(_)));
        assert_eq!(requested_fields(None).expect("absent list"), None);
    }
}
