use ashare_core::{
    AdjustFlag, Cell, Frequency, IndexKind, ReserveYearType, StockCode, TabularResult, YearType,
};
use serde_json::json;

use crate::cli::{CodeArgs, ConstantsArgs};
use crate::error::CliError;

use super::CommandResult;

const CONSTANT_KINDS: [&str; 5] = [
    "frequency",
    "adjust_flag",
    "year_type",
    "reserve_year_type",
    "index",
];

pub fn normalize_code(args: &CodeArgs) -> Result<CommandResult, CliError> {
    let code = StockCode::normalize(&args.code)?;
    Ok(CommandResult::value(
        "股票代码",
        code.as_str(),
        json!({ "input": args.code, "code": code }),
    )
    .with_param("input", &args.code))
}

/// Accepted values for every enumerated parameter, or for one kind.
pub fn constants(args: &ConstantsArgs) -> Result<CommandResult, CliError> {
    let kinds: Vec<&str> = match args.kind.as_deref().map(str::trim) {
        None | Some("") => CONSTANT_KINDS.to_vec(),
        Some(kind) if CONSTANT_KINDS.contains(&kind) => vec![kind],
        Some(kind) => {
            return Err(CliError::InvalidArgument(format!(
                "unknown constant kind '{kind}', expected one of {}",
                CONSTANT_KINDS.join(", ")
            )))
        }
    };

    let rows = kinds.iter().flat_map(|kind| entries(kind)).collect();
    let table = TabularResult::new(
        vec!["kind".to_owned(), "value".to_owned(), "description".to_owned()],
        rows,
    )?;
    Ok(CommandResult::labelled_table("参数常量", table)
        .with_optional_param("kind", args.kind.as_deref()))
}

fn entries(kind: &str) -> Vec<Vec<Cell>> {
    let pairs: Vec<(&str, &str)> = match kind {
        "frequency" => Frequency::ALL
            .iter()
            .map(|value| (value.as_str(), value.description()))
            .collect(),
        "adjust_flag" => AdjustFlag::ALL
            .iter()
            .map(|value| (value.as_str(), value.description()))
            .collect(),
        "year_type" => YearType::ALL
            .iter()
            .map(|value| (value.as_str(), value.description()))
            .collect(),
        "reserve_year_type" => ReserveYearType::ALL
            .iter()
            .map(|value| (value.as_str(), value.description()))
            .collect(),
        "index" => IndexKind::ALL
            .iter()
            .map(|value| (value.as_str(), value.label()))
            .collect(),
        _ => Vec::new(),
    };

    pairs
        .into_iter()
        .map(|(value, description)| vec![Cell::from(kind), Cell::from(value), Cell::from(description)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Body;

    #[test]
    fn normalizes_exchange_suffix_form() {
        let args = CodeArgs {
            code: "600000.SH".to_owned(),
        };
        let result = normalize_code(&args).expect("valid code");
        let Body::Value { text, json } = result.body else {
            panic!("expected a value");
        };
        assert_eq!(text, "sh.600000");
        assert_eq!(json["code"], "sh.600000");
    }

    #[test]
    fn constants_list_every_kind_by_default() {
        let result = constants(&ConstantsArgs { kind: None }).expect("constants");
        let Body::Table(table) = result.body else {
            panic!("expected a table");
        };
        assert_eq!(table.len(), 7 + 3 + 2 + 2 + 3);
        assert_eq!(table.columns(), ["kind", "value", "description"]);
    }

    #[test]
    fn unknown_constant_kind_is_rejected() {
        let err = constants(&ConstantsArgs {
            kind: Some("currency".to_owned()),
        })
        .expect_err("must fail");
        assert_eq!(err.exit_code(), 2);
    }
}
