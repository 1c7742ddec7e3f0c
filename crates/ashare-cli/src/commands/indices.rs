use std::str::FromStr;

use ashare_core::{screens, DatasetKind, IndexKind};

use crate::cli::{DateArgs, IndexArgs, IndustryArgs, IndustryMembersArgs, RangeArgs, SearchArgs};
use crate::error::CliError;

use super::{CommandResult, Context};

pub fn industry(args: &IndustryArgs, context: &Context) -> Result<CommandResult, CliError> {
    let table = context
        .source()
        .stock_industry(args.code.as_deref(), args.date.as_deref())?;

    Ok(CommandResult::table(DatasetKind::StockIndustry, table)
        .with_optional_param("code", args.code.as_deref())
        .with_optional_param("date", args.date.as_deref()))
}

pub fn constituents(args: &IndexArgs, context: &Context) -> Result<CommandResult, CliError> {
    let index = IndexKind::from_str(&args.index)?;
    let table = screens::index_constituents(context.source(), index.as_str(), args.date.as_deref())?;

    let dataset = match index {
        IndexKind::Sz50 => DatasetKind::Sz50,
        IndexKind::Hs300 => DatasetKind::Hs300,
        IndexKind::Zz500 => DatasetKind::Zz500,
    };
    Ok(CommandResult::table(dataset, table)
        .with_param("index", index.as_str())
        .with_optional_param("date", args.date.as_deref()))
}

pub fn trade_dates(args: &RangeArgs, context: &Context) -> Result<CommandResult, CliError> {
    let table = context
        .source()
        .trade_dates(args.start.as_deref(), args.end.as_deref())?;

    Ok(CommandResult::table(DatasetKind::TradeDates, table)
        .with_optional_param("start_date", args.start.as_deref())
        .with_optional_param("end_date", args.end.as_deref()))
}

pub fn all_stock(args: &DateArgs, context: &Context) -> Result<CommandResult, CliError> {
    let table = context.source().all_stock(args.date.as_deref())?;
    Ok(CommandResult::table(DatasetKind::AllStock, table)
        .with_optional_param("date", args.date.as_deref()))
}

pub fn search(args: &SearchArgs, context: &Context) -> Result<CommandResult, CliError> {
    let table = screens::search_stocks(context.source(), &args.keyword, args.date.as_deref())?;
    Ok(CommandResult::labelled_table("股票搜索", table)
        .with_param("keyword", &args.keyword)
        .with_optional_param("date", args.date.as_deref()))
}

pub fn suspensions(args: &DateArgs, context: &Context) -> Result<CommandResult, CliError> {
    let table = screens::suspensions(context.source(), args.date.as_deref())?;
    Ok(CommandResult::labelled_table("停牌股票", table)
        .with_optional_param("date", args.date.as_deref()))
}

pub fn list_industries(args: &DateArgs, context: &Context) -> Result<CommandResult, CliError> {
    let table = screens::list_industries(context.source(), args.date.as_deref())?;
    Ok(CommandResult::labelled_table("行业列表", table)
        .with_optional_param("date", args.date.as_deref()))
}

pub fn industry_members(
    args: &IndustryMembersArgs,
    context: &Context,
) -> Result<CommandResult, CliError> {
    let table = screens::industry_members(context.source(), &args.industry, args.date.as_deref())?;
    Ok(CommandResult::labelled_table("行业成分股", table)
        .with_param("industry", &args.industry)
        .with_optional_param("date", args.date.as_deref()))
}
