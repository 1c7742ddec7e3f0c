use ashare_core::{AnalysisPeriod, TradeDate, TradingCalendar};
use serde_json::json;

use crate::cli::{DayArgs, TimeframeArgs};
use crate::error::CliError;

use super::{CommandResult, Context};

const TRADING: &str = "是";
const CLOSED: &str = "否";

fn calendar(context: &Context) -> TradingCalendar<'_> {
    TradingCalendar::new(context.source(), context.clock())
}

pub fn latest(context: &Context) -> CommandResult {
    let calendar = calendar(context);
    let today = calendar.today();
    let latest = calendar.latest_trading_date();
    CommandResult::value("最近交易日", latest.to_string(), json!({ "date": latest }))
        .with_param("today", today.to_string())
}

pub fn is_trading_day(args: &DayArgs, context: &Context) -> Result<CommandResult, CliError> {
    let date = TradeDate::parse(&args.date)?;
    let trading = calendar(context).is_trading_day(date);
    let text = if trading { TRADING } else { CLOSED };
    Ok(CommandResult::value(
        "是否交易日",
        text,
        json!({ "date": date, "is_trading_day": trading }),
    )
    .with_param("date", date.to_string()))
}

pub fn previous(args: &DayArgs, context: &Context) -> Result<CommandResult, CliError> {
    let date = TradeDate::parse(&args.date)?;
    let previous = calendar(context).previous_trading_day(date);
    Ok(CommandResult::value(
        "上一交易日",
        previous.to_string(),
        json!({ "date": previous }),
    )
    .with_param("date", date.to_string()))
}

pub fn next(args: &DayArgs, context: &Context) -> Result<CommandResult, CliError> {
    let date = TradeDate::parse(&args.date)?;
    let next = calendar(context).next_trading_day(date);
    Ok(
        CommandResult::value("下一交易日", next.to_string(), json!({ "date": next }))
            .with_param("date", date.to_string()),
    )
}

pub fn timeframe(args: &TimeframeArgs, context: &Context) -> Result<CommandResult, CliError> {
    let period = AnalysisPeriod::from_keyword(&args.period);
    let calendar = calendar(context);
    let timeframe = calendar.analysis_timeframe(period);
    Ok(CommandResult::value(
        "分析时间范围",
        timeframe.to_string(),
        serde_json::to_value(&timeframe)?,
    )
    .with_param("period", period.as_str())
    .with_param("today", calendar.today().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use crate::commands::Body;

    fn text(result: CommandResult) -> String {
        match result.body {
            Body::Value { text, .. } => text,
            Body::Table(_) => panic!("expected a value"),
        }
    }

    fn day(date: &str) -> DayArgs {
        DayArgs {
            date: date.to_owned(),
        }
    }

    #[test]
    fn trading_day_answers_in_chinese() {
        let context = context("2025-01-20");
        let open = is_trading_day(&day("2025-01-06"), &context).expect("valid date");
        let closed = is_trading_day(&day("2025-01-05"), &context).expect("valid date");
        assert_eq!(text(open), "是");
        assert_eq!(text(closed), "否");
    }

    #[test]
    fn previous_skips_the_spring_festival() {
        let result = previous(&day("2025-02-05"), &context("2025-02-10")).expect("valid date");
        assert_eq!(text(result), "2025-01-27");
    }

    #[test]
    fn malformed_date_is_a_usage_error() {
        let err = next(&day("2025/01/06"), &context("2025-01-20")).expect_err("must fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn latest_uses_the_pinned_clock() {
        let result = latest(&context("2025-01-12"));
        assert_eq!(result.params["today"], "2025-01-12");
        assert_eq!(text(result), "2025-01-10");
    }

    #[test]
    fn timeframe_renders_label_and_bounds() {
        let args = TimeframeArgs {
            period: "recent".to_owned(),
        };
        let result = timeframe(&args, &context("2025-03-10")).expect("timeframe");
        assert_eq!(
            text(result),
            "2025年1月-2月-3月 (ISO: 2025-01-01 to 2025-03-10)"
        );
    }
}
