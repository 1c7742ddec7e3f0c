use std::io::{self, Write};

use ashare_core::{
    DataError, Envelope, EnvelopeError, EnvelopeMeta, TabularResult, SCHEMA_VERSION,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::OutputFormat;
use crate::commands::{Body, CommandResult};
use crate::error::CliError;

pub fn render(
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
    limit: usize,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Markdown => write_markdown(&mut out, result, limit)?,
        OutputFormat::Json => {
            let envelope = envelope(result, limit)?;
            let payload = if pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Csv => write_csv(&mut out, result, limit)?,
    }
    out.flush()?;
    Ok(())
}

/// JSON callers get the classified failure on stdout as well as the stderr line.
pub fn render_failure(error: &DataError, pretty: bool) -> Result<(), CliError> {
    let envelope = failure_envelope(error)?;
    let payload = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{payload}")?;
    out.flush()?;
    Ok(())
}

pub fn failure_envelope(error: &DataError) -> Result<Envelope<Value>, CliError> {
    let meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), SCHEMA_VERSION)?
        .with_label(error.operation().unwrap_or("ashare"));
    Envelope::with_errors(meta, Value::Null, vec![EnvelopeError::from(error)])
        .map_err(CliError::from)
}

pub fn envelope(result: &CommandResult, limit: usize) -> Result<Envelope<Value>, CliError> {
    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), SCHEMA_VERSION)?;
    meta = match result.dataset {
        Some(dataset) => meta.with_dataset(dataset),
        None => meta.with_label(result.label.as_str()),
    };
    for (name, value) in &result.params {
        meta = meta.with_param(name.as_str(), value.as_str());
    }

    let data = match &result.body {
        Body::Table(table) => {
            let shown = table.truncated(limit);
            meta = meta.with_rows(table.len(), shown.len());
            if meta.truncated {
                meta.push_warning(format!("showing {} of {} rows", shown.len(), table.len()));
            }
            serde_json::to_value(&shown)?
        }
        Body::Value { json, .. } => json.clone(),
    };

    Ok(Envelope::success(meta, data))
}

pub fn write_markdown<W: Write>(
    out: &mut W,
    result: &CommandResult,
    limit: usize,
) -> Result<(), CliError> {
    match &result.body {
        Body::Value { text, .. } => writeln!(out, "{text}")?,
        Body::Table(table) => {
            let shown = table.truncated(limit);
            out.write_all(markdown_table(&shown).as_bytes())?;
            if shown.len() < table.len() {
                writeln!(out)?;
                writeln!(out, "Showing {} of {} rows", shown.len(), table.len())?;
            }
        }
    }
    Ok(())
}

pub fn write_csv<W: Write>(
    out: &mut W,
    result: &CommandResult,
    limit: usize,
) -> Result<(), CliError> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);
    match &result.body {
        Body::Table(table) => {
            writer.write_record(table.columns())?;
            for row in table.rows().iter().take(limit) {
                writer.write_record(row.iter().map(ToString::to_string))?;
            }
        }
        Body::Value { text, .. } => {
            writer.write_record(["value"])?;
            writer.write_record([text.as_str()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// GitHub-flavoured table; pipes inside cells are escaped.
pub fn markdown_table(table: &TabularResult) -> String {
    if table.columns().is_empty() {
        return "(no columns)\n".to_owned();
    }

    let mut rendered = String::new();
    let header: Vec<String> = table.columns().iter().map(|name| escape(name)).collect();
    rendered.push_str(&format!("| {} |\n", header.join(" | ")));
    rendered.push_str(&format!(
        "|{}|\n",
        vec!["---"; table.columns().len()].join("|")
    ));
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(|cell| escape(&cell.to_string())).collect();
        rendered.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    if table.is_empty() {
        rendered.push_str("\n(no rows)\n");
    }
    rendered
}

fn escape(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use ashare_core::DatasetKind;
    use serde_json::json;

    use super::*;

    fn result(rows: usize) -> CommandResult {
        let rows = (0..rows)
            .map(|index| vec![format!("2025-01-{:02}", index + 2), "1".to_owned()])
            .collect();
        let table = TabularResult::from_provider(
            vec!["calendar_date".to_owned(), "is_trading_day".to_owned()],
            rows,
        )
        .expect("rectangular rows");
        CommandResult::table(DatasetKind::TradeDates, table).with_param("start_date", "2025-01-02")
    }

    #[test]
    fn markdown_truncates_with_note() {
        let mut buffer = Vec::new();
        write_markdown(&mut buffer, &result(3), 2).expect("renders");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.starts_with("| calendar_date | is_trading_day |\n|---|---|\n"));
        assert_eq!(text.matches("2025-01-").count(), 2);
        assert!(text.ends_with("Showing 2 of 3 rows\n"));
    }

    #[test]
    fn markdown_escapes_pipes() {
        let table = TabularResult::from_provider(vec!["name".to_owned()], vec![vec!["a|b".to_owned()]])
            .expect("valid table");
        assert!(markdown_table(&table).contains("a\\|b"));
    }

    #[test]
    fn envelope_records_dataset_params_and_truncation() {
        let envelope = envelope(&result(3), 2).expect("valid envelope");
        assert_eq!(envelope.meta.dataset, Some(DatasetKind::TradeDates));
        assert_eq!(envelope.meta.total_rows, Some(3));
        assert!(envelope.meta.truncated);
        assert_eq!(envelope.meta.params["start_date"], "2025-01-02");
        assert_eq!(envelope.data["rows"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn csv_writes_header_and_limited_rows() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &result(3), 10).expect("renders");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(
            text,
            "calendar_date,is_trading_day\n2025-01-02,1\n2025-01-03,1\n2025-01-04,1\n"
        );
    }

    #[test]
    fn failure_envelope_carries_the_classified_error() {
        let error = DataError::no_data("no profit data found for sh.600000")
            .with_code("10002")
            .with_operation("profit");
        let envelope = failure_envelope(&error).expect("valid envelope");
        assert_eq!(envelope.meta.label.as_deref(), Some("profit"));
        assert!(envelope.data.is_null());
        assert_eq!(envelope.errors[0].code, "data.no_data");
        assert_eq!(envelope.errors[0].provider_code.as_deref(), Some("10002"));
    }

    #[test]
    fn scalar_values_render_as_text() {
        let value = CommandResult::value("是否交易日", "是", json!({ "is_trading_day": true }));
        let mut buffer = Vec::new();
        write_markdown(&mut buffer, &value, 10).expect("renders");
        assert_eq!(String::from_utf8(buffer).expect("utf8"), "是\n");
    }
}
