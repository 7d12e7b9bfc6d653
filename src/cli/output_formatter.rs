use colored::*;
use crate::cli::cli_args::OutputFormat;
use crate::utils::{
    error::EngineError,
    types::{Aggregate, Dataset, QueryResult, Row},
};

/// Formats query results for CLI output
pub struct OutputFormatter;

impl OutputFormatter {
    /// Format query results according to the specified format
    pub fn format_result(result: &QueryResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Plain => Self::format_plain(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Csv => Self::format_csv(result),
        }
    }

    /// Format results as `label: count` lines or a ` | `-separated table
    fn format_plain(result: &QueryResult) -> String {
        if result.is_empty() {
            return "(No results)".to_string();
        }

        match result {
            QueryResult::Aggregates(aggregates) => aggregates
                .iter()
                .map(|Aggregate { label, count }| format!("{}: {}", label, count))
                .collect::<Vec<_>>()
                .join("\n"),
            QueryResult::Rows(rows) => Self::format_rows(rows),
        }
    }

    fn format_rows(rows: &[Row]) -> String {
        // Header comes from the first row
        let columns = rows[0].columns();
        let header = columns.join(" | ");

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(header.clone());
        lines.push("-".repeat(header.chars().count()));

        for row in rows {
            let cells: Vec<&str> = columns
                .iter()
                .map(|column| row.get(column).unwrap_or_default())
                .collect();
            lines.push(cells.join(" | "));
        }

        lines.join("\n")
    }

    /// Format results as a pretty JSON array
    fn format_json(result: &QueryResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "[]".to_string())
    }

    /// Format results as CSV
    fn format_csv(result: &QueryResult) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let written = match result {
            QueryResult::Rows(rows) => Self::write_csv_rows(&mut writer, rows),
            QueryResult::Aggregates(aggregates) => writer
                .write_record(aggregates.iter().map(|aggregate| aggregate.label.as_str()))
                .and_then(|_| {
                    writer.write_record(aggregates.iter().map(|aggregate| aggregate.count.to_string()))
                }),
        };

        match written.map_err(|e| e.to_string()).and_then(|_| {
            writer
                .into_inner()
                .map_err(|e| e.to_string())
                .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()))
        }) {
            Ok(output) => output,
            Err(e) => Self::format_info(&format!("Failed to render CSV: {}", e)),
        }
    }

    fn write_csv_rows(writer: &mut csv::Writer<Vec<u8>>, rows: &[Row]) -> csv::Result<()> {
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let columns = first.columns();
        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(columns.iter().map(|column| row.get(column).unwrap_or_default()))?;
        }

        Ok(())
    }

    /// Describe a loaded dataset: table name, columns and row count
    pub fn format_schema(dataset: &Dataset) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} {}\n", "Table:".bold(), dataset.table_name().cyan().bold()));
        output.push_str(&format!("Rows: {}\n", dataset.row_count()));

        output.push_str(&format!("\n{}\n", "Columns:".bold()));
        for column in dataset.columns() {
            output.push_str(&format!("  {} {}\n", "•".green(), column.cyan()));
        }

        output
    }

    /// Format error message for CLI display
    pub fn format_error(error: &EngineError) -> String {
        format!("{} {}", "Error:".red().bold(), error.to_string().red())
    }

    /// Format success message for CLI display
    pub fn format_success(message: &str) -> String {
        format!("{} {}", "Success:".green().bold(), message)
    }

    /// Format info message for CLI display
    pub fn format_info(message: &str) -> String {
        format!("{} {}", "Info:".blue().bold(), message)
    }
}
