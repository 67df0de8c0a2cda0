//! Terminal output for rendered views.

use std::io;
use std::sync::Arc;

use anyhow::Result;
use arrow::array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::util::pretty::pretty_format_batches;
use colored::Colorize;
use tripdash_core::{BirthdayPanel, DataTable, RenderedView, DASHBOARD_TITLE};
use tripdash_sheet::{CellValue, CsvOptions};

/// Width of the longest chart bar, in characters.
const CHART_WIDTH: usize = 40;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Pretty table output (default)
    #[default]
    Table,
}

/// Print a view in the given format.
pub fn print_view(view: &RenderedView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", view.to_json()?),
        OutputFormat::Csv => print_table_csv(&view.table)?,
        OutputFormat::Table => {
            println!("{}", DASHBOARD_TITLE.cyan().bold());
            println!("{}\n", view.title.bold());

            if let Some(metric) = &view.metric {
                println!("{}: {}\n", metric.label, metric.value.to_string().green().bold());
            }
            if let Some(notice) = &view.notice {
                println!("{}", notice.yellow());
            } else {
                print_table(&view.table)?;
            }
            if let Some(chart) = view.chart.as_ref().filter(|c| !c.is_empty()) {
                println!();
                print!("{}", chart.to_text(CHART_WIDTH));
            }
            println!();
            print_birthdays(&view.birthdays);
        }
    }
    Ok(())
}

/// Print the birthday panel.
pub fn print_birthdays(panel: &BirthdayPanel) {
    println!("{}", "Aniversariantes do Mês".magenta().bold());
    if let Some(message) = panel.message() {
        let text = if matches!(panel, BirthdayPanel::ParseFailed { .. }) {
            message.red().to_string()
        } else {
            message.yellow().to_string()
        };
        println!("{text}");
        return;
    }
    for b in panel.entries() {
        println!("  • {} - {} - {}", b.name, b.formatted_date, b.phone);
    }
}

/// Print a table with arrow's pretty printer.
pub fn print_table(table: &DataTable) -> Result<()> {
    if table.headers.is_empty() {
        println!("(empty table)");
        return Ok(());
    }
    let batch = table_to_batch(table)?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}

/// Print a table as CSV, header first.
pub fn print_table_csv(table: &DataTable) -> Result<()> {
    let sheet = table.to_sheet()?;
    sheet.write_csv(io::stdout().lock(), &CsvOptions::default())?;
    Ok(())
}

/// Convert a table to a record batch. Columns holding only integers become
/// `Int64`; everything else is text.
pub fn table_to_batch(table: &DataTable) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.headers.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(table.headers.len());

    for (idx, header) in table.headers.iter().enumerate() {
        let cells: Vec<&CellValue> = table
            .rows
            .iter()
            .map(|row| row.get(idx).unwrap_or(&CellValue::Null))
            .collect();

        let is_integer = !cells.is_empty() && cells.iter().all(|c| matches!(c, CellValue::Int(_)));
        if is_integer {
            let values: Int64Array = cells.iter().map(|c| c.as_int()).collect();
            fields.push(Field::new(header, DataType::Int64, false));
            columns.push(Arc::new(values));
        } else {
            let values: StringArray = cells.iter().map(|c| Some(c.as_str())).collect();
            fields.push(Field::new(header, DataType::Utf8, true));
            columns.push(Arc::new(values));
        }
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
