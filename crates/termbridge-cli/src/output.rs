use crate::cli::OutputFormat;
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Rows printable as a table: a header plus string cells.
pub trait TableRows {
    fn header() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

pub fn print_rows<T: Serialize + TableRows>(rows: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", render_table(rows));
            }
        }
    }
    Ok(())
}

pub fn render_table<T: TableRows>(rows: &[T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::header());
    for row in rows {
        builder.push_record(row.row());
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}
