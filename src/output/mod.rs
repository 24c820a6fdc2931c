//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan reports.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, write_csv};
pub use json_format::{print_json, write_json};
pub use plain::{
    print_banner, print_error, print_info, print_plain, print_scan_header, print_target_summary,
    print_warning, render,
};

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::scanner::ScanReport;

/// Format and print a report according to the specified format.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Plain => print_plain(report)?,
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Csv => print_csv(report)?,
    }
    Ok(())
}
