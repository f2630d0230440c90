#![warn(missing_docs)]
//! Gauge Report - Presentation
//!
//! Renders estimates for people and for spreadsheets:
//! - Human-readable times and byte counts with unit auto-scaling
//! - CSV rows with exact integer fields and minimal quoting
//! - A line-buffered CSV results file
//! - Run-level report with per-benchmark status

mod csv;
mod format;
mod report;

pub use self::csv::{CsvSink, csv_columns, csv_fields, csv_header, csv_row, escape_csv_field};
pub use format::{format_bytes, format_estimate, format_time};
pub use report::{BenchmarkReportResult, BenchmarkStatus, Report, ReportSummary};

use std::path::PathBuf;
use thiserror::Error;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// CSV rows
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Errors writing report output
#[derive(Debug, Error)]
pub enum ReportError {
    /// The results file could not be created
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        /// Requested path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Writing or flushing failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}
