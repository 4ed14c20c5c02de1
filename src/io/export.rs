use std::io::Write;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::application::{AppError, ReportSummary};
use crate::domain::{PeriodSelector, Timestamp, UnknownVariant, ViewerRole, format_cents};

use super::{RecordSet, Snapshot};

/// One row of the flat metric table handed to tabular exporters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

impl Metric {
    fn count(label: &'static str, value: usize) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }

    fn money(label: &'static str, cents: i64) -> Self {
        Self {
            label,
            value: format_cents(cents),
        }
    }
}

/// Flatten a summary into the rows each role's export shows. Nested data
/// (the per-psychologist table) is not exported.
pub fn summary_metrics(summary: &ReportSummary) -> Vec<Metric> {
    let mut metrics = match summary.role {
        ViewerRole::Admin => vec![
            Metric::count("Total appointments", summary.total_appointments),
            Metric::count("Completed appointments", summary.completed),
            Metric::count("Cancelled appointments", summary.cancelled),
            Metric::count("Pending appointments", summary.pending),
            Metric::count("Paid appointments", summary.paid_appointments),
            Metric::money("Total revenue", summary.total_revenue),
            Metric::money("Pending revenue", summary.pending_revenue),
            Metric::money("Estimated revenue", summary.estimated_revenue),
        ],
        ViewerRole::Psychologist => vec![
            Metric::count("Total appointments", summary.total_appointments),
            Metric::count("Completed appointments", summary.completed),
            Metric::count("Pending appointments", summary.pending),
            Metric::count("Unique patients", summary.unique_patients),
            Metric::money("Total revenue", summary.total_revenue),
        ],
        ViewerRole::Patient => vec![
            Metric::count("Total sessions", summary.total_appointments),
            Metric::count("Completed sessions", summary.completed),
            Metric::money("Total spent", summary.total_spent),
            Metric::money("Pending payment", summary.pending_to_pay),
        ],
    };
    metrics.push(Metric {
        label: "Period",
        value: summary.period_label.clone(),
    });
    metrics
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// Tab-separated rows saved as `.xls`, which spreadsheet tools open directly.
    Spreadsheet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "xls",
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            ExportFormat::Csv => b',',
            ExportFormat::Spreadsheet => b'\t',
        }
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xls" | "excel" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            _ => Err(UnknownVariant::new("export format", s)),
        }
    }
}

/// `reporte_<role>_<period>_<YYYY-MM-DD>.<ext>`
pub fn export_file_name(
    role: ViewerRole,
    selector: PeriodSelector,
    date: NaiveDate,
    format: ExportFormat,
) -> String {
    format!(
        "reporte_{}_{}_{}.{}",
        role.slug(),
        selector.as_str(),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Write the summary's metric table. Returns the number of metric rows.
pub fn export_summary<W: Write>(
    summary: &ReportSummary,
    format: ExportFormat,
    writer: W,
) -> Result<usize, AppError> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer);

    out.write_record(["Metric", "Value"])?;

    let metrics = summary_metrics(summary);
    for metric in &metrics {
        out.write_record([metric.label, metric.value.as_str()])?;
    }

    out.flush()?;
    Ok(metrics.len())
}

/// Write a record set as a snapshot file `load_snapshot` can read back.
pub fn write_snapshot<W: Write>(
    records: &RecordSet,
    exported_at: Timestamp,
    mut writer: W,
) -> Result<(), AppError> {
    let snapshot = Snapshot {
        exported_at: Some(exported_at),
        appointments: records
            .appointments
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?,
        payments: records
            .payments
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?,
    };

    let json = serde_json::to_string_pretty(&snapshot)?;
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    Ok(())
}
