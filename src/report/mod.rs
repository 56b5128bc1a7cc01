pub mod console;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::models::ReportRow;

/// Output format, chosen from the report file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(anyhow::anyhow!(
                "Unsupported report extension '{}' for {} (use .xlsx, .csv or .json)",
                other,
                path.display()
            )),
        }
    }
}

/// Write all rows to `path` in one go: the fixed header once, then each row in order.
/// `title` names the worksheet for spreadsheet output.
pub fn write_report<T: ReportRow>(path: impl AsRef<Path>, title: &str, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    let format = ReportFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
    }

    match format {
        ReportFormat::Csv => write_csv(path, rows),
        ReportFormat::Xlsx => write_xlsx(path, title, rows),
        ReportFormat::Json => write_json(path, title, rows),
    }
    .with_context(|| format!("Failed to write report {}", path.display()))?;

    tracing::info!("Report saved to {} ({} rows)", path.display(), rows.len());
    Ok(())
}

fn write_csv<T: ReportRow>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(T::HEADERS)?;
    for row in rows {
        wtr.write_record(row.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_xlsx<T: ReportRow>(path: &Path, title: &str, rows: &[T]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(title))?;

    let header = Format::new().set_bold();
    let wrap = Format::new().set_text_wrap();

    for (col, name) in T::HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, cell) in row.cells().into_iter().enumerate() {
            if cell.contains('\n') {
                worksheet.write_string_with_format(r, col as u16, cell, &wrap)?;
            } else {
                worksheet.write_string(r, col as u16, cell)?;
            }
        }
    }
    worksheet.autofit();

    workbook.save(path)?;
    Ok(())
}

fn write_json<T: ReportRow>(path: &Path, title: &str, rows: &[T]) -> Result<()> {
    let doc = serde_json::json!({
        "title": title,
        "generated_at": Utc::now(),
        "rows": rows,
    });
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &doc)?;
    Ok(())
}

/// Excel sheet names are limited to 31 characters and may not contain []:*?/\
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}
