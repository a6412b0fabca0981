use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::format::ExportFormat;
use crate::record::ExportRecord;

/// Writes [`ExportRecord`] rows to disk in one [`ExportFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportWriter {
    format: ExportFormat,
}

impl ExportWriter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Writes a header row followed by `rows`, replacing any existing file.
    pub fn write<R: ExportRecord>(&self, path: &Path, rows: &[R]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        match self.format {
            ExportFormat::Xlsx => write_xlsx(path, rows)?,
            ExportFormat::Csv => write_csv(path, rows)?,
        }

        tracing::info!(
            path = %path.display(),
            rows = rows.len(),
            format = %self.format,
            "Export written"
        );
        Ok(())
    }
}

fn write_xlsx<R: ExportRecord>(path: &Path, rows: &[R]) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(R::SHEET_NAME)?;

    for (col, header) in R::headers().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            sheet.write_string(row_num, col as u16, cell)?;
        }
    }
    sheet.autofit();

    workbook.save(path)?;
    Ok(())
}

fn write_csv<R: ExportRecord>(path: &Path, rows: &[R]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(R::headers())?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}
