pub mod snomed;
pub mod vsac;

use std::path::Path;

use anyhow::Result;
use termbridge_export::{ExportFormat, ExportRecord, ExportWriter};

use crate::output::print_success;

/// Writes rows to `path`, picking the format from its extension (xlsx by default).
pub fn write_export<R: ExportRecord>(path: &Path, rows: &[R]) -> Result<()> {
    let format = path
        .to_str()
        .and_then(ExportFormat::from_file_name)
        .unwrap_or_default();
    ExportWriter::new(format).write(path, rows)?;
    print_success(&format!("Wrote {} rows to {}", rows.len(), path.display()));
    Ok(())
}
