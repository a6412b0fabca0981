//! Tabular export of termbridge results.
//!
//! Rows implement [`ExportRecord`]; [`ExportWriter`] serializes them to a
//! single-sheet `.xlsx` workbook or a `.csv` file.

pub mod error;
pub mod format;
pub mod record;
pub mod writer;

pub use error::{ExportError, Result};
pub use format::{ExportFormat, file_name_for_term};
pub use record::{ExportRecord, MappingRow, ValueSetRow};
pub use writer::ExportWriter;
