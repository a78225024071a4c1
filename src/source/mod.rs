//! Raw row readers for the supported input formats.
//!
//! A [`RowSource`] yields every row of the input, header included, as
//! untyped [`RawCell`]s. Typing happens later in the loader.

mod delimited;
mod workbook;

pub use delimited::DelimitedSource;
pub use workbook::WorkbookSource;

use std::path::Path;

use crate::error::{DashboardError, Result};
use crate::schema::RawCell;

pub type RawRow = Vec<RawCell>;

pub trait RowSource {
    fn read_rows(&self) -> Result<Vec<RawRow>>;
}

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Picks a reader from the file extension.
pub fn for_path(path: &Path, sheet: Option<&str>) -> Result<Box<dyn RowSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => Ok(Box::new(DelimitedSource::new(path))),
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => {
            Ok(Box::new(WorkbookSource::new(path, sheet.map(str::to_string))))
        }
        _ => Err(DashboardError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_path_dispatches_on_extension() {
        assert!(for_path(Path::new("support_uke_24.xlsx"), None).is_ok());
        assert!(for_path(Path::new("support_uke_24.XLSX"), None).is_ok());
        assert!(for_path(Path::new("export.csv"), None).is_ok());
        assert!(for_path(Path::new("export.ods"), Some("Ark1")).is_ok());
    }

    #[test]
    fn test_for_path_rejects_unknown_extension() {
        let err = for_path(Path::new("notes.txt"), None).err().unwrap();
        assert!(matches!(err, DashboardError::UnsupportedFormat { .. }));
        assert!(for_path(Path::new("no_extension"), None).is_err());
    }

    #[test]
    fn test_unsupported_format_message_lists_every_extension() {
        let message = for_path(Path::new("notes.txt"), None)
            .err()
            .unwrap()
            .to_string();
        for ext in WORKBOOK_EXTENSIONS.iter().chain(&["csv"]) {
            assert!(message.contains(&format!(".{ext}")), "{message} lacks .{ext}");
        }
    }
}
