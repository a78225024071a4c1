use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{RawRow, RowSource};
use crate::error::{DashboardError, Result};
use crate::schema::RawCell;

/// Excel or OpenDocument workbook, read from a single worksheet.
pub struct WorkbookSource {
    path: PathBuf,
    sheet: Option<String>,
}

impl WorkbookSource {
    /// `sheet` defaults to the first worksheet in the workbook.
    pub fn new(path: &Path, sheet: Option<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            sheet,
        }
    }
}

impl RowSource for WorkbookSource {
    fn read_rows(&self) -> Result<Vec<RawRow>> {
        let mut workbook = open_workbook_auto(&self.path)?;

        let range = match &self.sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|s| s == name) {
                    return Err(DashboardError::SheetNotFound {
                        sheet: name.clone(),
                    });
                }
                workbook.worksheet_range(name)?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| DashboardError::SheetNotFound {
                    sheet: "<first>".to_string(),
                })??,
        };

        let rows: Vec<RawRow> = range
            .rows()
            .map(|row| row.iter().map(to_raw_cell).collect())
            .collect();

        debug!(
            path = %self.path.display(),
            sheet = self.sheet.as_deref().unwrap_or("<first>"),
            rows = rows.len(),
            "Read worksheet rows"
        );
        Ok(rows)
    }
}

fn to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => RawCell::Serial(dt.as_f64()),
        Data::Error(e) => RawCell::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnKind, Value};
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveTime;

    #[test]
    fn test_to_raw_cell() {
        assert_eq!(to_raw_cell(&Data::Empty), RawCell::Empty);
        assert_eq!(to_raw_cell(&Data::Int(7)), RawCell::Int(7));
        assert_eq!(to_raw_cell(&Data::Float(0.5)), RawCell::Float(0.5));
        assert_eq!(
            to_raw_cell(&Data::String("Fredag".into())),
            RawCell::Text("Fredag".into())
        );
        assert_eq!(
            to_raw_cell(&Data::DateTimeIso("2024-06-14T10:15:00".into())),
            RawCell::Text("2024-06-14T10:15:00".into())
        );
        assert!(matches!(
            to_raw_cell(&Data::Error(CellErrorType::Div0)),
            RawCell::Error(_)
        ));
    }

    #[test]
    fn test_date_time_cell_becomes_serial() {
        let cell = Data::DateTime(ExcelDateTime::new(45456.336, ExcelDateTimeType::DateTime, false));

        let raw = to_raw_cell(&cell);

        assert_eq!(raw, RawCell::Serial(45456.336));
        // 0.336 of a day is 29030.4 seconds
        assert_eq!(
            ColumnKind::TimeOfDay.convert(&raw),
            Ok(Value::Time(NaiveTime::from_hms_milli_opt(8, 3, 50, 400).unwrap()))
        );
    }

    #[test]
    fn test_ods_time_cell_converts_to_time() {
        let raw = to_raw_cell(&Data::DurationIso("PT08H04M16S".into()));

        assert_eq!(raw, RawCell::Text("PT08H04M16S".into()));
        assert_eq!(
            ColumnKind::TimeOfDay.convert(&raw),
            Ok(Value::Time(NaiveTime::from_hms_opt(8, 4, 16).unwrap()))
        );
    }

    #[test]
    fn test_unreadable_workbook_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let err = WorkbookSource::new(&path, None).read_rows().unwrap_err();

        assert!(matches!(err, DashboardError::Workbook(_)));
    }
}
