//! Builds the [`InquiryTable`] from the input spreadsheet.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{DashboardError, Result};
use crate::schema::{
    CONTACT_TIME, ColumnSpec, DURATION, RawCell, SATISFACTION_SCORE, SCHEMA, Value, WEEKDAY,
};
use crate::source::{self, RawRow, RowSource};
use crate::table::{InquiryRecord, InquiryTable};

/// What to do with a row whose cell fails its column's conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedCellPolicy {
    /// Abort the whole load.
    #[default]
    Fail,
    /// Drop the row and keep going.
    SkipRow,
}

impl FromStr for MalformedCellPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "skip" | "skip_row" => Ok(Self::SkipRow),
            other => Err(format!("unknown malformed cell policy '{other}' (use fail or skip)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub path: PathBuf,
    /// Worksheet name; the first sheet when unset. Ignored for csv.
    pub sheet: Option<String>,
    /// Discard the first row. Column names always come from the schema.
    pub skip_header: bool,
    pub on_malformed: MalformedCellPolicy,
}

impl LoaderConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
            skip_header: true,
            on_malformed: MalformedCellPolicy::default(),
        }
    }
}

pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Reads the input file once and converts every row.
    ///
    /// # Errors
    ///
    /// [`DashboardError::SourceNotFound`] when the file is missing,
    /// [`DashboardError::Io`] when its existence cannot be checked, the
    /// reader's own error when it cannot be read, and
    /// [`DashboardError::UnparseableCell`] for bad cells under
    /// [`MalformedCellPolicy::Fail`].
    #[tracing::instrument(skip(self), fields(path = %self.config.path.display()))]
    pub fn load(&self) -> Result<InquiryTable> {
        if !self.config.path.try_exists()? {
            return Err(DashboardError::SourceNotFound {
                path: self.config.path.clone(),
            });
        }

        let source = source::for_path(&self.config.path, self.config.sheet.as_deref())?;
        self.load_from(source.as_ref())
    }

    /// Converts the rows of an already opened source.
    pub fn load_from(&self, source: &dyn RowSource) -> Result<InquiryTable> {
        let rows = source.read_rows()?;
        let skip = usize::from(self.config.skip_header);
        debug!(rows = rows.len(), skip_header = self.config.skip_header, "Converting rows");

        let mut records = Vec::with_capacity(rows.len().saturating_sub(skip));
        let mut skipped = 0usize;

        for (index, row) in rows.iter().enumerate().skip(skip) {
            if row.iter().all(RawCell::is_empty) {
                continue;
            }

            // 1-based, as shown by spreadsheet applications
            let row_number = index + 1;
            match convert_row(row, row_number) {
                Ok(record) => records.push(record),
                Err(e) if self.config.on_malformed == MalformedCellPolicy::SkipRow => {
                    warn!(row = row_number, error = %e, "Skipping malformed row");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(records = records.len(), skipped, "Inquiry table loaded");
        Ok(InquiryTable::from_records(records))
    }
}

static MISSING: RawCell = RawCell::Empty;

fn convert_cell(row: &RawRow, row_number: usize, column: usize) -> Result<Value> {
    let column_spec: &ColumnSpec = &SCHEMA[column];
    let cell = row.get(column).unwrap_or(&MISSING);

    if column_spec.required && cell.is_empty() {
        return Err(DashboardError::UnparseableCell {
            row: row_number,
            column: column_spec.name,
            value: String::new(),
            reason: "missing value".to_string(),
        });
    }

    column_spec.kind
        .convert(cell)
        .map_err(|e| DashboardError::UnparseableCell {
            row: row_number,
            column: column_spec.name,
            value: cell.to_string(),
            reason: e.reason,
        })
}

fn convert_row(row: &RawRow, row_number: usize) -> Result<InquiryRecord> {
    let weekday = match convert_cell(row, row_number, WEEKDAY)? {
        Value::Label(s) => s,
        other => unreachable!("weekday column produced {other:?}"),
    };
    let contact_time = match convert_cell(row, row_number, CONTACT_TIME)? {
        Value::Time(t) => t,
        other => unreachable!("contact_time column produced {other:?}"),
    };
    let duration = match convert_cell(row, row_number, DURATION)? {
        Value::Time(t) => t,
        other => unreachable!("duration column produced {other:?}"),
    };
    let satisfaction_score = match convert_cell(row, row_number, SATISFACTION_SCORE)? {
        Value::Score(s) => s,
        other => unreachable!("satisfaction_score column produced {other:?}"),
    };

    Ok(InquiryRecord {
        weekday,
        contact_time,
        duration,
        satisfaction_score,
    })
}
