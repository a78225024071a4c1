use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{RawRow, RowSource};
use crate::error::Result;
use crate::schema::RawCell;

/// Comma-separated export of the inquiry sheet. Every field is read as text.
pub struct DelimitedSource {
    path: PathBuf,
}

impl DelimitedSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RowSource for DelimitedSource {
    fn read_rows(&self) -> Result<Vec<RawRow>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false) // header is handled by the loader
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.trim().is_empty() {
                            RawCell::Empty
                        } else {
                            RawCell::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        debug!(path = %self.path.display(), rows = rows.len(), "Read csv rows");
        Ok(rows)
    }
}
