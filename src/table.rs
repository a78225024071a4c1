//! The immutable in-memory inquiry table.

use crate::schema::Score;
use crate::time_of_day::TimeOfDay;

/// One logged customer-support contact.
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryRecord {
    pub weekday: String,
    pub contact_time: TimeOfDay,
    /// Stored as a time of day, reduced by min/max/mean.
    pub duration: TimeOfDay,
    pub satisfaction_score: Option<Score>,
}

/// Rows produced by the loader. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InquiryTable {
    records: Vec<InquiryRecord>,
}

impl InquiryTable {
    pub fn from_records(records: Vec<InquiryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[InquiryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows that carry a satisfaction score.
    pub fn scored_len(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.satisfaction_score.is_some())
            .count()
    }
}
