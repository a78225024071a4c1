use tracing::debug;

use crate::analyzers::grade::NpsCategory;
use crate::analyzers::types::{NetPromoterScore, TimeBand, ValueCounts};
use crate::analyzers::utility::mean_time;
use crate::error::{DashboardError, Result};
use crate::table::InquiryTable;
use crate::time_of_day::TimeOfDay;

/// Pure queries over a loaded [`InquiryTable`].
///
/// Every method only reads the table, so any number of aggregators may share
/// one table across threads.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    table: &'a InquiryTable,
}

impl<'a> Aggregator<'a> {
    pub fn new(table: &'a InquiryTable) -> Self {
        Self { table }
    }

    /// Number of rows in the table.
    pub fn inquiries(&self) -> usize {
        self.table.len()
    }

    fn durations(&self) -> impl Iterator<Item = TimeOfDay> + 'a {
        self.table.records().iter().map(|r| r.duration)
    }

    /// Earliest `duration` time of day.
    pub fn min_duration_time(&self) -> Result<TimeOfDay> {
        self.durations().min().ok_or(DashboardError::EmptyTable)
    }

    /// Latest `duration` time of day.
    pub fn max_duration_time(&self) -> Result<TimeOfDay> {
        self.durations().max().ok_or(DashboardError::EmptyTable)
    }

    /// Mean of the `duration` column, computed on nanoseconds since midnight.
    pub fn mean_duration_time(&self) -> Result<TimeOfDay> {
        mean_time(self.durations()).ok_or(DashboardError::EmptyTable)
    }

    /// Rows whose `contact_time` lies in `[start, end]`, both ends included.
    ///
    /// An inverted interval (`start > end`) matches nothing.
    pub fn count_between(&self, start: TimeOfDay, end: TimeOfDay) -> usize {
        let band = TimeBand::new(start, end);
        self.table
            .records()
            .iter()
            .filter(|r| band.contains(r.contact_time))
            .count()
    }

    /// Counts for the four canonical reporting windows. Each window is an
    /// independent query, so a row on a shared boundary counts twice.
    pub fn time_band_counts(&self) -> Vec<(TimeBand, usize)> {
        TimeBand::canonical()
            .into_iter()
            .map(|band| (band, self.count_between(band.start, band.end)))
            .collect()
    }

    /// Inquiries per weekday label, most frequent first.
    pub fn weekday_counts(&self) -> ValueCounts {
        ValueCounts::from_labels(self.table.records().iter().map(|r| r.weekday.as_str()))
    }

    /// Net promoter score over rows that carry a satisfaction score.
    ///
    /// # Errors
    ///
    /// [`DashboardError::EmptyDenominator`] when no row has a score.
    pub fn net_promoter_score(&self) -> Result<NetPromoterScore> {
        let mut nps = NetPromoterScore {
            detractors: 0,
            passives: 0,
            promoters: 0,
            total: 0,
        };

        for score in self
            .table
            .records()
            .iter()
            .filter_map(|r| r.satisfaction_score)
        {
            nps.total += 1;
            match NpsCategory::classify(score) {
                NpsCategory::Detractor => nps.detractors += 1,
                NpsCategory::Passive => nps.passives += 1,
                NpsCategory::Promoter => nps.promoters += 1,
            }
        }

        if nps.total == 0 {
            return Err(DashboardError::EmptyDenominator);
        }

        debug!(
            promoters = nps.promoters,
            passives = nps.passives,
            detractors = nps.detractors,
            total = nps.total,
            "Net promoter tallies"
        );
        Ok(nps)
    }
}
