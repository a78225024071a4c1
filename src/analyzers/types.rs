//! Value types returned by the aggregation queries.

use chrono::{Duration, NaiveTime};
use serde::{Serialize, Serializer};

use crate::analyzers::grade::NpsCategory;
use crate::analyzers::utility::pct;
use crate::time_of_day::TimeOfDay;

/// An inclusive `[start, end]` window of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBand {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeBand {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// The four two-hour reporting windows between 08:00 and 16:00.
    pub fn canonical() -> [TimeBand; 4] {
        let at = |hour: i64| NaiveTime::MIN + Duration::hours(hour);
        [
            TimeBand::new(at(8), at(10)),
            TimeBand::new(at(10), at(12)),
            TimeBand::new(at(12), at(14)),
            TimeBand::new(at(14), at(16)),
        ]
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time <= self.end
    }

    /// `08:00 -> 10:00`
    pub fn label(&self) -> String {
        format!(
            "{} -> {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Label frequencies, most frequent first. Ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueCounts {
    entries: Vec<(String, usize)>,
}

impl ValueCounts {
    /// Counts `labels`, then orders by descending count.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries: Vec<(String, usize)> = Vec::new();
        for label in labels {
            match entries.iter_mut().find(|(l, _)| l == label) {
                Some((_, count)) => *count += 1,
                None => entries.push((label.to_string(), 1)),
            }
        }
        // stable sort keeps first-seen order among equal counts
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ValueCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(label, count)| (label, count)))
    }
}

/// Category tallies over the rows that carry a satisfaction score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetPromoterScore {
    pub detractors: usize,
    pub passives: usize,
    pub promoters: usize,
    pub total: usize,
}

impl NetPromoterScore {
    /// `(promoters - detractors) / total * 100`, within `[-100, 100]`.
    pub fn score(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.promoters as f64 - self.detractors as f64) / self.total as f64 * 100.0
    }

    /// Percentage of scored rows that fall in `category`.
    pub fn share(&self, category: NpsCategory) -> f64 {
        let part = match category {
            NpsCategory::Detractor => self.detractors,
            NpsCategory::Passive => self.passives,
            NpsCategory::Promoter => self.promoters,
        };
        pct(part, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> TimeOfDay {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_canonical_bands() {
        let labels: Vec<_> = TimeBand::canonical().iter().map(TimeBand::label).collect();
        assert_eq!(
            labels,
            [
                "08:00 -> 10:00",
                "10:00 -> 12:00",
                "12:00 -> 14:00",
                "14:00 -> 16:00"
            ]
        );
    }

    #[test]
    fn test_band_is_inclusive() {
        let band = TimeBand::new(hm(8, 0), hm(10, 0));
        assert!(band.contains(hm(8, 0)));
        assert!(band.contains(hm(10, 0)));
        assert!(!band.contains(NaiveTime::from_hms_opt(10, 0, 1).unwrap()));
        assert!(!band.contains(hm(7, 59)));
    }

    #[test]
    fn test_value_counts_order() {
        let counts = ValueCounts::from_labels(["Tue", "Mon", "Mon", "Wed", "Tue", "Mon"]);
        assert_eq!(
            counts.entries(),
            &[
                ("Mon".to_string(), 3),
                ("Tue".to_string(), 2),
                ("Wed".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_value_counts_ties_keep_first_seen() {
        let counts = ValueCounts::from_labels(["Fri", "Thu", "Thu", "Fri"]);
        let labels: Vec<_> = counts.entries().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["Fri", "Thu"]);
        assert_eq!(counts.get("Thu"), Some(2));
        assert_eq!(counts.get("Sat"), None);
    }

    #[test]
    fn test_value_counts_serializes_in_order() {
        let counts = ValueCounts::from_labels(["b", "a", "a"]);
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"a":2,"b":1}"#);
        let counts = ValueCounts::from_labels(["b", "a"]);
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"b":1,"a":1}"#);
    }

    #[test]
    fn test_nps_score_and_shares() {
        let nps = NetPromoterScore {
            detractors: 1,
            passives: 1,
            promoters: 2,
            total: 4,
        };
        assert_eq!(nps.score(), 25.0);
        assert_eq!(nps.share(NpsCategory::Promoter), 50.0);
        assert_eq!(nps.share(NpsCategory::Passive), 25.0);
        assert_eq!(nps.share(NpsCategory::Detractor), 25.0);
    }
}
