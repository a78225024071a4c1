//! Terminal charts.
//!
//! Queries produce a [`ChartData`] value; [`render`] draws it without any
//! shared plotting state, so charts can be built and drawn independently.

use serde::Serialize;
use std::io::{self, Write};

use crate::analyzers::utility::pct;
use crate::analyzers::{TimeBand, ValueCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartEntry {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub title: String,
    /// Y axis label for bars, legend title for pies.
    pub value_label: String,
    pub kind: ChartKind,
    pub entries: Vec<ChartEntry>,
}

impl ChartData {
    pub fn weekday_bar(counts: &ValueCounts) -> Self {
        Self {
            title: "Customer inquiries per weekday".to_string(),
            value_label: "Number of inquiries per day".to_string(),
            kind: ChartKind::Bar,
            entries: counts
                .entries()
                .iter()
                .map(|(label, value)| ChartEntry {
                    label: label.clone(),
                    value: *value,
                })
                .collect(),
        }
    }

    pub fn time_band_pie(bands: &[(TimeBand, usize)]) -> Self {
        Self {
            title: "Support dashboard customer inquiries".to_string(),
            value_label: "Number of inquiries between hours".to_string(),
            kind: ChartKind::Pie,
            entries: bands
                .iter()
                .map(|(band, value)| ChartEntry {
                    label: band.label(),
                    value: *value,
                })
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.value).sum()
    }
}

/// Draws `chart` to `out`, scaling bars to at most `width` characters.
pub fn render(chart: &ChartData, width: usize, out: &mut impl Write) -> io::Result<()> {
    let label_width = chart
        .entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);

    writeln!(out, "{}", chart.title)?;
    writeln!(out, "{}", chart.value_label)?;

    match chart.kind {
        ChartKind::Bar => {
            let max = chart.entries.iter().map(|e| e.value).max().unwrap_or(0);
            for entry in &chart.entries {
                let bar = "#".repeat(scaled(entry.value, max, width));
                writeln!(
                    out,
                    "{:<label_width$} | {} {}",
                    entry.label, bar, entry.value
                )?;
            }
        }
        ChartKind::Pie => {
            let total = chart.total();
            for entry in &chart.entries {
                let share = pct(entry.value, total);
                let bar = "#".repeat(scaled(entry.value, total, width));
                writeln!(
                    out,
                    "{:<label_width$} | {:>5} {:>6.2} % {}",
                    entry.label, entry.value, share, bar
                )?;
            }
        }
    }

    Ok(())
}

fn scaled(value: usize, max: usize, width: usize) -> usize {
    if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * width as f64).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn draw(chart: &ChartData, width: usize) -> Vec<String> {
        let mut buf = Vec::new();
        render(chart, width, &mut buf).unwrap();
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn bands(counts: [usize; 4]) -> Vec<(TimeBand, usize)> {
        TimeBand::canonical().into_iter().zip(counts).collect()
    }

    #[test]
    fn test_weekday_bar_keeps_count_order() {
        let counts = ValueCounts::from_labels(["Tirsdag", "Mandag", "Mandag"]);
        let chart = ChartData::weekday_bar(&counts);

        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.entries[0].label, "Mandag");
        assert_eq!(chart.total(), 3);
    }

    #[test]
    fn test_render_bar_scales_to_width() {
        let counts = ValueCounts::from_labels(["Mandag", "Mandag", "Mandag", "Mandag", "Fre"]);
        let lines = draw(&ChartData::weekday_bar(&counts), 8);

        assert_eq!(lines[1], "Number of inquiries per day");
        assert_eq!(lines[2], "Mandag | ######## 4");
        assert_eq!(lines[3], "Fre    | ## 1");
    }

    #[test]
    fn test_time_band_pie_labels() {
        let chart = ChartData::time_band_pie(&bands([1, 2, 3, 4]));
        let labels: Vec<_> = chart.entries.iter().map(|e| e.label.as_str()).collect();

        assert_eq!(
            labels,
            [
                "08:00 -> 10:00",
                "10:00 -> 12:00",
                "12:00 -> 14:00",
                "14:00 -> 16:00"
            ]
        );
        assert_eq!(chart.title, "Support dashboard customer inquiries");
    }

    #[test]
    fn test_render_pie_shares() {
        let lines = draw(&ChartData::time_band_pie(&bands([1, 1, 2, 0])), 4);

        assert_eq!(lines[2], "08:00 -> 10:00 |     1  25.00 % #");
        assert_eq!(lines[4], "12:00 -> 14:00 |     2  50.00 % ##");
        assert_eq!(lines[5], "14:00 -> 16:00 |     0   0.00 % ");
    }

    #[test]
    fn test_render_all_zero_chart() {
        let lines = draw(&ChartData::time_band_pie(&bands([0, 0, 0, 0])), 10);
        assert!(lines[2..].iter().all(|l| l.contains("  0.00 %")));

        let empty = ChartData::weekday_bar(&ValueCounts::default());
        assert_eq!(draw(&empty, 10).len(), 2);
    }

    #[test]
    fn test_custom_band_chart() {
        let start = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let end = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        let chart = ChartData::time_band_pie(&[(TimeBand::new(start, end), 5)]);
        assert_eq!(chart.entries[0].label, "09:30 -> 11:00");
    }
}
