//! Printable results for the command line.
//!
//! Supports plain text lines, pretty-printing and JSON serialization.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::analyzers::{Aggregator, NetPromoterScore, NpsCategory, TimeBand, ValueCounts};
use crate::error::DashboardError;
use crate::time_of_day::TimeFormat;

#[derive(Debug, Serialize)]
pub struct DurationSummary {
    pub shortest: String,
    pub longest: String,
    pub mean: String,
}

#[derive(Debug, Serialize)]
pub struct NpsSummary {
    pub score: f64,
    #[serde(flatten)]
    pub tallies: NetPromoterScore,
}

/// Every dashboard statistic in one serializable value.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub inquiries: usize,
    pub time_format: String,
    /// `None` when the table is empty.
    pub duration: Option<DurationSummary>,
    pub inquiries_between: Vec<BandCount>,
    pub weekday_counts: ValueCounts,
    /// `None` when no row carries a satisfaction score.
    pub net_promoter_score: Option<NpsSummary>,
}

#[derive(Debug, Serialize)]
pub struct BandCount {
    pub band: String,
    pub count: usize,
}

impl Summary {
    pub fn collect(agg: &Aggregator<'_>, format: &TimeFormat) -> Result<Self> {
        let duration = match (
            agg.min_duration_time(),
            agg.max_duration_time(),
            agg.mean_duration_time(),
        ) {
            (Ok(min), Ok(max), Ok(mean)) => Some(DurationSummary {
                shortest: format.format(min),
                longest: format.format(max),
                mean: format.format(mean),
            }),
            (Err(DashboardError::EmptyTable), _, _) => None,
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return Err(e.into()),
        };

        let net_promoter_score = match agg.net_promoter_score() {
            Ok(tallies) => Some(NpsSummary {
                score: tallies.score(),
                tallies,
            }),
            Err(DashboardError::EmptyDenominator) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            inquiries: agg.inquiries(),
            time_format: format.pattern().to_string(),
            duration,
            inquiries_between: agg
                .time_band_counts()
                .into_iter()
                .map(|(band, count)| BandCount {
                    band: band.label(),
                    count,
                })
                .collect(),
            weekday_counts: agg.weekday_counts(),
            net_promoter_score,
        })
    }
}

/// Logs a summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &Summary) {
    debug!("{:#?}", summary);
}

/// Writes a summary as pretty-printed JSON.
pub fn print_json(summary: &Summary, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)?;
    Ok(())
}

/// `{"08:00 -> 10:00": 3, "10:00 -> 12:00": 0, ...}`
pub fn band_counts_line(bands: &[(TimeBand, usize)]) -> String {
    let fields: Vec<String> = bands
        .iter()
        .map(|(band, count)| format!("\"{}\": {}", band.label(), count))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

/// `NPS: 12.50 %`
pub fn nps_line(nps: &NetPromoterScore) -> String {
    format!("NPS: {:.2} %", nps.score())
}

/// Category shares, one line each.
pub fn nps_breakdown_lines(nps: &NetPromoterScore) -> Vec<String> {
    [
        ("DETRACTORS", NpsCategory::Detractor),
        ("PASSIVES", NpsCategory::Passive),
        ("PROMOTERS", NpsCategory::Promoter),
    ]
    .into_iter()
    .map(|(name, category)| format!("{name}: {:.2} %", nps.share(category)))
    .collect()
}
