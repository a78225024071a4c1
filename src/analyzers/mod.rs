//! Read-only statistics over the loaded inquiry table.
//!
//! [`Aggregator`] answers every dashboard query: duration extremes and mean,
//! inquiry counts inside time windows, weekday frequencies, and the net
//! promoter score.

pub mod aggregate;
pub mod grade;
pub mod types;
pub mod utility;

pub use aggregate::Aggregator;
pub use grade::NpsCategory;
pub use types::{NetPromoterScore, TimeBand, ValueCounts};
