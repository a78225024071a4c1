pub mod analyzers;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod render;
pub mod schema;
pub mod source;
pub mod table;
pub mod time_of_day;

pub use error::{DashboardError, Result};
