//! Calendar-day climatology: everything between a fetched [`SeriesBundle`] and
//! the numbers shown to a user.
//!
//! Every function here is pure and synchronous.
//!
//! [`SeriesBundle`]: crate::model::SeriesBundle

pub mod aggregate;
pub mod chart;
pub mod export;
pub mod extract;
pub mod risk;

pub use aggregate::aggregate;
pub use chart::{ChartBar, ChartData, chart_data};
pub use export::{ExportFormat, build_export_rows};
pub use extract::{CalendarDaySamples, extract_calendar_day, extract_samples};
pub use risk::{RiskClassifier, RiskThresholds, classify};
