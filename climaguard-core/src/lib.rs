//! Core library for the `climaguard` CLI.
//!
//! This crate defines:
//! - The calendar-day climatology engine (samples, statistics, risk, export, chart data)
//! - Abstraction over the geocoding and climate-data collaborators
//! - Configuration, chart artifact storage and request orchestration
//!
//! It is used by `climaguard-cli`, but can also be reused by other binaries or services.

pub mod artifact;
pub mod climatology;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use artifact::{ArtifactKey, ArtifactStore};
pub use climatology::{ChartData, ExportFormat, RiskClassifier, RiskThresholds};
pub use config::Config;
pub use error::{ExportError, QueryError};
pub use model::{
    Activity, AggregateStatistics, Coordinates, ExportRow, Location, MonthDayKey, Parameter,
    ParameterSeries, RiskTier, RiskVerdict, SeriesBundle, YearRange,
};
pub use provider::{ClimateSource, Geocoder};
pub use service::{ClimateService, RiskReport, RiskRequest};
