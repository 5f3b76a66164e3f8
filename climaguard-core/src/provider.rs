use crate::model::{Coordinates, Location, SeriesBundle, YearRange};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod nasa_power;
pub mod nominatim;

pub use nasa_power::NasaPowerSource;
pub use nominatim::NominatimGeocoder;

/// Turns a free-text place name into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// `Ok(None)` when the service answered but found nothing.
    async fn resolve(&self, query: &str) -> anyhow::Result<Option<Location>>;
}

/// Supplies multi-year daily series for a point.
#[async_trait]
pub trait ClimateSource: Send + Sync + Debug {
    async fn fetch_daily(
        &self,
        coordinates: Coordinates,
        years: YearRange,
    ) -> anyhow::Result<SeriesBundle>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
