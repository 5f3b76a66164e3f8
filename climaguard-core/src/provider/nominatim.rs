use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::GeocoderConfig,
    model::{Coordinates, Location},
    provider::truncate_body,
};

use super::Geocoder;

/// City names that resolve to the wrong country without a hint.
const COUNTRY_HINTS: &[(&str, &str)] = &[
    ("johannesburg", "South Africa"),
    ("cape town", "South Africa"),
    ("nairobi", "Kenya"),
    ("pretoria", "South Africa"),
    ("durban", "South Africa"),
];

/// OpenStreetMap Nominatim search.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for Nominatim")?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }
}

/// Appends a country to well-known ambiguous city names.
pub fn search_query(location: &str) -> String {
    let location = location.trim();
    let lower = location.to_lowercase();

    COUNTRY_HINTS
        .iter()
        .find(|(city, _)| *city == lower)
        .map(|(_, country)| format!("{location}, {country}"))
        .unwrap_or_else(|| location.to_string())
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, query: &str) -> Result<Option<Location>> {
        let q = search_query(query);

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", q.as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .context("Failed to send request to Nominatim")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Nominatim response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Nominatim request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let places: Vec<NominatimPlace> =
            serde_json::from_str(&body).context("Failed to parse Nominatim JSON")?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = place
            .lat
            .parse()
            .with_context(|| format!("Nominatim returned invalid latitude '{}'", place.lat))?;
        let longitude: f64 = place
            .lon
            .parse()
            .with_context(|| format!("Nominatim returned invalid longitude '{}'", place.lon))?;

        Ok(Some(Location {
            coordinates: Coordinates::new(latitude, longitude),
            display_name: place.display_name.unwrap_or_else(|| query.trim().to_string()),
        }))
    }
}
