use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{collections::HashMap, convert::TryFrom, time::Duration};

use crate::{
    config::PowerConfig,
    model::{Coordinates, Parameter, ParameterSeries, SeriesBundle, YearRange},
    provider::truncate_body,
};

use super::ClimateSource;

/// Daily point data from the NASA POWER API.
#[derive(Debug, Clone)]
pub struct NasaPowerSource {
    base_url: String,
    community: String,
    http: Client,
}

impl NasaPowerSource {
    pub fn new(config: &PowerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for NASA POWER")?;

        Ok(Self {
            base_url: config.base_url.clone(),
            community: config.community.clone(),
            http,
        })
    }

    fn parameter_codes() -> String {
        Parameter::all()
            .iter()
            .map(|p| p.power_code())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Deserialize)]
struct PowerHeader {
    #[serde(default)]
    fill_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    #[serde(default)]
    parameter: HashMap<String, HashMap<String, Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    #[serde(default)]
    header: Option<PowerHeader>,
    properties: PowerProperties,
}

/// Parses a POWER JSON body, treating null and fill values as absent.
pub fn parse_power_response(body: &str) -> Result<SeriesBundle> {
    let parsed: PowerResponse =
        serde_json::from_str(body).context("Failed to parse NASA POWER JSON")?;

    let fill_value = parsed.header.and_then(|h| h.fill_value);
    let mut bundle = SeriesBundle::new();

    for (code, values) in parsed.properties.parameter {
        let Ok(parameter) = Parameter::try_from(code.as_str()) else {
            tracing::debug!(%code, "ignoring unrequested POWER parameter");
            continue;
        };

        let observations = values.into_iter().filter_map(|(key, value)| {
            let value = value?;
            if fill_value.is_some_and(|fill| value == fill) {
                None
            } else {
                Some((key, value))
            }
        });

        bundle.insert(parameter, ParameterSeries::from_observations(observations));
    }

    Ok(bundle)
}

#[async_trait]
impl ClimateSource for NasaPowerSource {
    async fn fetch_daily(&self, coordinates: Coordinates, years: YearRange) -> Result<SeriesBundle> {
        tracing::debug!(%coordinates, %years, "requesting NASA POWER daily series");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("start", years.start.to_string()),
                ("end", years.end.to_string()),
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("community", self.community.clone()),
                ("parameters", Self::parameter_codes()),
                ("format", "JSON".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to NASA POWER")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read NASA POWER response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "NASA POWER request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let bundle = parse_power_response(&body)?;

        tracing::info!(
            %coordinates,
            days = bundle.series(Parameter::Temperature).len(),
            "fetched NASA POWER daily series"
        );

        Ok(bundle)
    }
}
