//! Request orchestration: validate the date, resolve the location, fetch the
//! series, then run the climatology engine.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    artifact::{ArtifactKey, ArtifactStore},
    climatology::{
        self, ChartData, RiskClassifier, build_export_rows, chart_data, extract_calendar_day,
    },
    config::Config,
    error::QueryError,
    model::{
        Activity, AggregateStatistics, Coordinates, ExportRow, Location, MonthDayKey,
        RiskVerdict, YearRange, parse_query_date,
    },
    provider::{ClimateSource, Geocoder, NasaPowerSource, NominatimGeocoder},
};

#[derive(Debug, Clone)]
pub struct RiskRequest {
    /// City name or `"lat,lon"`.
    pub location: String,
    /// `YYYY-MM-DD`; only month and day are used.
    pub date: String,
    pub activity: Activity,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub location: Location,
    pub query_date: NaiveDate,
    pub activity: Activity,
    pub years: YearRange,
    pub statistics: AggregateStatistics,
    pub verdict: RiskVerdict,
    pub recommendation: String,
    pub interpretation: String,
    pub chart: ChartData,
    pub chart_artifact: Option<ArtifactKey>,
}

#[derive(Debug)]
pub struct ClimateService {
    geocoder: Box<dyn Geocoder>,
    source: Box<dyn ClimateSource>,
    classifier: RiskClassifier,
    years: YearRange,
    artifacts: Option<ArtifactStore>,
}

impl ClimateService {
    pub fn new(geocoder: Box<dyn Geocoder>, source: Box<dyn ClimateSource>) -> Self {
        Self {
            geocoder,
            source,
            classifier: RiskClassifier::default(),
            years: YearRange::default(),
            artifacts: None,
        }
    }

    /// Nominatim + NASA POWER, thresholds and year range from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let geocoder = NominatimGeocoder::new(&config.geocoder)?;
        let source = NasaPowerSource::new(&config.power)?;

        Ok(Self::new(Box::new(geocoder), Box::new(source))
            .with_classifier(RiskClassifier::new(config.thresholds))
            .with_years(config.year_range()?))
    }

    pub fn with_classifier(mut self, classifier: RiskClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    pub fn with_artifacts(mut self, store: ArtifactStore) -> Self {
        self.artifacts = Some(store);
        self
    }

    /// Coordinates are used verbatim; anything else goes to the geocoder.
    pub async fn resolve_location(&self, query: &str) -> Result<Location, QueryError> {
        if let Some(coordinates) = Coordinates::parse(query) {
            return Ok(Location::from(coordinates));
        }

        match self.geocoder.resolve(query).await {
            Ok(Some(location)) => {
                tracing::debug!(%query, coordinates = %location.coordinates, "resolved location");
                Ok(location)
            }
            Ok(None) => Err(QueryError::Resolution {
                query: query.to_string(),
            }),
            Err(err) => {
                let reason = format!("{err:#}");
                tracing::warn!(%query, error = %reason, "geocoding failed");
                Err(QueryError::Resolution {
                    query: query.to_string(),
                })
            }
        }
    }

    pub async fn assess(&self, request: &RiskRequest) -> Result<RiskReport, QueryError> {
        let query_date = parse_query_date(&request.date)?;
        let month_day = MonthDayKey::from_date(query_date);
        let location = self.resolve_location(&request.location).await?;

        let bundle = self
            .source
            .fetch_daily(location.coordinates, self.years)
            .await
            .map_err(QueryError::UpstreamFetch)?;

        let samples = extract_calendar_day(&bundle, month_day);
        let statistics = climatology::aggregate(&samples);
        let verdict = self.classifier.classify(&statistics);
        let chart = chart_data(&statistics);

        let chart_artifact = match &self.artifacts {
            Some(store) => Some(store.store_chart(&chart).map_err(QueryError::Artifact)?),
            None => None,
        };

        tracing::info!(
            location = %location.display_name,
            %month_day,
            tier = %verdict.tier,
            reasons = verdict.reasons.len(),
            "assessed historical risk"
        );

        Ok(RiskReport {
            recommendation: verdict.recommendation(),
            interpretation: verdict.interpretation(),
            location,
            query_date,
            activity: request.activity,
            years: self.years,
            statistics,
            verdict,
            chart,
            chart_artifact,
        })
    }

    /// Raw per-year values for the calendar day of `date` at `coordinates`.
    pub async fn export(
        &self,
        coordinates: Coordinates,
        date: &str,
    ) -> Result<Vec<ExportRow>, QueryError> {
        let month_day = MonthDayKey::from_date(parse_query_date(date)?);

        let bundle = self
            .source
            .fetch_daily(coordinates, self.years)
            .await
            .map_err(QueryError::UpstreamFetch)?;

        let rows = build_export_rows(&bundle, month_day);
        tracing::info!(%coordinates, %month_day, rows = rows.len(), "built export rows");

        Ok(rows)
    }
}
