use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    convert::TryFrom,
    fmt,
    str::FromStr,
};

use crate::error::QueryError;

/// Daily parameters tracked for every location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Temperature,
    Precipitation,
    Wind,
    Humidity,
}

impl Parameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Precipitation => "precipitation",
            Parameter::Wind => "wind",
            Parameter::Humidity => "humidity",
        }
    }

    /// Parameter code used by the NASA POWER daily point API.
    pub fn power_code(&self) -> &'static str {
        match self {
            Parameter::Temperature => "T2M",
            Parameter::Precipitation => "PRECTOTCORR",
            Parameter::Wind => "WS10M",
            Parameter::Humidity => "RH2M",
        }
    }

    pub const fn all() -> &'static [Parameter] {
        &[
            Parameter::Temperature,
            Parameter::Precipitation,
            Parameter::Wind,
            Parameter::Humidity,
        ]
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Parameter {
    type Error = anyhow::Error;

    /// Accepts both the lowercase names and the POWER codes (including the
    /// legacy `PRECTOT`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "temperature" | "t2m" => Ok(Parameter::Temperature),
            "precipitation" | "prectotcorr" | "prectot" => Ok(Parameter::Precipitation),
            "wind" | "ws10m" => Ok(Parameter::Wind),
            "humidity" | "rh2m" => Ok(Parameter::Humidity),
            _ => Err(anyhow::anyhow!(
                "Unknown parameter '{value}'. Supported parameters: temperature, precipitation, wind, humidity."
            )),
        }
    }
}

/// Daily observations for one parameter, keyed by `YYYYMMDD`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSeries {
    values: BTreeMap<String, f64>,
}

static EMPTY_SERIES: ParameterSeries = ParameterSeries {
    values: BTreeMap::new(),
};

impl ParameterSeries {
    /// Builds a series, dropping any key that is not exactly eight ASCII digits.
    pub fn from_observations<K, I>(observations: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut values = BTreeMap::new();
        let mut rejected = 0usize;

        for (key, value) in observations {
            let key = key.into();
            if is_date_key(&key) {
                values.insert(key, value);
            } else {
                rejected += 1;
            }
        }

        if rejected > 0 {
            tracing::warn!(rejected, "dropped observations with malformed date keys");
        }

        Self { values }
    }

    pub fn get(&self, date_key: &str) -> Option<f64> {
        self.values.get(date_key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_date_key(key: &str) -> bool {
    key.len() == 8 && key.bytes().all(|b| b.is_ascii_digit())
}

/// All series fetched for one location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesBundle {
    series: HashMap<Parameter, ParameterSeries>,
}

impl SeriesBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, parameter: Parameter, series: ParameterSeries) {
        self.series.insert(parameter, series);
    }

    pub fn with(mut self, parameter: Parameter, series: ParameterSeries) -> Self {
        self.insert(parameter, series);
        self
    }

    /// Series for `parameter`; a parameter the source never returned reads as empty.
    pub fn series(&self, parameter: Parameter) -> &ParameterSeries {
        self.series.get(&parameter).unwrap_or(&EMPTY_SERIES)
    }

    pub fn contains(&self, parameter: Parameter) -> bool {
        self.series.contains_key(&parameter)
    }
}

/// Calendar day (`MMDD`) used to select the same day across years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDayKey {
    month: u32,
    day: u32,
}

impl MonthDayKey {
    pub fn new(month: u32, day: u32) -> Result<Self, QueryError> {
        // 2000 is a leap year, so Feb 29 is accepted.
        NaiveDate::from_ymd_opt(2000, month, day)
            .map(|_| Self { month, day })
            .ok_or_else(|| QueryError::InvalidDate {
                input: format!("{month:02}-{day:02}"),
            })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Full `YYYYMMDD` key for this day in `year`.
    pub fn date_key(&self, year: i32) -> String {
        format!("{year:04}{self}")
    }

    /// True when the trailing four characters of `date_key` equal this key.
    pub fn matches(&self, date_key: &str) -> bool {
        date_key.len() == 8 && date_key.get(4..) == Some(self.to_string().as_str())
    }
}

impl fmt::Display for MonthDayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.month, self.day)
    }
}

/// Parses a `YYYY-MM-DD` query date.
pub fn parse_query_date(input: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| QueryError::InvalidDate {
        input: input.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub year: i32,
    pub value: f64,
}

/// Historical values of one parameter on one calendar day, ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    pub parameter: Parameter,
    pub samples: Vec<Sample>,
}

impl SampleSet {
    pub fn new(parameter: Parameter, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.year);
        Self { parameter, samples }
    }

    pub fn empty(parameter: Parameter) -> Self {
        Self {
            parameter,
            samples: Vec::new(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.samples.iter().map(|s| s.year)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Number of historical samples behind each aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCounts {
    pub temperature: usize,
    pub precipitation: usize,
    pub wind: usize,
    pub humidity: usize,
}

impl SampleCounts {
    pub fn get(&self, parameter: Parameter) -> usize {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Precipitation => self.precipitation,
            Parameter::Wind => self.wind,
            Parameter::Humidity => self.humidity,
        }
    }
}

/// Summary of one calendar day across the fetched years.
///
/// Empty sample sets produce 0.0, so a zero here can mean either "historically
/// zero" or "no data". Check [`AggregateStatistics::has_data`] to tell them apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    pub temperature_mean_c: f64,
    pub wind_mean_mps: f64,
    pub humidity_mean_pct: f64,
    pub rain_probability_pct: f64,
    #[serde(default)]
    pub sample_counts: SampleCounts,
}

impl AggregateStatistics {
    pub fn has_data(&self, parameter: Parameter) -> bool {
        self.sample_counts.get(parameter) > 0
    }

    /// Parameters whose figure is a zero default rather than a measurement.
    pub fn missing_parameters(&self) -> Vec<Parameter> {
        Parameter::all()
            .iter()
            .copied()
            .filter(|p| !self.has_data(*p))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Safe,
    Caution,
    HighRisk,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Safe => "Safe",
            RiskTier::Caution => "Caution",
            RiskTier::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const FAVORABLE_INTERPRETATION: &str =
    "Historical data shows generally favorable conditions for this date.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub tier: RiskTier,
    pub reasons: Vec<String>,
}

impl RiskVerdict {
    /// Reasons joined with `" ; "`, or the favorable fallback.
    pub fn interpretation(&self) -> String {
        if self.reasons.is_empty() {
            FAVORABLE_INTERPRETATION.to_string()
        } else {
            self.reasons.join(" ; ")
        }
    }

    /// One-line headline, e.g. `Caution - high historical humidity`.
    pub fn recommendation(&self) -> String {
        match self.tier {
            RiskTier::Safe => "Safe - Conditions historically favorable".to_string(),
            tier => format!("{tier} - {}", self.reasons.join("; ")),
        }
    }
}

/// Raw values for one year of the target calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub year: i32,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses `"lat,lon"`; anything else (including out-of-range values) is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let (lat, lon) = input.trim().split_once(',')?;
        let latitude: f64 = lat.trim().parse().ok()?;
        let longitude: f64 = lon.trim().parse().ok()?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }

        Some(Self::new(latitude, longitude))
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: Coordinates,
    pub display_name: String,
}

impl From<Coordinates> for Location {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            display_name: coordinates.to_string(),
            coordinates,
        }
    }
}

/// Inclusive range of years requested from the climate source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> anyhow::Result<Self> {
        if start > end {
            anyhow::bail!("Invalid year range: start year {start} is after end year {end}");
        }
        Ok(Self { start, end })
    }

    /// Number of years covered; 0 for an inverted range.
    pub fn year_count(&self) -> usize {
        let span = i64::from(self.end) - i64::from(self.start) + 1;
        usize::try_from(span).unwrap_or(0)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: 2000,
            end: 2020,
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    OutdoorEvent,
    Hiking,
    Fishing,
    Farming,
    Beach,
    #[default]
    Other,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::OutdoorEvent => "outdoor_event",
            Activity::Hiking => "hiking",
            Activity::Fishing => "fishing",
            Activity::Farming => "farming",
            Activity::Beach => "beach",
            Activity::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Activity::OutdoorEvent => "Outdoor Event",
            Activity::Hiking => "Hiking",
            Activity::Fishing => "Fishing",
            Activity::Farming => "Farming",
            Activity::Beach => "Beach Day",
            Activity::Other => "Other",
        }
    }

    pub const fn all() -> &'static [Activity] {
        &[
            Activity::OutdoorEvent,
            Activity::Hiking,
            Activity::Fishing,
            Activity::Farming,
            Activity::Beach,
            Activity::Other,
        ]
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Activity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Activity::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown activity '{s}'. Supported: outdoor_event, hiking, fishing, farming, beach, other."
                )
            })
    }
}
