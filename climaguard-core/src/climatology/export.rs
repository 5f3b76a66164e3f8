use std::{collections::BTreeSet, fmt, io::Write};

use crate::{
    error::ExportError,
    model::{ExportRow, MonthDayKey, Parameter, SeriesBundle},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn file_name(&self) -> String {
        format!("climaguard_export.{}", self.as_str())
    }

    /// Encodes `rows` in this format.
    pub fn encode(&self, rows: &[ExportRow]) -> Result<String, ExportError> {
        match self {
            ExportFormat::Csv => to_csv(rows),
            ExportFormat::Json => to_json(rows),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ExportFormat {
    type Error = ExportError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat(value.to_string())),
        }
    }
}

/// One row per year that has a temperature value on `month_day`, ascending.
///
/// Other parameters are looked up at the same `YYYYMMDD` key and left `None`
/// when absent; a row is never dropped.
pub fn build_export_rows(bundle: &SeriesBundle, month_day: MonthDayKey) -> Vec<ExportRow> {
    let years: BTreeSet<i32> = bundle
        .series(Parameter::Temperature)
        .iter()
        .filter(|(key, _)| month_day.matches(key))
        .filter_map(|(key, _)| key.get(..4)?.parse().ok())
        .collect();

    years
        .into_iter()
        .map(|year| {
            let key = month_day.date_key(year);
            let lookup = |p: Parameter| bundle.series(p).get(&key);
            ExportRow {
                year,
                temperature: lookup(Parameter::Temperature),
                precipitation: lookup(Parameter::Precipitation),
                wind: lookup(Parameter::Wind),
                humidity: lookup(Parameter::Humidity),
            }
        })
        .collect()
}

/// Writes `year,temperature,precipitation,wind,humidity` rows; missing values are empty fields.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    // Written explicitly so an empty export still carries the header.
    wtr.write_record(["year", "temperature", "precipitation", "wind", "humidity"])?;
    for row in rows {
        wtr.write_record([
            row.year.to_string(),
            optional_field(row.temperature),
            optional_field(row.precipitation),
            optional_field(row.wind),
            optional_field(row.humidity),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn optional_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn to_csv(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// JSON array of objects with the same keys as the CSV header; missing values are `null`.
pub fn to_json(rows: &[ExportRow]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}
