use serde::Serialize;

use crate::model::{MonthDayKey, Parameter, ParameterSeries, Sample, SampleSet, SeriesBundle};

/// Every parameter's samples for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDaySamples {
    pub temperature: SampleSet,
    pub precipitation: SampleSet,
    pub wind: SampleSet,
    pub humidity: SampleSet,
}

impl CalendarDaySamples {
    pub fn get(&self, parameter: Parameter) -> &SampleSet {
        match parameter {
            Parameter::Temperature => &self.temperature,
            Parameter::Precipitation => &self.precipitation,
            Parameter::Wind => &self.wind,
            Parameter::Humidity => &self.humidity,
        }
    }
}

/// Collects the values whose date key ends in `month_day`, across all years.
///
/// Year filtering is left to whatever range the source returned.
pub fn extract_samples(
    parameter: Parameter,
    series: &ParameterSeries,
    month_day: MonthDayKey,
) -> SampleSet {
    let samples = series
        .iter()
        .filter(|(key, _)| month_day.matches(key))
        .filter_map(|(key, value)| {
            let year = key.get(..4)?.parse().ok()?;
            Some(Sample { year, value })
        })
        .collect();

    SampleSet::new(parameter, samples)
}

pub fn extract_calendar_day(bundle: &SeriesBundle, month_day: MonthDayKey) -> CalendarDaySamples {
    let pick = |p: Parameter| {
        let set = extract_samples(p, bundle.series(p), month_day);
        if set.is_empty() {
            tracing::warn!(parameter = %p, %month_day, "no historical samples for calendar day");
        }
        set
    };

    CalendarDaySamples {
        temperature: pick(Parameter::Temperature),
        precipitation: pick(Parameter::Precipitation),
        wind: pick(Parameter::Wind),
        humidity: pick(Parameter::Humidity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: &[(&str, f64)]) -> ParameterSeries {
        ParameterSeries::from_observations(entries.iter().map(|(k, v)| (k.to_string(), *v)))
    }

    #[test]
    fn picks_same_day_across_years_in_year_order() {
        let s = series(&[
            ("20020704", 3.0),
            ("20000704", 1.0),
            ("20000705", 9.0),
            ("20010704", 2.0),
            ("20010703", 9.0),
        ]);
        let key = MonthDayKey::new(7, 4).unwrap();

        let set = extract_samples(Parameter::Temperature, &s, key);

        assert_eq!(set.years().collect::<Vec<_>>(), vec![2000, 2001, 2002]);
        assert_eq!(set.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let s = series(&[("20000101", 1.0)]);
        let key = MonthDayKey::new(2, 29).unwrap();

        let set = extract_samples(Parameter::Wind, &s, key);

        assert!(set.is_empty());
        assert_eq!(set.parameter, Parameter::Wind);
    }

    #[test]
    fn leap_day_only_found_in_leap_years() {
        let s = series(&[("20000229", 1.0), ("20040229", 2.0), ("20010301", 5.0)]);
        let key = MonthDayKey::new(2, 29).unwrap();

        let set = extract_samples(Parameter::Humidity, &s, key);

        assert_eq!(set.years().collect::<Vec<_>>(), vec![2000, 2004]);
    }

    #[test]
    fn bundle_extraction_tolerates_missing_parameters() {
        let bundle = SeriesBundle::new()
            .with(Parameter::Temperature, series(&[("20100101", 20.0)]))
            .with(Parameter::Precipitation, series(&[("20100101", 0.0)]));
        let key = MonthDayKey::new(1, 1).unwrap();

        let samples = extract_calendar_day(&bundle, key);

        assert_eq!(samples.temperature.len(), 1);
        assert_eq!(samples.precipitation.len(), 1);
        assert!(samples.wind.is_empty());
        assert!(samples.get(Parameter::Humidity).is_empty());
    }
}
