use crate::{
    climatology::extract::CalendarDaySamples,
    model::{AggregateStatistics, SampleCounts, SampleSet},
};

/// Reduces the four sample sets to means and a rain probability.
///
/// Empty sets yield 0.0; the returned sample counts record which figures are
/// backed by data.
pub fn aggregate(samples: &CalendarDaySamples) -> AggregateStatistics {
    AggregateStatistics {
        temperature_mean_c: mean_or_zero(&samples.temperature),
        wind_mean_mps: mean_or_zero(&samples.wind),
        humidity_mean_pct: mean_or_zero(&samples.humidity),
        rain_probability_pct: rain_probability(&samples.precipitation),
        sample_counts: SampleCounts {
            temperature: samples.temperature.len(),
            precipitation: samples.precipitation.len(),
            wind: samples.wind.len(),
            humidity: samples.humidity.len(),
        },
    }
}

/// Arithmetic mean rounded to 2 decimals, or 0.0 for an empty set.
pub fn mean_or_zero(set: &SampleSet) -> f64 {
    if set.is_empty() {
        return 0.0;
    }
    let sum: f64 = set.samples.iter().map(|s| s.value).sum();
    round_to(sum / set.len() as f64, 2)
}

/// Percentage of years with precipitation strictly above zero, rounded to 1 decimal.
pub fn rain_probability(set: &SampleSet) -> f64 {
    if set.is_empty() {
        return 0.0;
    }
    let wet = set.samples.iter().filter(|s| s.value > 0.0).count();
    round_to(100.0 * wet as f64 / set.len() as f64, 1)
}

/// Ties go to the even neighbour, so 0.125 becomes 0.12 and 6.25 becomes 6.2.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Parameter, Sample};

    fn set(parameter: Parameter, values: &[f64]) -> SampleSet {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample {
                year: 2000 + i as i32,
                value: *v,
            })
            .collect();
        SampleSet::new(parameter, samples)
    }

    fn day(t: &[f64], p: &[f64], w: &[f64], h: &[f64]) -> CalendarDaySamples {
        CalendarDaySamples {
            temperature: set(Parameter::Temperature, t),
            precipitation: set(Parameter::Precipitation, p),
            wind: set(Parameter::Wind, w),
            humidity: set(Parameter::Humidity, h),
        }
    }

    #[test]
    fn means_are_rounded_to_two_decimals() {
        let s = set(Parameter::Temperature, &[20.0, 21.0, 21.0]);
        assert_eq!(mean_or_zero(&s), 20.67);
    }

    #[test]
    fn rain_probability_counts_strictly_positive_values() {
        let s = set(Parameter::Precipitation, &[0.0, 0.1, 2.5]);
        assert_eq!(rain_probability(&s), 66.7);

        let dry = set(Parameter::Precipitation, &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(rain_probability(&dry), 0.0);

        let wet = set(Parameter::Precipitation, &[1.0, 3.0]);
        assert_eq!(rain_probability(&wet), 100.0);
    }

    #[test]
    fn rain_probability_stays_within_percent_bounds() {
        for n in 1..=25 {
            for wet in 0..=n {
                let values: Vec<f64> = (0..n).map(|i| if i < wet { 1.0 } else { 0.0 }).collect();
                let p = rain_probability(&set(Parameter::Precipitation, &values));
                assert!((0.0..=100.0).contains(&p), "{p} out of range for {wet}/{n}");
                let expected = (100.0 * wet as f64 / n as f64 * 10.0).round_ties_even() / 10.0;
                assert_eq!(p, expected);
            }
        }
    }

    #[test]
    fn exact_ties_round_to_even() {
        let mut values = vec![0.0; 16];
        values[0] = 2.0;
        assert_eq!(rain_probability(&set(Parameter::Precipitation, &values)), 6.2);

        assert_eq!(mean_or_zero(&set(Parameter::Wind, &[0.0, 0.25])), 0.12);
        assert_eq!(mean_or_zero(&set(Parameter::Temperature, &[20.0, 20.25])), 20.12);
        assert_eq!(mean_or_zero(&set(Parameter::Wind, &[0.0, 0.75])), 0.38);
    }

    #[test]
    fn empty_sets_default_to_zero() {
        let stats = aggregate(&day(&[], &[], &[], &[]));

        assert_eq!(stats.temperature_mean_c, 0.0);
        assert_eq!(stats.wind_mean_mps, 0.0);
        assert_eq!(stats.humidity_mean_pct, 0.0);
        assert_eq!(stats.rain_probability_pct, 0.0);
        assert_eq!(stats.missing_parameters().len(), 4);
    }

    #[test]
    fn empty_wind_set_only_zeroes_wind() {
        let stats = aggregate(&day(&[30.0, 32.0], &[0.0, 1.0], &[], &[70.0, 90.0]));

        assert_eq!(stats.temperature_mean_c, 31.0);
        assert_eq!(stats.rain_probability_pct, 50.0);
        assert_eq!(stats.wind_mean_mps, 0.0);
        assert_eq!(stats.humidity_mean_pct, 80.0);
        assert!(!stats.has_data(Parameter::Wind));
        assert_eq!(stats.missing_parameters(), vec![Parameter::Wind]);
    }

    #[test]
    fn implausible_values_are_taken_as_is() {
        let s = set(Parameter::Humidity, &[-10.0, 10.0, 150.0]);
        assert_eq!(mean_or_zero(&s), 50.0);
    }
}
