use climaguard_core::{Parameter, RiskReport};
use std::{fmt::Write, path::Path};

/// Human-readable rendering of a risk report.
pub fn render_report(report: &RiskReport, chart_path: Option<&Path>) -> String {
    let stats = &report.statistics;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Weather analysis for {} on {} ({})",
        report.location.display_name,
        report.query_date.format("%Y-%m-%d"),
        report.activity
    );
    let _ = writeln!(out, "Recommendation: {}", report.recommendation);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Historical statistics ({}, {} years)",
        report.years,
        report.years.year_count()
    );

    let rows = [
        ("Chance of rain", Parameter::Precipitation, stats.rain_probability_pct, "%"),
        ("Average temperature", Parameter::Temperature, stats.temperature_mean_c, "°C"),
        ("Average wind speed", Parameter::Wind, stats.wind_mean_mps, " m/s"),
        ("Average humidity", Parameter::Humidity, stats.humidity_mean_pct, "%"),
    ];
    for (label, parameter, value, unit) in rows {
        let note = if stats.has_data(parameter) {
            String::new()
        } else {
            " (no data)".to_string()
        };
        let _ = writeln!(out, "  {label:<20} {value}{unit}{note}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Interpretation: {}", report.interpretation);

    if let Some(path) = chart_path {
        let _ = writeln!(out, "Chart data: {}", path.display());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use climaguard_core::{
        Activity, AggregateStatistics, Coordinates, Location, RiskTier, RiskVerdict, YearRange,
        climatology::chart_data,
        model::SampleCounts,
    };

    fn report(stats: AggregateStatistics) -> RiskReport {
        let verdict = RiskVerdict {
            tier: RiskTier::Caution,
            reasons: vec!["high historical humidity".to_string()],
        };
        RiskReport {
            location: Location::from(Coordinates::new(-1.2921, 36.8219)),
            query_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            activity: Activity::Fishing,
            years: YearRange::default(),
            recommendation: verdict.recommendation(),
            interpretation: verdict.interpretation(),
            chart: chart_data(&stats),
            statistics: stats,
            verdict,
            chart_artifact: None,
        }
    }

    #[test]
    fn renders_statistics_and_flags_missing_data() {
        let stats = AggregateStatistics {
            temperature_mean_c: 24.5,
            wind_mean_mps: 0.0,
            humidity_mean_pct: 83.1,
            rain_probability_pct: 33.3,
            sample_counts: SampleCounts {
                temperature: 21,
                precipitation: 21,
                wind: 0,
                humidity: 21,
            },
        };

        let text = render_report(&report(stats), Some(Path::new("/tmp/chart-x.json")));

        assert!(text.contains("Weather analysis for -1.2921,36.8219 on 2024-04-10 (Fishing)"));
        assert!(text.contains("Recommendation: Caution - high historical humidity"));
        assert!(text.contains("Historical statistics (2000-2020, 21 years)"));
        assert!(text.contains("83.1%"));
        assert!(text.contains("0 m/s (no data)"));
        assert!(!text.contains("24.5°C (no data)"));
        assert!(text.contains("Chart data: /tmp/chart-x.json"));
    }
}
