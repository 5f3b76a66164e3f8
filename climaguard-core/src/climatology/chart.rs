use serde::{Deserialize, Serialize};

use crate::model::AggregateStatistics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
    pub color: String,
}

/// Input for the bar chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub y_label: String,
    /// Suggested upper bound of the value axis.
    pub y_max: f64,
    pub bars: Vec<ChartBar>,
}

impl ChartData {
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.bars.iter().map(|b| (b.label.as_str(), b.value)).collect()
    }
}

pub fn chart_data(stats: &AggregateStatistics) -> ChartData {
    let bar = |label: &str, value: f64, color: &str| ChartBar {
        label: label.to_string(),
        value,
        color: color.to_string(),
    };

    let bars = vec![
        bar("Rain %", stats.rain_probability_pct, "#3498db"),
        bar("Temp (°C)", stats.temperature_mean_c, "#e74c3c"),
        bar("Wind (m/s)", stats.wind_mean_mps, "#f39c12"),
        bar("Humidity %", stats.humidity_mean_pct, "#2ecc71"),
    ];

    ChartData {
        title: "Historical Weather Statistics".to_string(),
        y_label: "Values".to_string(),
        y_max: axis_upper_bound(&bars),
        bars,
    }
}

/// 20% headroom above the tallest bar, or 100 when nothing is positive.
fn axis_upper_bound(bars: &[ChartBar]) -> f64 {
    let max = bars.iter().map(|b| b.value).fold(f64::MIN, f64::max);
    if max > 0.0 { max * 1.2 } else { 100.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_follow_fixed_order() {
        let stats = AggregateStatistics {
            temperature_mean_c: 21.5,
            wind_mean_mps: 4.2,
            humidity_mean_pct: 66.0,
            rain_probability_pct: 38.1,
            ..Default::default()
        };

        let chart = chart_data(&stats);

        assert_eq!(
            chart.pairs(),
            vec![
                ("Rain %", 38.1),
                ("Temp (°C)", 21.5),
                ("Wind (m/s)", 4.2),
                ("Humidity %", 66.0),
            ]
        );
        assert!((chart.y_max - 79.2).abs() < 1e-9);
    }

    #[test]
    fn y_max_falls_back_when_all_zero() {
        let chart = chart_data(&AggregateStatistics::default());
        assert_eq!(chart.y_max, 100.0);
    }

    #[test]
    fn serialized_chart_carries_axis_bound() {
        let chart = chart_data(&AggregateStatistics {
            humidity_mean_pct: 50.0,
            ..Default::default()
        });

        let value = serde_json::to_value(&chart).unwrap();
        let y_max = value["y_max"].as_f64().unwrap();
        assert!((y_max - 60.0).abs() < 1e-9);
        assert_eq!(value["bars"].as_array().map(Vec::len), Some(4));
    }
}
