//! Rule-based risk classification.
//!
//! Each rule is evaluated on its own and contributes a reason when it fires.
//! The tier is computed after all reasons are collected:
//! - no reasons: Safe
//! - any fired rule that escalates (heavy rain or extreme heat): HighRisk
//! - otherwise: Caution

use serde::{Deserialize, Serialize};

use crate::model::{AggregateStatistics, RiskTier, RiskVerdict};

pub const HOT_REASON: &str = "high historical mean temperature";
pub const HIGH_RAIN_REASON: &str = "high historical probability of rain";
pub const MODERATE_RAIN_REASON: &str = "moderate historical probability of rain";
pub const WIND_REASON: &str = "elevated historical wind speeds";
pub const HUMIDITY_REASON: &str = "high historical humidity";

/// Inclusive lower bounds for every rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub hot_temperature_c: f64,
    pub extreme_temperature_c: f64,
    pub high_rain_pct: f64,
    pub moderate_rain_pct: f64,
    pub windy_mps: f64,
    pub humid_pct: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            hot_temperature_c: 32.0,
            extreme_temperature_c: 35.0,
            high_rain_pct: 60.0,
            moderate_rain_pct: 40.0,
            windy_mps: 8.0,
            humid_pct: 80.0,
        }
    }
}

type Predicate = fn(&AggregateStatistics, &RiskThresholds) -> bool;

struct RiskRule {
    reason: &'static str,
    fires: Predicate,
    escalates: Predicate,
}

fn never(_: &AggregateStatistics, _: &RiskThresholds) -> bool {
    false
}

fn always(_: &AggregateStatistics, _: &RiskThresholds) -> bool {
    true
}

// Order here is the order reasons are reported in.
const RULES: &[RiskRule] = &[
    RiskRule {
        reason: HOT_REASON,
        fires: |s, t| s.temperature_mean_c >= t.hot_temperature_c,
        escalates: |s, t| s.temperature_mean_c >= t.extreme_temperature_c,
    },
    RiskRule {
        reason: HIGH_RAIN_REASON,
        fires: |s, t| s.rain_probability_pct >= t.high_rain_pct,
        escalates: always,
    },
    RiskRule {
        reason: MODERATE_RAIN_REASON,
        fires: |s, t| {
            s.rain_probability_pct >= t.moderate_rain_pct
                && s.rain_probability_pct < t.high_rain_pct
        },
        escalates: never,
    },
    RiskRule {
        reason: WIND_REASON,
        fires: |s, t| s.wind_mean_mps >= t.windy_mps,
        escalates: never,
    },
    RiskRule {
        reason: HUMIDITY_REASON,
        fires: |s, t| s.humidity_mean_pct >= t.humid_pct,
        escalates: never,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn classify(&self, stats: &AggregateStatistics) -> RiskVerdict {
        let fired: Vec<&RiskRule> = RULES
            .iter()
            .filter(|rule| (rule.fires)(stats, &self.thresholds))
            .collect();

        let tier = if fired.is_empty() {
            RiskTier::Safe
        } else if fired
            .iter()
            .any(|rule| (rule.escalates)(stats, &self.thresholds))
        {
            RiskTier::HighRisk
        } else {
            RiskTier::Caution
        };

        RiskVerdict {
            tier,
            reasons: fired.iter().map(|rule| rule.reason.to_string()).collect(),
        }
    }
}

/// Classifies with the default thresholds.
pub fn classify(stats: &AggregateStatistics) -> RiskVerdict {
    RiskClassifier::default().classify(stats)
}
