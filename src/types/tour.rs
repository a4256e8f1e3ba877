//! Tour record input types and the bucketing configuration

use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Earliest supported statistic year
pub const MIN_YEAR: i32 = 1800;
/// Latest supported statistic year
pub const MAX_YEAR: i32 = 2999;

/// Well-known metric names used by the default metric specs
pub mod metric {
    pub const DISTANCE: &str = "distance";
    pub const ELEVATION_GAIN: &str = "elevation_gain";
    pub const DURATION: &str = "duration";
    pub const AVG_PACE: &str = "avg_pace";
    pub const AVG_SPEED: &str = "avg_speed";
    pub const BODY_WEIGHT: &str = "body_weight";
    pub const BODY_FAT: &str = "body_fat";
    pub const BATTERY: &str = "battery";
    pub const TRAINING_EFFECT_AEROB: &str = "training_effect_aerob";
    pub const TRAINING_EFFECT_ANAEROB: &str = "training_effect_anaerob";
}

/// Bucketing unit selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day
    Day,
    /// One bucket per ISO-8601 week
    Week,
    /// One bucket per calendar month
    Month,
    /// One bucket per calendar year
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

/// A contiguous span of calendar years, `first_year..=last_year()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub first_year: i32,
    pub year_count: usize,
}

impl YearRange {
    pub fn new(first_year: i32, year_count: usize) -> Self {
        Self {
            first_year,
            year_count,
        }
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + self.year_count as i32 - 1
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.first_year..=self.last_year()
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.first_year && year <= self.last_year()
    }
}

/// Active tour-type filter, part of the cache key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourTypeFilter {
    /// All tour types pass
    All,
    /// Only the listed type ids pass
    Types(Vec<i64>),
}

impl TourTypeFilter {
    pub fn matches(&self, type_id: i64) -> bool {
        match self {
            TourTypeFilter::All => true,
            TourTypeFilter::Types(ids) => ids.contains(&type_id),
        }
    }

    /// Stable, order-independent representation for cache keying.
    ///
    /// Two logically identical filters must produce the same signature,
    /// two different filters must never collide.
    pub fn signature(&self) -> String {
        match self {
            TourTypeFilter::All => "all".to_string(),
            TourTypeFilter::Types(ids) => {
                let mut sorted = ids.clone();
                sorted.sort_unstable();
                sorted.dedup();
                let parts: Vec<String> = sorted.iter().map(|id| id.to_string()).collect();
                format!("types:{}", parts.join(","))
            }
        }
    }
}

/// One recorded activity, produced and owned by the record source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourRecord {
    pub id: i64,
    #[serde(default)]
    pub person_id: i64,
    pub type_id: i64,
    /// Time-zone aware start timestamp; the local calendar date decides the bucket
    pub start: DateTime<FixedOffset>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    /// Metric name -> value; absent entries mean the device did not record them
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
}

impl TourRecord {
    /// Observed value for a metric.
    ///
    /// Zero and absent are both "not observed" and contribute neither to
    /// low/high nor to sums.
    pub fn metric(&self, name: &str) -> Option<f64> {
        match self.metrics.get(name) {
            Some(v) if *v != 0.0 => Some(*v),
            _ => None,
        }
    }
}

/// Whether a metric accumulates a per-period total or only a low/high band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSemantics {
    /// Track min/max of per-tour values within each period
    Range,
    /// Track min/max plus the per-period total
    Sum,
}

/// One metric the aggregator tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    pub semantics: MetricSemantics,
}

impl MetricSpec {
    pub fn range(name: &str) -> Self {
        Self {
            name: name.to_string(),
            semantics: MetricSemantics::Range,
        }
    }

    pub fn sum(name: &str) -> Self {
        Self {
            name: name.to_string(),
            semantics: MetricSemantics::Sum,
        }
    }
}

/// The default metric catalogue, matching the statistic chart's Y series
pub fn default_metric_specs() -> Vec<MetricSpec> {
    vec![
        MetricSpec::sum(metric::DISTANCE),
        MetricSpec::range(metric::ELEVATION_GAIN),
        MetricSpec::sum(metric::DURATION),
        MetricSpec::range(metric::AVG_PACE),
        MetricSpec::range(metric::AVG_SPEED),
        MetricSpec::range(metric::BODY_WEIGHT),
        MetricSpec::range(metric::BODY_FAT),
        MetricSpec::range(metric::BATTERY),
        MetricSpec::range(metric::TRAINING_EFFECT_AEROB),
        MetricSpec::range(metric::TRAINING_EFFECT_ANAEROB),
    ]
}
