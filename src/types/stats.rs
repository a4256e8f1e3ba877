//! Aggregation output types: columnar period data plus per-tour parallel arrays

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{Granularity, MetricSemantics, YearRange};

/// Per-period columns for one tracked metric.
///
/// All vectors have one slot per period. Periods where `observed` is 0 carry
/// the 0/0 sentinel in `low`/`high` — renderers must check the count instead
/// of plotting a zero-width band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricColumn {
    pub name: String,
    pub semantics: MetricSemantics,
    /// Running minimum of observed per-tour values per period
    pub low: Vec<f64>,
    /// Running maximum of observed per-tour values per period
    pub high: Vec<f64>,
    /// Per-period total; empty for `Range` semantics
    pub sum: Vec<f64>,
    /// Number of tours that contributed a value per period
    pub observed: Vec<u32>,
    /// Raw per-tour value aligned with the tour arrays, 0.0 when absent
    pub tour_values: Vec<f64>,
}

/// One year's span within the flat period index space, end inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSegment {
    pub year: i32,
    pub start_index: usize,
    pub end_index: usize,
}

/// The aggregation engine's output for one (filter, range, granularity) request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub granularity: Granularity,
    pub range: YearRange,
    /// Requested years in chronological order
    pub year_numbers: Vec<i32>,
    /// Periods contributed by each year, aligned with `year_numbers`
    pub year_period_counts: Vec<usize>,
    /// Flat 0-based bucket index, one entry per period
    pub period_index: Vec<u32>,
    /// Tours bucketed into each period
    pub tour_count: Vec<u32>,
    /// Tracked metrics in spec order
    pub metrics: Vec<MetricColumn>,
    /// Metric specs that matched no tour at all (logged as unknown)
    pub missing_metrics: Vec<String>,

    // Per-tour parallel arrays for drill-down, all of identical length
    pub tour_ids: Vec<i64>,
    pub tour_type_ids: Vec<i64>,
    /// Stable color slot per tour, derived from the distinct type ids
    pub tour_type_color_indices: Vec<usize>,
    pub tour_starts: Vec<DateTime<FixedOffset>>,
    /// Period each tour was bucketed into
    pub tour_period_indices: Vec<usize>,
    pub tour_titles: Vec<String>,
    pub tour_descriptions: Vec<String>,
    /// Tour id -> tag ids, for tooltip rendering
    pub tour_tags: BTreeMap<i64, Vec<i64>>,
}

impl AggregationResult {
    pub fn period_count(&self) -> usize {
        self.period_index.len()
    }

    pub fn num_tours(&self) -> usize {
        self.tour_ids.len()
    }

    pub fn metric(&self, name: &str) -> Option<&MetricColumn> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Position of a tour in the parallel arrays
    pub fn tour_index(&self, tour_id: i64) -> Option<usize> {
        self.tour_ids.iter().position(|id| *id == tour_id)
    }

    /// Update a single tour's title in place, e.g. after the tour was renamed.
    /// Returns false when the tour is not part of this result.
    pub fn set_tour_title(&mut self, tour_id: i64, title: &str) -> bool {
        match self.tour_index(tour_id) {
            Some(index) => {
                self.tour_titles[index] = title.to_string();
                true
            }
            None => false,
        }
    }
}

/// Y-series values for one chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesValues {
    /// Low/high band per period (range semantics)
    Band { low: Vec<f64>, high: Vec<f64> },
    /// Single value per period (sum semantics, tour counts)
    Single(Vec<f64>),
}

/// One chart series with the metric it renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub metric: String,
    pub values: SeriesValues,
}

/// Generic ordered-series set a chart front end consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSet {
    /// X positions as stored integers, one per period
    pub x_periods: Vec<u32>,
    /// Year boundaries for the year-separator renderer; empty when disabled
    pub year_segments: Vec<YearSegment>,
    pub series: Vec<ChartSeries>,
}

impl SeriesSet {
    /// Floating-point view of the x-series for axes that need fractional
    /// positions; derived on demand, not stored twice.
    pub fn x_values(&self) -> Vec<f64> {
        self.x_periods.iter().map(|v| *v as f64).collect()
    }
}
