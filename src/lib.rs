//! Calendar-period statistics engine for recorded tours
//!
//! Buckets a variable-length set of tour records into fixed-size period
//! arrays (day, ISO week, month or year), computes per-period low/high
//! ranges and sums for every tracked metric, and maps the result into a
//! generic series format any charting front end can consume. Computed
//! results are cached per (person, filter, range, granularity) key until
//! the caller flags the underlying data as dirty.

pub mod cli;
pub mod services;
pub mod sources;
pub mod types;

pub use services::{
    Aggregator, ChartSeriesBuilder, PeriodCalendar, ResultCache, StatisticProvider,
};
pub use sources::TourRecordSource;
pub use types::{
    AggregationResult, Granularity, MetricSpec, PreferenceSnapshot, Result, SeriesSet, StatError,
    TourRecord, TourTypeFilter, YearRange,
};
