//! Maps an aggregation result into the generic series format a chart consumes
//!
//! Pure transformation, fresh output on every call; caching happens one layer
//! up at the aggregation-result level.

use crate::types::{
    AggregationResult, ChartSeries, MetricSemantics, PreferenceSnapshot, SeriesSet, SeriesValues,
    YearSegment,
};

/// Series name for the per-period tour count
pub const NUMBER_OF_TOURS: &str = "number_of_tours";

/// Builder turning enabled metrics into chart series
pub struct ChartSeriesBuilder;

impl ChartSeriesBuilder {
    /// One x-series plus one y-series per enabled metric. Range metrics
    /// become low/high bands, sum metrics a single-value series. Metrics the
    /// snapshot does not enable (or the result does not carry) are skipped,
    /// nothing more.
    pub fn build(result: &AggregationResult, prefs: &PreferenceSnapshot) -> SeriesSet {
        let mut series = Vec::new();

        for name in prefs.enabled_metrics() {
            let Some(column) = result.metric(name) else {
                continue;
            };
            let values = match column.semantics {
                MetricSemantics::Range => SeriesValues::Band {
                    low: column.low.clone(),
                    high: column.high.clone(),
                },
                MetricSemantics::Sum => SeriesValues::Single(column.sum.clone()),
            };
            series.push(ChartSeries {
                metric: name.to_string(),
                values,
            });
        }

        if prefs.show_number_of_tours {
            series.push(ChartSeries {
                metric: NUMBER_OF_TOURS.to_string(),
                values: SeriesValues::Single(
                    result.tour_count.iter().map(|c| *c as f64).collect(),
                ),
            });
        }

        let year_segments = if prefs.show_year_separator {
            year_segments(result)
        } else {
            Vec::new()
        };

        SeriesSet {
            x_periods: result.period_index.clone(),
            year_segments,
            series,
        }
    }
}

/// Per-year spans within the flat period index space, for the chart's
/// year-separator segments
fn year_segments(result: &AggregationResult) -> Vec<YearSegment> {
    let mut segments = Vec::with_capacity(result.year_numbers.len());
    let mut offset = 0usize;

    for (year, count) in result
        .year_numbers
        .iter()
        .zip(result.year_period_counts.iter())
    {
        segments.push(YearSegment {
            year: *year,
            start_index: offset,
            end_index: offset + count - 1,
        });
        offset += count;
    }

    segments
}
