//! Aggregation engine: buckets tour records into calendar periods and
//! computes per-period low/high ranges and sums for every tracked metric.

use std::collections::BTreeMap;

use crate::services::calendar::PeriodCalendar;
use crate::types::{AggregationResult, MetricColumn, MetricSemantics, MetricSpec, TourRecord};

/// Aggregator for computing period statistics
pub struct Aggregator;

impl Aggregator {
    /// Bucket `tours` into the calendar's periods and fill the columnar result.
    ///
    /// Tours are sorted by (start, id) before accumulation, so identical
    /// inputs in any order produce a byte-identical result. Tours outside the
    /// calendar's range are skipped; in week granularity that includes early
    /// January tours whose ISO week belongs to the year before the range.
    pub fn aggregate(
        tours: &[TourRecord],
        calendar: &PeriodCalendar,
        specs: &[MetricSpec],
    ) -> AggregationResult {
        let period_count = calendar.period_count();
        let mut bucketed: Vec<(&TourRecord, usize)> = Vec::with_capacity(tours.len());

        for tour in tours {
            match calendar.period_index(&tour.start) {
                Some(period) => bucketed.push((tour, period)),
                None => {
                    log::debug!(
                        "tour {} at {} outside requested range, skipped",
                        tour.id,
                        tour.start
                    );
                }
            }
        }
        bucketed.sort_by_key(|(tour, _)| (tour.start, tour.id));

        // stable color slot per type id, ordered by id
        let mut type_ids: Vec<i64> = bucketed.iter().map(|(t, _)| t.type_id).collect();
        type_ids.sort_unstable();
        type_ids.dedup();
        let color_slots: BTreeMap<i64, usize> = type_ids
            .into_iter()
            .enumerate()
            .map(|(slot, id)| (id, slot))
            .collect();

        let mut result = AggregationResult {
            granularity: calendar.granularity(),
            range: calendar.range(),
            year_numbers: calendar.year_numbers(),
            year_period_counts: calendar.year_period_counts().to_vec(),
            period_index: (0..period_count as u32).collect(),
            tour_count: vec![0; period_count],
            metrics: specs
                .iter()
                .map(|spec| MetricColumn {
                    name: spec.name.clone(),
                    semantics: spec.semantics,
                    low: vec![f64::INFINITY; period_count],
                    high: vec![f64::NEG_INFINITY; period_count],
                    sum: match spec.semantics {
                        MetricSemantics::Sum => vec![0.0; period_count],
                        MetricSemantics::Range => Vec::new(),
                    },
                    observed: vec![0; period_count],
                    tour_values: Vec::with_capacity(bucketed.len()),
                })
                .collect(),
            missing_metrics: Vec::new(),
            tour_ids: Vec::with_capacity(bucketed.len()),
            tour_type_ids: Vec::with_capacity(bucketed.len()),
            tour_type_color_indices: Vec::with_capacity(bucketed.len()),
            tour_starts: Vec::with_capacity(bucketed.len()),
            tour_period_indices: Vec::with_capacity(bucketed.len()),
            tour_titles: Vec::with_capacity(bucketed.len()),
            tour_descriptions: Vec::with_capacity(bucketed.len()),
            tour_tags: BTreeMap::new(),
        };

        let mut metric_seen = vec![false; specs.len()];

        for (tour, period) in &bucketed {
            let period = *period;

            result.tour_ids.push(tour.id);
            result.tour_type_ids.push(tour.type_id);
            result
                .tour_type_color_indices
                .push(color_slots[&tour.type_id]);
            result.tour_starts.push(tour.start);
            result.tour_period_indices.push(period);
            result.tour_titles.push(tour.title.clone());
            result.tour_descriptions.push(tour.description.clone());
            if !tour.tag_ids.is_empty() {
                result.tour_tags.insert(tour.id, tour.tag_ids.clone());
            }

            result.tour_count[period] += 1;

            for (spec_index, spec) in specs.iter().enumerate() {
                let column = &mut result.metrics[spec_index];
                if tour.metrics.contains_key(&spec.name) {
                    metric_seen[spec_index] = true;
                }
                match tour.metric(&spec.name) {
                    Some(value) => {
                        column.low[period] = column.low[period].min(value);
                        column.high[period] = column.high[period].max(value);
                        column.observed[period] += 1;
                        if spec.semantics == MetricSemantics::Sum {
                            column.sum[period] += value;
                        }
                        column.tour_values.push(value);
                    }
                    None => column.tour_values.push(0.0),
                }
            }
        }

        // replace untouched sentinels: no observation means low = high = 0,
        // distinguishable from real data through the observed count
        for column in &mut result.metrics {
            for period in 0..period_count {
                if column.observed[period] == 0 {
                    column.low[period] = 0.0;
                    column.high[period] = 0.0;
                }
            }
        }

        for (spec_index, spec) in specs.iter().enumerate() {
            if !bucketed.is_empty() && !metric_seen[spec_index] {
                log::warn!(
                    "unknown metric '{}': not present in any tour, series stays all-zero",
                    spec.name
                );
                result.missing_metrics.push(spec.name.clone());
            }
        }

        result
    }
}
