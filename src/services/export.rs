//! Raw statistic values as a delimited text table
//!
//! Debug/export contract for copy-to-clipboard: one row per tour, columns are
//! an optional sequence number, the tour id, the start date-time and every
//! tracked metric's raw value. Not meant for programmatic consumption.

use std::fmt::Write;

use crate::types::AggregationResult;

const COLUMN_SEPARATOR: char = '\t';

/// Render the per-tour parallel arrays as a tab-delimited table.
pub fn raw_statistic_values(result: &AggregationResult, include_sequence_numbers: bool) -> String {
    let mut out = String::new();

    // header
    if include_sequence_numbers {
        out.push('#');
        out.push(COLUMN_SEPARATOR);
    }
    out.push_str("tour_id");
    out.push(COLUMN_SEPARATOR);
    out.push_str("start");
    for column in &result.metrics {
        out.push(COLUMN_SEPARATOR);
        out.push_str(&column.name);
    }
    out.push('\n');

    for tour_index in 0..result.num_tours() {
        if include_sequence_numbers {
            let _ = write!(out, "{}{}", tour_index + 1, COLUMN_SEPARATOR);
        }
        let _ = write!(
            out,
            "{}{}{}",
            result.tour_ids[tour_index],
            COLUMN_SEPARATOR,
            result.tour_starts[tour_index].format("%Y-%m-%d %H:%M")
        );
        for column in &result.metrics {
            let _ = write!(out, "{}{}", COLUMN_SEPARATOR, column.tour_values[tour_index]);
        }
        out.push('\n');
    }

    out
}
