//! Tour record sources
//!
//! The engine only consumes this contract; the real implementation lives in
//! the persistence layer. A JSON-file source is provided for the CLI and for
//! tests.

mod json;

pub use json::JsonTourSource;

use crate::types::{Result, TourRecord, TourTypeFilter, YearRange};

/// External collaborator yielding raw tour records for a person/filter/range
pub trait TourRecordSource {
    /// Records matching the person, tour-type filter and calendar year range.
    /// Errors are propagated unchanged to the statistic caller.
    fn fetch(
        &self,
        person_id: Option<i64>,
        filter: &TourTypeFilter,
        range: YearRange,
    ) -> Result<Vec<TourRecord>>;
}
