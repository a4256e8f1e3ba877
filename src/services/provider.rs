//! Statistic orchestration: wires the record source, calendar, aggregator
//! and result cache behind one entry point.

use std::sync::Arc;

use crate::services::cache::{ResultCache, StatisticKey};
use crate::services::{Aggregator, PeriodCalendar};
use crate::sources::TourRecordSource;
use crate::types::{
    default_metric_specs, AggregationResult, Granularity, MetricSpec, Result, TourTypeFilter,
    YearRange,
};

/// Cache-fronted statistic provider over one tour record source
pub struct StatisticProvider<S: TourRecordSource> {
    source: S,
    cache: ResultCache,
    specs: Vec<MetricSpec>,
}

impl<S: TourRecordSource> StatisticProvider<S> {
    /// Provider tracking the default metric catalogue
    pub fn new(source: S) -> Self {
        Self::with_specs(source, default_metric_specs())
    }

    pub fn with_specs(source: S, specs: Vec<MetricSpec>) -> Self {
        Self {
            source,
            cache: ResultCache::new(),
            specs,
        }
    }

    /// Statistic values for one request.
    ///
    /// Serves the cached result unless `dirty` is set or the key was never
    /// computed; source failures propagate unchanged, recomputation is cheap
    /// and idempotent so there are no retries.
    pub fn statistic_values(
        &self,
        person_id: Option<i64>,
        filter: &TourTypeFilter,
        range: YearRange,
        granularity: Granularity,
        dirty: bool,
    ) -> Result<Arc<AggregationResult>> {
        // validate the range before touching the cache
        let calendar = PeriodCalendar::new(range, granularity)?;
        let key = StatisticKey::new(person_id, filter, range, granularity);

        self.cache.get_or_compute(key, dirty, || {
            let tours = self.source.fetch(person_id, filter, range)?;
            Ok(Aggregator::aggregate(&tours, &calendar, &self.specs))
        })
    }

    /// Drop all cached results, e.g. after tour data changed on disk
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }

    pub fn specs(&self) -> &[MetricSpec] {
        &self.specs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{metric, StatError, TourRecord};
    use chrono::{Datelike, FixedOffset, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source counting how often it was queried
    struct CountingSource {
        tours: Vec<TourRecord>,
        fetches: AtomicUsize,
        fail: bool,
    }

    impl TourRecordSource for CountingSource {
        fn fetch(
            &self,
            person_id: Option<i64>,
            filter: &TourTypeFilter,
            range: YearRange,
        ) -> Result<Vec<TourRecord>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StatError::Source("database unavailable".into()));
            }
            Ok(self
                .tours
                .iter()
                .filter(|t| person_id.map_or(true, |p| t.person_id == p))
                .filter(|t| filter.matches(t.type_id))
                .filter(|t| range.contains(t.start.year()))
                .cloned()
                .collect())
        }
    }

    fn make_tour(id: i64, person_id: i64, type_id: i64, year: i32) -> TourRecord {
        TourRecord {
            id,
            person_id,
            type_id,
            start: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(year, 6, 15, 10, 0, 0)
                .unwrap(),
            title: String::new(),
            description: String::new(),
            tag_ids: Vec::new(),
            metrics: [(metric::DISTANCE.to_string(), 10.0)].into_iter().collect(),
        }
    }

    fn make_provider(fail: bool) -> StatisticProvider<CountingSource> {
        let source = CountingSource {
            tours: vec![
                make_tour(1, 1, 1, 2023),
                make_tour(2, 1, 2, 2023),
                make_tour(3, 2, 1, 2023),
            ],
            fetches: AtomicUsize::new(0),
            fail,
        };
        StatisticProvider::new(source)
    }

    #[test]
    fn test_clean_request_is_served_from_cache() {
        let provider = make_provider(false);
        let range = YearRange::new(2023, 1);

        let first = provider
            .statistic_values(Some(1), &TourTypeFilter::All, range, Granularity::Day, false)
            .unwrap();
        let second = provider
            .statistic_values(Some(1), &TourTypeFilter::All, range, Granularity::Day, false)
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.source.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dirty_request_refetches() {
        let provider = make_provider(false);
        let range = YearRange::new(2023, 1);

        provider
            .statistic_values(Some(1), &TourTypeFilter::All, range, Granularity::Day, false)
            .unwrap();
        provider
            .statistic_values(Some(1), &TourTypeFilter::All, range, Granularity::Day, true)
            .unwrap();

        assert_eq!(provider.source.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_person_and_filter_shape_the_result() {
        let provider = make_provider(false);
        let range = YearRange::new(2023, 1);

        let person1 = provider
            .statistic_values(Some(1), &TourTypeFilter::All, range, Granularity::Day, false)
            .unwrap();
        assert_eq!(person1.num_tours(), 2);

        let person1_type1 = provider
            .statistic_values(
                Some(1),
                &TourTypeFilter::Types(vec![1]),
                range,
                Granularity::Day,
                false,
            )
            .unwrap();
        assert_eq!(person1_type1.num_tours(), 1);
        assert_eq!(person1_type1.tour_ids, vec![1]);

        let everyone = provider
            .statistic_values(None, &TourTypeFilter::All, range, Granularity::Day, false)
            .unwrap();
        assert_eq!(everyone.num_tours(), 3);
    }

    #[test]
    fn test_invalid_range_aborts_before_fetch() {
        let provider = make_provider(false);
        let err = provider
            .statistic_values(
                Some(1),
                &TourTypeFilter::All,
                YearRange::new(2023, 0),
                Granularity::Day,
                false,
            )
            .unwrap_err();

        assert!(matches!(err, StatError::InvalidRange(_)));
        assert_eq!(provider.source.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_source_error_propagates_unchanged() {
        let provider = make_provider(true);
        let err = provider
            .statistic_values(
                Some(1),
                &TourTypeFilter::All,
                YearRange::new(2023, 1),
                Granularity::Day,
                false,
            )
            .unwrap_err();

        assert!(matches!(err, StatError::Source(_)));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let provider = make_provider(false);
        let range = YearRange::new(2023, 1);

        provider
            .statistic_values(Some(1), &TourTypeFilter::All, range, Granularity::Day, false)
            .unwrap();
        provider.invalidate();
        provider
            .statistic_values(Some(1), &TourTypeFilter::All, range, Granularity::Day, false)
            .unwrap();

        assert_eq!(provider.source.fetches.load(Ordering::SeqCst), 2);
    }
}
