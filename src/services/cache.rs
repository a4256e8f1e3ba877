//! Memoization of computed aggregation results
//!
//! One entry per (person, filter signature, year range, granularity) key.
//! Entries are served until the caller flags the underlying data as dirty;
//! invalidation is always wholesale, never a partial update. Access to a
//! given key is serialized so concurrent requests cannot race to populate
//! the same entry, while different keys stay independent.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::types::{AggregationResult, Granularity, Result, TourTypeFilter, YearRange};

/// Cache key for one statistic request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatisticKey {
    pub person_id: Option<i64>,
    /// Normalized filter representation, see [`TourTypeFilter::signature`]
    pub filter_signature: String,
    pub first_year: i32,
    pub year_count: usize,
    pub granularity: Granularity,
}

impl StatisticKey {
    pub fn new(
        person_id: Option<i64>,
        filter: &TourTypeFilter,
        range: YearRange,
        granularity: Granularity,
    ) -> Self {
        let filter_signature = filter.signature();

        // signature normalization must be order-independent; a violation here
        // is a programming defect, not a runtime condition
        if let TourTypeFilter::Types(ids) = filter {
            let mut reversed = ids.clone();
            reversed.reverse();
            debug_assert_eq!(
                filter_signature,
                TourTypeFilter::Types(reversed).signature(),
                "filter signature must be order-independent"
            );
        }

        Self {
            person_id,
            filter_signature,
            first_year: range.first_year,
            year_count: range.year_count,
            granularity,
        }
    }
}

/// One cached aggregation with its computation timestamp
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: Arc<AggregationResult>,
    pub computed_at: DateTime<Utc>,
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Shared, mutable cache scoped to one statistics-view instance
#[derive(Default)]
pub struct ResultCache {
    slots: Mutex<HashMap<StatisticKey, Slot>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `key`, or run `compute` and store it.
    ///
    /// `dirty` forces a recompute and overwrites the stored entry. Compute
    /// errors propagate unchanged and leave any previous entry in place, so
    /// the caller can simply re-invoke on the next trigger.
    pub fn get_or_compute<F>(
        &self,
        key: StatisticKey,
        dirty: bool,
        compute: F,
    ) -> Result<Arc<AggregationResult>>
    where
        F: FnOnce() -> Result<AggregationResult>,
    {
        // short outer lock only to obtain the per-key slot
        let slot: Slot = {
            let mut slots = self.slots.lock();
            slots.entry(key).or_default().clone()
        };

        let mut entry = slot.lock();

        if !dirty {
            if let Some(cached) = entry.as_ref() {
                log::debug!("statistic cache hit");
                return Ok(Arc::clone(&cached.result));
            }
        }

        log::debug!("statistic cache miss (dirty: {})", dirty);
        let result = Arc::new(compute()?);
        *entry = Some(CacheEntry {
            result: Arc::clone(&result),
            computed_at: Utc::now(),
        });

        Ok(result)
    }

    /// Drop the entry for one key
    pub fn invalidate(&self, key: &StatisticKey) {
        if let Some(slot) = self.slots.lock().get(key) {
            *slot.lock() = None;
        }
    }

    /// Drop every entry, e.g. after a bulk tour import
    pub fn invalidate_all(&self) {
        self.slots.lock().clear();
    }

    /// Number of populated entries
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
