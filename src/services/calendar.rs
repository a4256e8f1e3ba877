//! Pure calendar arithmetic: period boundaries and bucket indices
//!
//! Maps time-zone aware timestamps onto a flat, contiguous index space for a
//! requested year range and granularity. Day indices continue across year
//! boundaries so multi-year charts can use one x-axis; weeks follow ISO-8601
//! numbering, so a late-December tour may bucket into week 1 of the next year.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Weekday};

use crate::types::{Granularity, Result, StatError, YearRange, MAX_YEAR, MIN_YEAR};

/// One bucket of the chosen granularity; `end` is exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub index: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Calendar for one validated (year range, granularity) request
#[derive(Debug, Clone)]
pub struct PeriodCalendar {
    range: YearRange,
    granularity: Granularity,
    year_period_counts: Vec<usize>,
    period_count: usize,
}

impl PeriodCalendar {
    /// Validate the range and precompute per-year period counts.
    pub fn new(range: YearRange, granularity: Granularity) -> Result<Self> {
        if range.year_count == 0 {
            return Err(StatError::InvalidRange("number of years must be >= 1".into()));
        }
        if range.first_year < MIN_YEAR || range.last_year() > MAX_YEAR {
            return Err(StatError::InvalidRange(format!(
                "years {}..={} outside supported range {}..={}",
                range.first_year,
                range.last_year(),
                MIN_YEAR,
                MAX_YEAR
            )));
        }

        let year_period_counts: Vec<usize> = range
            .years()
            .map(|year| match granularity {
                Granularity::Day => Self::days_in_year(year) as usize,
                Granularity::Week => Self::weeks_in_iso_year(year) as usize,
                Granularity::Month => 12,
                Granularity::Year => 1,
            })
            .collect();
        let period_count = year_period_counts.iter().sum();

        Ok(Self {
            range,
            granularity,
            year_period_counts,
            period_count,
        })
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Total buckets across all requested years
    pub fn period_count(&self) -> usize {
        self.period_count
    }

    /// Buckets contributed by each year, in chronological order
    pub fn year_period_counts(&self) -> &[usize] {
        &self.year_period_counts
    }

    pub fn year_numbers(&self) -> Vec<i32> {
        self.range.years().collect()
    }

    /// Ordered sequence of period boundaries covering the whole range
    pub fn periods(&self) -> Vec<Period> {
        let mut periods = Vec::with_capacity(self.period_count);

        for year in self.range.years() {
            match self.granularity {
                Granularity::Day => {
                    let mut day = first_of_year(year);
                    for _ in 0..Self::days_in_year(year) {
                        let next = day + Duration::days(1);
                        periods.push(Period {
                            index: periods.len(),
                            start: day,
                            end: next,
                        });
                        day = next;
                    }
                }
                Granularity::Week => {
                    for week in 1..=Self::weeks_in_iso_year(year) {
                        // validated years always have a Monday for each ISO week
                        let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
                            .expect("ISO week start exists for validated year");
                        periods.push(Period {
                            index: periods.len(),
                            start,
                            end: start + Duration::weeks(1),
                        });
                    }
                }
                Granularity::Month => {
                    for month in 1..=12u32 {
                        let start = first_of_month(year, month);
                        let end = if month == 12 {
                            first_of_year(year + 1)
                        } else {
                            first_of_month(year, month + 1)
                        };
                        periods.push(Period {
                            index: periods.len(),
                            start,
                            end,
                        });
                    }
                }
                Granularity::Year => {
                    periods.push(Period {
                        index: periods.len(),
                        start: first_of_year(year),
                        end: first_of_year(year + 1),
                    });
                }
            }
        }

        periods
    }

    /// Flat bucket index for a timestamp, or None when it falls outside the
    /// range. Uses the timestamp's own calendar date, so a tour started at
    /// 23:59 local time stays on that local day. Period membership is
    /// start-inclusive, end-exclusive.
    pub fn period_index(&self, ts: &DateTime<FixedOffset>) -> Option<usize> {
        let date = ts.date_naive();
        match self.granularity {
            Granularity::Day => self.flat_day_index(date),
            Granularity::Week => {
                let iso = date.iso_week();
                if !self.range.contains(iso.year()) {
                    return None;
                }
                let mut index = 0usize;
                for year in self.range.years() {
                    if year == iso.year() {
                        return Some(index + iso.week() as usize - 1);
                    }
                    index += Self::weeks_in_iso_year(year) as usize;
                }
                None
            }
            Granularity::Month => {
                if !self.range.contains(date.year()) {
                    return None;
                }
                let year_offset = (date.year() - self.range.first_year) as usize;
                Some(year_offset * 12 + date.month0() as usize)
            }
            Granularity::Year => {
                if !self.range.contains(date.year()) {
                    return None;
                }
                Some((date.year() - self.range.first_year) as usize)
            }
        }
    }

    /// Cumulative day offset within the range: day-of-year of `date` plus the
    /// days of all preceding requested years, 0-based. A date in year Y+1 maps
    /// to an index continuing from the last day of year Y.
    pub fn flat_day_index(&self, date: NaiveDate) -> Option<usize> {
        if !self.range.contains(date.year()) {
            return None;
        }
        let mut offset = 0usize;
        for year in self.range.years() {
            if year == date.year() {
                return Some(offset + date.ordinal() as usize - 1);
            }
            offset += Self::days_in_year(year) as usize;
        }
        None
    }

    /// 1-based day of year
    pub fn day_of_year(date: NaiveDate) -> u32 {
        date.ordinal()
    }

    pub fn days_in_year(year: i32) -> u32 {
        if is_leap_year(year) {
            366
        } else {
            365
        }
    }

    /// 52 or 53 per ISO-8601
    pub fn weeks_in_iso_year(year: i32) -> u32 {
        if NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon).is_some() {
            53
        } else {
            52
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn first_of_year(year: i32) -> NaiveDate {
    first_of_month(year, 1)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // month is 1..=12, year is validated (+1 past MAX_YEAR is still in range)
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid first-of-month date")
}
