//! Services for period bucketing, aggregation and series building

pub mod aggregator;
pub mod cache;
pub mod calendar;
pub mod export;
pub mod provider;
pub mod series;

pub use aggregator::Aggregator;
pub use cache::{ResultCache, StatisticKey};
pub use calendar::{Period, PeriodCalendar};
pub use export::raw_statistic_values;
pub use provider::StatisticProvider;
pub use series::ChartSeriesBuilder;
