//! Command line interface over the statistics engine

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::services::{raw_statistic_values, ChartSeriesBuilder, StatisticProvider};
use crate::sources::JsonTourSource;
use crate::types::{Granularity, PreferenceSnapshot, TourTypeFilter, YearRange};

/// Calendar-period statistics for recorded tours
#[derive(Parser)]
#[command(name = "tourstats")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Request parameters shared by every subcommand
#[derive(Args, Debug)]
struct RequestArgs {
    /// JSON file with an array of tour records
    #[arg(long, value_name = "FILE")]
    tours: PathBuf,

    /// First statistic year
    #[arg(long)]
    year: i32,

    /// Number of years starting at --year
    #[arg(long, default_value_t = 1)]
    years: usize,

    /// Bucketing granularity
    #[arg(long, value_enum, default_value_t = Granularity::Day)]
    granularity: Granularity,

    /// Restrict to one person id
    #[arg(long)]
    person: Option<i64>,

    /// Restrict to the listed tour type ids (default: all)
    #[arg(long = "tour-type", num_args = 1..)]
    tour_types: Vec<i64>,
}

impl RequestArgs {
    fn filter(&self) -> TourTypeFilter {
        if self.tour_types.is_empty() {
            TourTypeFilter::All
        } else {
            TourTypeFilter::Types(self.tour_types.clone())
        }
    }

    fn range(&self) -> YearRange {
        YearRange::new(self.year, self.years)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate tours into periods and print a summary
    Aggregate {
        #[command(flatten)]
        request: RequestArgs,

        /// Output the full aggregation result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build chart series for the default preference snapshot
    Series {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Print the raw per-tour statistic values as a tab-delimited table
    Export {
        #[command(flatten)]
        request: RequestArgs,

        /// Prefix each row with a sequence number
        #[arg(long)]
        sequence_numbers: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Aggregate { request, json } => {
                let result = compute(&request)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&*result)?);
                } else {
                    println!(
                        "{} tours in {} {} periods ({}..={})",
                        result.num_tours(),
                        result.period_count(),
                        result.granularity.as_str(),
                        result.range.first_year,
                        result.range.last_year()
                    );
                    for column in &result.metrics {
                        let observed: u32 = column.observed.iter().sum();
                        println!("  {}: {} observations", column.name, observed);
                    }
                    if !result.missing_metrics.is_empty() {
                        println!("  missing metrics: {}", result.missing_metrics.join(", "));
                    }
                }
                Ok(())
            }
            Commands::Series { request } => {
                let result = compute(&request)?;
                let set = ChartSeriesBuilder::build(&result, &PreferenceSnapshot::default());
                println!("{}", serde_json::to_string_pretty(&set)?);
                Ok(())
            }
            Commands::Export {
                request,
                sequence_numbers,
            } => {
                let result = compute(&request)?;
                print!("{}", raw_statistic_values(&result, sequence_numbers));
                Ok(())
            }
        }
    }
}

fn compute(
    request: &RequestArgs,
) -> anyhow::Result<std::sync::Arc<crate::types::AggregationResult>> {
    let provider = StatisticProvider::new(JsonTourSource::new(&request.tours));
    let result = provider.statistic_values(
        request.person,
        &request.filter(),
        request.range(),
        request.granularity,
        false,
    )?;
    Ok(result)
}
