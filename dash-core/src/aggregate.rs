//! Collapses 3-hour forecast samples into one summary per calendar day.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::{
    condition::Condition,
    model::{DEFAULT_ICON, ForecastDay, Sample, round_half_up},
};

/// Number of days shown by the weekly view.
pub const FORECAST_DAYS: usize = 5;

#[derive(Debug)]
struct DayBucket<'a> {
    mins: Vec<f64>,
    maxs: Vec<f64>,
    conditions: Vec<(Option<&'a str>, Option<&'a str>)>,
    first_timestamp: NaiveDateTime,
}

impl<'a> DayBucket<'a> {
    fn new(first_timestamp: NaiveDateTime) -> Self {
        Self {
            mins: Vec::new(),
            maxs: Vec::new(),
            conditions: Vec::new(),
            first_timestamp,
        }
    }

    fn push(&mut self, sample: &'a Sample) {
        self.mins.push(sample.temp_min);
        self.maxs.push(sample.temp_max);
        self.conditions
            .push((sample.condition.as_deref(), sample.icon.as_deref()));
    }

    /// The sample at `floor(n / 2)` in arrival order, or the first one.
    fn representative(&self) -> (Option<&'a str>, Option<&'a str>) {
        self.conditions
            .get(self.conditions.len() / 2)
            .or_else(|| self.conditions.first())
            .copied()
            .unwrap_or((None, None))
    }

    fn into_day(self, date: NaiveDate, position: usize) -> ForecastDay {
        let high = self.maxs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low = self.mins.iter().copied().fold(f64::INFINITY, f64::min);
        let (condition, icon) = self.representative();

        ForecastDay {
            date,
            day: day_label(position, self.first_timestamp.date()),
            high: round_half_up(high),
            low: round_half_up(low),
            condition: Condition::from_optional(condition),
            icon: icon.unwrap_or(DEFAULT_ICON).to_string(),
        }
    }
}

/// Summarize samples into at most [`FORECAST_DAYS`] days, ascending by date.
pub fn aggregate(samples: &[Sample]) -> Vec<ForecastDay> {
    aggregate_days(samples, FORECAST_DAYS)
}

/// Same as [`aggregate`] with an explicit day limit.
///
/// Highs and lows are reduced from the max and min series independently, so a
/// malformed feed can produce `high < low`; that is passed through untouched.
pub fn aggregate_days(samples: &[Sample], days: usize) -> Vec<ForecastDay> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();

    for sample in samples {
        buckets
            .entry(sample.timestamp.date())
            .or_insert_with(|| DayBucket::new(sample.timestamp))
            .push(sample);
    }

    tracing::debug!(
        samples = samples.len(),
        dates = buckets.len(),
        "aggregating forecast samples"
    );

    buckets
        .into_iter()
        .take(days)
        .enumerate()
        .map(|(position, (date, bucket))| bucket.into_day(date, position))
        .collect()
}

fn day_label(position: usize, date: NaiveDate) -> String {
    match position {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%A").to_string(),
    }
}
