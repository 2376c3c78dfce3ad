//! Daily aggregation of sub-daily forecast samples
//!
//! Samples are bucketed by UTC calendar date in first-occurrence order, each
//! bucket is reduced to a [`DailySummary`], and the result is capped to a
//! fixed number of days.

use crate::types::{ConditionCode, DailySummary, WeatherSample};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Number of days shown by the dashboard forecast
pub const DEFAULT_FORECAST_DAYS: usize = 5;

/// Local hours (inclusive) in which a sample counts as midday
pub const MIDDAY_HOURS: RangeInclusive<u32> = 12..=15;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

/// Accumulator for the samples of one calendar date
#[derive(Debug, Clone)]
struct DayAccumulator<'a> {
    date: NaiveDate,
    first: &'a WeatherSample,
    midday: Option<&'a WeatherSample>,
    temperature_min: f64,
    temperature_max: f64,
    /// (code, count) in order of first occurrence
    tally: Vec<(ConditionCode, usize)>,
}

impl<'a> DayAccumulator<'a> {
    fn new(date: NaiveDate, first: &'a WeatherSample) -> Self {
        Self {
            date,
            first,
            midday: None,
            temperature_min: f64::INFINITY,
            temperature_max: f64::NEG_INFINITY,
            tally: Vec::new(),
        }
    }

    fn add(&mut self, sample: &'a WeatherSample, local_hour: u32) {
        self.temperature_min = self.temperature_min.min(sample.temperature);
        self.temperature_max = self.temperature_max.max(sample.temperature);

        if self.midday.is_none() && MIDDAY_HOURS.contains(&local_hour) {
            self.midday = Some(sample);
        }

        match self
            .tally
            .iter_mut()
            .find(|(code, _)| *code == sample.condition_code)
        {
            Some((_, count)) => *count += 1,
            None => self.tally.push((sample.condition_code, 1)),
        }
    }

    /// Most frequent code; a strict comparison keeps the earliest code on ties.
    fn representative_condition(&self) -> ConditionCode {
        let mut best = (self.first.condition_code, 0);
        for &(code, count) in &self.tally {
            if count > best.1 {
                best = (code, count);
            }
        }
        best.0
    }

    fn finish(self) -> DailySummary {
        let representative = self.midday.unwrap_or(self.first);
        DailySummary {
            date: self.date,
            temperature_min: self.temperature_min,
            temperature_max: self.temperature_max,
            representative_condition: self.representative_condition(),
            representative_description: representative.description.clone(),
            representative_icon: representative.icon.clone(),
            representative_timestamp: self.first.timestamp,
        }
    }
}

/// Groups forecast samples into capped daily summaries
#[derive(Debug, Clone, Copy)]
pub struct DailyAggregator {
    max_days: usize,
    utc_offset: FixedOffset,
}

impl DailyAggregator {
    /// Create an aggregator keeping at most `max_days` summaries. Midday is
    /// judged in UTC until [`with_utc_offset`](Self::with_utc_offset) is set.
    pub fn new(max_days: usize) -> Self {
        Self {
            max_days,
            utc_offset: Utc.fix(),
        }
    }

    /// Judge the midday window in the given local offset. Date buckets stay UTC.
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn max_days(&self) -> usize {
        self.max_days
    }

    pub fn aggregate(&self, samples: &[WeatherSample]) -> Vec<DailySummary> {
        let mut index: HashMap<NaiveDate, usize> = HashMap::new();
        let mut days: Vec<DayAccumulator<'_>> = Vec::new();

        for sample in samples {
            let date = utc_date(sample.timestamp);
            let slot = *index.entry(date).or_insert_with(|| {
                days.push(DayAccumulator::new(date, sample));
                days.len() - 1
            });
            days[slot].add(sample, self.local_hour(sample.timestamp));
        }

        days.truncate(self.max_days);
        days.into_iter().map(DayAccumulator::finish).collect()
    }

    fn local_hour(&self, timestamp: i64) -> u32 {
        let local = timestamp + i64::from(self.utc_offset.local_minus_utc());
        // rem_euclid keeps the result in 0..86_400, so the hour fits in u32
        (local.rem_euclid(SECONDS_PER_DAY) / SECONDS_PER_HOUR) as u32
    }
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_FORECAST_DAYS)
    }
}

/// Aggregate samples into at most `max_days` daily summaries, judging
/// midday in UTC.
pub fn aggregate_daily(samples: &[WeatherSample], max_days: usize) -> Vec<DailySummary> {
    DailyAggregator::new(max_days).aggregate(samples)
}

/// UTC calendar date of a timestamp. Out-of-range timestamps map to the epoch.
pub fn utc_date(timestamp: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .date_naive()
}
