// src/aggregate/daily.rs

use serde::Serialize;
use std::collections::BTreeMap;

use crate::dates::day_key;
use crate::model::{MiscellaneousSpend, ProductionRecord, SalesRecord};

/// Everything recorded on one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyBucket {
    pub date: String,
    pub production: f64,
    pub sales: f64,
    pub revenue: f64,
    pub spend: f64,
}

impl DailyBucket {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }
}

/// A record that contributes numbers to a single day.
pub trait DailyMeasure {
    /// Calendar day key (`YYYY-MM-DD`).
    fn day(&self) -> &str;
    fn accumulate(&self, bucket: &mut DailyBucket);
}

impl DailyMeasure for ProductionRecord {
    fn day(&self) -> &str {
        day_key(&self.date)
    }

    fn accumulate(&self, bucket: &mut DailyBucket) {
        bucket.production += self.packets;
    }
}

impl DailyMeasure for SalesRecord {
    fn day(&self) -> &str {
        day_key(&self.date)
    }

    fn accumulate(&self, bucket: &mut DailyBucket) {
        bucket.sales += self.packets;
        bucket.revenue += self.amount;
    }
}

impl DailyMeasure for MiscellaneousSpend {
    fn day(&self) -> &str {
        day_key(&self.date)
    }

    fn accumulate(&self, bucket: &mut DailyBucket) {
        bucket.spend += self.amount;
    }
}

/// Buckets are records too, so an already grouped series can be grouped again.
impl DailyMeasure for DailyBucket {
    fn day(&self) -> &str {
        day_key(&self.date)
    }

    fn accumulate(&self, bucket: &mut DailyBucket) {
        bucket.production += self.production;
        bucket.sales += self.sales;
        bucket.revenue += self.revenue;
        bucket.spend += self.spend;
    }
}

/// Per-day totals over any mix of record kinds.
///
/// Only days seen in the input get a bucket; nothing is gap-filled. Keys are ISO days,
/// so map order is chronological order.
#[derive(Debug, Clone, Default)]
pub struct DailyAggregator {
    days: BTreeMap<String, DailyBucket>,
}

impl DailyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<'a, R, I>(&mut self, records: I) -> &mut Self
    where
        R: DailyMeasure + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        for record in records {
            let day = record.day();
            let bucket = self
                .days
                .entry(day.to_string())
                .or_insert_with(|| DailyBucket::empty(day));
            record.accumulate(bucket);
        }
        self
    }

    pub fn by_day(&self) -> &BTreeMap<String, DailyBucket> {
        &self.days
    }

    pub fn into_by_day(self) -> BTreeMap<String, DailyBucket> {
        self.days
    }

    pub fn get(&self, day: &str) -> Option<&DailyBucket> {
        self.days.get(day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// All buckets, oldest first.
    pub fn series(&self) -> Vec<DailyBucket> {
        self.days.values().cloned().collect()
    }

    /// The `n` most recent buckets, oldest first.
    pub fn last(&self, n: usize) -> Vec<DailyBucket> {
        let skip = self.days.len().saturating_sub(n);
        self.days.values().skip(skip).cloned().collect()
    }

    /// Look up a caller-chosen list of days; missing days come back as zero buckets.
    pub fn probe<S: AsRef<str>>(&self, days: &[S]) -> Vec<DailyBucket> {
        days.iter()
            .map(|d| {
                let d = d.as_ref();
                self.days
                    .get(d)
                    .cloned()
                    .unwrap_or_else(|| DailyBucket::empty(d))
            })
            .collect()
    }
}

/// Group one kind of record by day.
pub fn group_by_day<R: DailyMeasure>(records: &[R]) -> BTreeMap<String, DailyBucket> {
    let mut agg = DailyAggregator::new();
    agg.add(records);
    agg.into_by_day()
}
