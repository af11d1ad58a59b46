// src/stats.rs

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::TraceError;
use crate::parsers::ParsedRecord;

/// Bucket width for the logs-over-time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Hourly,
    Daily,
}

impl Granularity {
    /// Start of the bucket that contains `ts`.
    pub fn floor(&self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            Granularity::Hourly => ts
                .with_minute(0)
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(ts),
            Granularity::Daily => ts.date().and_hms_opt(0, 0, 0).unwrap_or(ts),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" | "hour" | "h" => Ok(Granularity::Hourly),
            "daily" | "day" | "d" => Ok(Granularity::Daily),
            _ => Err(TraceError::InvalidGranularity(s.to_string())),
        }
    }
}

/// Counts records per time bucket, ascending by bucket.
///
/// Records without a timestamp are left out rather than counted anywhere.
pub fn bucket_counts<'a, I>(records: I, granularity: Granularity) -> Vec<(NaiveDateTime, usize)>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let mut buckets: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for ts in records.into_iter().filter_map(|r| r.timestamp) {
        *buckets.entry(granularity.floor(ts)).or_insert(0) += 1;
    }
    buckets.into_iter().collect()
}

/// Frequency of each distinct key, count descending.
/// Ties keep the order in which the key first appeared.
fn value_counts<'a, I, F>(records: I, key: F) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
    F: Fn(&'a ParsedRecord) -> &'a str,
{
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let value = key(record);
        match index.get(value) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(value, order.len());
                order.push((value, 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

/// The `n` most frequent codes.
pub fn top_codes<'a, I>(records: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let mut counts = value_counts(records, |r| r.code.as_str());
    counts.truncate(n);
    counts
}

/// The `n` most frequent messages.
pub fn top_messages<'a, I>(records: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let mut counts = value_counts(records, |r| r.message.as_str());
    counts.truncate(n);
    counts
}

/// One slice of the level distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelShare {
    pub level: String,
    pub count: usize,
    pub percent: f64,
}

/// Count and share of each level, count descending.
pub fn level_distribution<'a, I>(records: I) -> Vec<LevelShare>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let counts = value_counts(records, |r| r.level.as_str());
    let total: usize = counts.iter().map(|(_, c)| c).sum();

    counts
        .into_iter()
        .map(|(level, count)| LevelShare {
            level,
            count,
            percent: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}
