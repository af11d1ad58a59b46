// src/view.rs

use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashSet};

use crate::parsers::ParsedRecord;

/// Distinct values of `key`, in first-appearance order.
fn observed<'a, F>(records: &'a [ParsedRecord], key: F) -> Vec<String>
where
    F: Fn(&'a ParsedRecord) -> &'a str,
{
    let mut seen = HashSet::new();
    records
        .iter()
        .map(key)
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

pub fn observed_levels(records: &[ParsedRecord]) -> Vec<String> {
    observed(records, |r| r.level.as_str())
}

pub fn observed_codes(records: &[ParsedRecord]) -> Vec<String> {
    observed(records, |r| r.code.as_str())
}

/// Non-destructive selection over a parsed record set.
///
/// `None` for levels or codes means every value passes; `Some` of an empty
/// set passes nothing. A time bound, when set, also drops records whose
/// timestamp did not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub levels: Option<BTreeSet<String>>,
    pub codes: Option<BTreeSet<String>>,
    pub since: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
}

impl RecordFilter {
    /// Selects every level and code observed in `records`.
    pub fn all(records: &[ParsedRecord]) -> Self {
        Self {
            levels: Some(observed_levels(records).into_iter().collect()),
            codes: Some(observed_codes(records).into_iter().collect()),
            since: None,
            until: None,
        }
    }

    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_window(mut self, since: Option<NaiveDateTime>, until: Option<NaiveDateTime>) -> Self {
        self.since = since;
        self.until = until;
        self
    }

    pub fn matches(&self, record: &ParsedRecord) -> bool {
        if let Some(levels) = &self.levels {
            if !levels.contains(&record.level) {
                return false;
            }
        }
        if let Some(codes) = &self.codes {
            if !codes.contains(&record.code) {
                return false;
            }
        }
        if self.since.is_none() && self.until.is_none() {
            return true;
        }

        match record.timestamp {
            Some(ts) => {
                self.since.map_or(true, |since| ts >= since)
                    && self.until.map_or(true, |until| ts <= until)
            }
            None => false,
        }
    }

    /// The records that pass, in their original order.
    pub fn apply<'a>(&self, records: &'a [ParsedRecord]) -> Vec<&'a ParsedRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 2)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    fn record(level: &str, code: &str, timestamp: Option<NaiveDateTime>) -> ParsedRecord {
        ParsedRecord {
            version: "1".into(),
            date_time: String::new(),
            timestamp,
            time_details: String::new(),
            pid: "1".into(),
            thread: "1".into(),
            session: String::new(),
            level: level.into(),
            code: code.into(),
            message: format!("{} {}", level, code),
        }
    }

    fn sample() -> Vec<ParsedRecord> {
        vec![
            record("ERROR", "900", Some(at(1))),
            record("WARN", "12", Some(at(2))),
            record("ERROR", "12", None),
            record("INFO", "7", Some(at(3))),
            record("WARN", "900", Some(at(4))),
        ]
    }

    #[test]
    fn test_observed_values_first_seen_order() {
        let records = sample();
        assert_eq!(observed_levels(&records), vec!["ERROR", "WARN", "INFO"]);
        assert_eq!(observed_codes(&records), vec!["900", "12", "7"]);
    }

    #[test]
    fn test_default_selection_passes_everything() {
        let records = sample();
        assert_eq!(RecordFilter::all(&records).apply(&records).len(), records.len());
        assert_eq!(RecordFilter::default().apply(&records).len(), records.len());
    }

    #[test]
    fn test_filter_by_level_and_code() {
        let records = sample();
        let filter = RecordFilter::all(&records)
            .with_levels(["ERROR", "WARN"])
            .with_codes(["900"]);
        let picked: Vec<_> = filter.apply(&records).iter().map(|r| r.message.clone()).collect();
        assert_eq!(picked, vec!["ERROR 900", "WARN 900"]);
    }

    #[test]
    fn test_empty_selection_passes_nothing() {
        let records = sample();
        let filter = RecordFilter::default().with_levels(Vec::<String>::new());
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn test_window_excludes_missing_timestamps() {
        let records = sample();
        let filter = RecordFilter::default().with_window(Some(at(2)), Some(at(3)));
        let picked: Vec<_> = filter.apply(&records).iter().map(|r| r.code.clone()).collect();
        assert_eq!(picked, vec!["12", "7"]);
    }

    #[test]
    fn test_filter_is_non_destructive() {
        let records = sample();
        let _ = RecordFilter::default().with_codes(["7"]).apply(&records);
        assert_eq!(records.len(), 5);
    }
}
