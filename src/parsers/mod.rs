// File: src/parsers/mod.rs

pub mod header;
pub mod message;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::time::parse_trace_datetime;
use header::{HeaderFields, HeaderMatcher};
use message::{MessageFields, MessageMatcher};

/// Separator between consecutive trace entries.
pub const ENTRY_DELIMITER: &str = "**********";

/// Output columns, in export order.
pub const COLUMNS: [&str; 9] = [
    "Version",
    "DateTime",
    "TimeDetails",
    "PID",
    "Thread",
    "Session",
    "Level",
    "Code",
    "Message",
];

/// One fully matched trace entry.
///
/// All captured fields are kept as text. `timestamp` is the typed reading of
/// `date_time` and is `None` when the text is not a valid calendar time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "DateTime")]
    pub date_time: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(rename = "TimeDetails")]
    pub time_details: String,
    #[serde(rename = "PID")]
    pub pid: String,
    #[serde(rename = "Thread")]
    pub thread: String,
    #[serde(rename = "Session")]
    pub session: String,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl ParsedRecord {
    fn assemble(header: HeaderFields<'_>, msg: MessageFields<'_>) -> Self {
        Self {
            version: header.version.to_string(),
            date_time: header.datetime.to_string(),
            timestamp: parse_trace_datetime(header.datetime),
            time_details: header.time_detail.to_string(),
            pid: header.pid.to_string(),
            thread: header.thread.to_string(),
            session: header.session.unwrap_or_default().to_string(),
            level: msg.level.to_string(),
            code: msg.code.to_string(),
            message: msg.message.to_string(),
        }
    }

    /// PID as a number; `None` if it overflows `u64`.
    pub fn pid_value(&self) -> Option<u64> {
        self.pid.parse().ok()
    }

    /// Thread id as a signed number (trace thread ids can be negative).
    pub fn thread_value(&self) -> Option<i64> {
        self.thread.parse().ok()
    }

    /// Error code as a number, for numeric sorting of the Code column.
    pub fn code_value(&self) -> Option<u64> {
        self.code.parse().ok()
    }

    /// Field values in `COLUMNS` order, with the raw DateTime text.
    pub fn fields(&self) -> [&str; 9] {
        [
            self.version.as_str(),
            self.date_time.as_str(),
            self.time_details.as_str(),
            self.pid.as_str(),
            self.thread.as_str(),
            self.session.as_str(),
            self.level.as_str(),
            self.code.as_str(),
            self.message.as_str(),
        ]
    }
}

/// Splits a log blob on `ENTRY_DELIMITER`.
///
/// Empty leading, trailing and in-between segments are kept, and a blob
/// without any delimiter yields exactly one entry.
pub fn split_entries(log_text: &str) -> Vec<&str> {
    log_text.split(ENTRY_DELIMITER).collect()
}

/// Two-stage extractor for Error Trace logs.
///
/// Build once and reuse; both patterns are compiled in `new`.
#[derive(Debug, Clone, Default)]
pub struct TraceParser {
    header: HeaderMatcher,
    message: MessageMatcher,
}

impl TraceParser {
    pub fn new() -> Self {
        Self {
            header: HeaderMatcher::new(),
            message: MessageMatcher::new(),
        }
    }

    /// Extracts a record from a single entry.
    ///
    /// Both the header and the message must be found, otherwise `None`.
    pub fn parse_entry(&self, entry: &str) -> Option<ParsedRecord> {
        let header = self.header.find(entry)?;
        let msg = self.message.find(entry)?;
        Some(ParsedRecord::assemble(header, msg))
    }

    /// Parses a whole log blob, preserving entry order.
    ///
    /// Entries that do not match are skipped; this never fails.
    pub fn parse(&self, log_text: &str) -> Vec<ParsedRecord> {
        let entries = split_entries(log_text);
        let mut records = Vec::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            match self.parse_entry(entry) {
                Some(record) => records.push(record),
                None => trace!(entry = idx, "entry skipped: header or message not found"),
            }
        }

        debug!(entries = entries.len(), records = records.len(), "parsed trace log");
        records
    }
}

/// Convenience wrapper for one-off parsing.
pub fn parse_log(log_text: &str) -> Vec<ParsedRecord> {
    TraceParser::new().parse(log_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EXAMPLE: &str = "Error Trace::Version 12.1::Mon Jan 02 03:04:05 2023 ( detail pid 555 t@12 session abc) \n#1 ERROR #900 disk full";

    fn entry(version: &str, code: &str) -> String {
        format!(
            "\nError Trace::Version {}::Mon Jan 02 03:04:05 2023 ( d pid 1 t@1)\n#1 ERROR #{} boom\n",
            version, code
        )
    }

    #[test]
    fn test_split_without_delimiter_is_single_entry() {
        assert_eq!(split_entries("no delimiter here"), vec!["no delimiter here"]);
        assert_eq!(split_entries(""), vec![""]);
    }

    #[test]
    fn test_split_keeps_empty_segments() {
        let text = format!("{d}a{d}{d}b{d}", d = ENTRY_DELIMITER);
        assert_eq!(split_entries(&text), vec!["", "a", "", "b", ""]);
    }

    #[test]
    fn test_split_longer_star_runs() {
        // Twelve stars: one delimiter plus two leftover stars.
        assert_eq!(split_entries("a************b"), vec!["a", "**b"]);
    }

    #[test]
    fn test_parse_full_record() {
        let records = parse_log(EXAMPLE);
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.version, "12.1");
        assert_eq!(r.date_time, "Mon Jan 02 03:04:05 2023");
        assert_eq!(
            r.timestamp,
            NaiveDate::from_ymd_opt(2023, 1, 2).and_then(|d| d.and_hms_opt(3, 4, 5))
        );
        assert_eq!(r.time_details, "detail");
        assert_eq!(r.pid, "555");
        assert_eq!(r.thread, "12");
        assert_eq!(r.session, "abc");
        assert_eq!(r.level, "ERROR");
        assert_eq!(r.code, "900");
        assert_eq!(r.message, "disk full");
    }

    #[test]
    fn test_parse_missing_session_is_empty() {
        let text = "Error Trace::Version 12.1::Mon Jan 02 03:04:05 2023 ( detail pid 555 t@12) \n#1 ERROR #900 disk full";
        let records = parse_log(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session, "");
    }

    #[test]
    fn test_parse_only_second_entry_matches() {
        let text = format!("#1 ERROR #1 no header here{}{}", ENTRY_DELIMITER, EXAMPLE);
        let records = parse_log(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "disk full");
    }

    #[test]
    fn test_parse_header_without_message_is_dropped() {
        let text = "Error Trace::Version 1::Mon Jan 02 03:04:05 2023 ( d pid 1 t@1)\nno message";
        assert!(parse_log(text).is_empty());
    }

    #[test]
    fn test_parse_message_only_in_other_entry_is_dropped() {
        // Header and message split across a delimiter never combine.
        let text = format!(
            "Error Trace::Version 1::Mon Jan 02 03:04:05 2023 ( d pid 1 t@1){}#1 ERROR #2 x",
            ENTRY_DELIMITER
        );
        assert!(parse_log(&text).is_empty());
    }

    #[test]
    fn test_parse_preserves_entry_order() {
        let text = [
            entry("a", "1"),
            "garbage".to_string(),
            entry("b", "2"),
            String::new(),
            entry("c", "3"),
        ]
        .join(ENTRY_DELIMITER);

        let codes: Vec<_> = parse_log(&text).into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_bad_timestamp_keeps_record() {
        let text = "Error Trace::Version 1::Mon Foo 02 03:04:05 2023 ( d pid 1 t@1)\n#1 ERROR #2 x";
        let records = parse_log(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date_time, "Mon Foo 02 03:04:05 2023");
        assert!(records[0].timestamp.is_none());
    }

    #[test]
    fn test_parse_crlf_log() {
        let text = format!(
            "Error Trace::Version 1::Mon Jan 02 03:04:05 2023 ( d pid 1 t@1 session x)\r\n#1 ERROR #9 disk full\r\nmore\r\n{}\r\n",
            ENTRY_DELIMITER
        );
        let records = parse_log(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session, "x");
        assert_eq!(records[0].message, "disk full");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_log("").is_empty());
    }

    #[test]
    fn test_parser_is_reusable() {
        let parser = TraceParser::new();
        assert_eq!(parser.parse(EXAMPLE).len(), 1);
        assert_eq!(parser.parse(EXAMPLE).len(), 1);
    }

    #[test]
    fn test_typed_accessors() {
        let text = "Error Trace::Version 1::Mon Jan 02 03:04:05 2023 ( d pid 77 t@-3)\n#1 ERROR #404 x";
        let r = &parse_log(text)[0];
        assert_eq!(r.pid_value(), Some(77));
        assert_eq!(r.thread_value(), Some(-3));
        assert_eq!(r.code_value(), Some(404));
    }

    #[test]
    fn test_fields_follow_column_order() {
        let r = &parse_log(EXAMPLE)[0];
        let fields = r.fields();
        assert_eq!(fields.len(), COLUMNS.len());
        assert_eq!(fields[0], "12.1");
        assert_eq!(fields[5], "abc");
        assert_eq!(fields[8], "disk full");
    }
}
