// src/export.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

use crate::error::{Result, TraceError};
use crate::parsers::{ParsedRecord, COLUMNS};
use crate::time::parse_trace_datetime;

/// Default export file name.
pub const DEFAULT_OUTPUT: &str = "parsed_log_output.csv";

/// Normalized DateTime cell format.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One spreadsheet row. Field order must match `COLUMNS`.
#[derive(Debug, Serialize, Deserialize)]
struct Row<'a> {
    #[serde(rename = "Version", borrow)]
    version: std::borrow::Cow<'a, str>,
    #[serde(rename = "DateTime")]
    date_time: String,
    #[serde(rename = "TimeDetails", borrow)]
    time_details: std::borrow::Cow<'a, str>,
    #[serde(rename = "PID", borrow)]
    pid: std::borrow::Cow<'a, str>,
    #[serde(rename = "Thread", borrow)]
    thread: std::borrow::Cow<'a, str>,
    #[serde(rename = "Session", borrow)]
    session: std::borrow::Cow<'a, str>,
    #[serde(rename = "Level", borrow)]
    level: std::borrow::Cow<'a, str>,
    #[serde(rename = "Code", borrow)]
    code: std::borrow::Cow<'a, str>,
    #[serde(rename = "Message", borrow)]
    message: std::borrow::Cow<'a, str>,
}

impl<'a> From<&'a ParsedRecord> for Row<'a> {
    fn from(r: &'a ParsedRecord) -> Self {
        Row {
            version: r.version.as_str().into(),
            // A timestamp that did not parse becomes an empty cell.
            date_time: r
                .timestamp
                .map(|ts| ts.format(DATETIME_FORMAT).to_string())
                .unwrap_or_default(),
            time_details: r.time_details.as_str().into(),
            pid: r.pid.as_str().into(),
            thread: r.thread.as_str().into(),
            session: r.session.as_str().into(),
            level: r.level.as_str().into(),
            code: r.code.as_str().into(),
            message: r.message.as_str().into(),
        }
    }
}

impl Row<'_> {
    fn into_record(self) -> ParsedRecord {
        let timestamp = NaiveDateTime::parse_from_str(&self.date_time, DATETIME_FORMAT)
            .ok()
            .or_else(|| parse_trace_datetime(&self.date_time));

        ParsedRecord {
            version: self.version.into_owned(),
            date_time: self.date_time,
            timestamp,
            time_details: self.time_details.into_owned(),
            pid: self.pid.into_owned(),
            thread: self.thread.into_owned(),
            session: self.session.into_owned(),
            level: self.level.into_owned(),
            code: self.code.into_owned(),
            message: self.message.into_owned(),
        }
    }
}

/// Writes the header row and one row per record, in order.
///
/// An empty iterator still produces the header row.
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    // Header is written by hand so empty exports still carry it.
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(COLUMNS)?;

    let mut rows = 0;
    for record in records {
        wtr.serialize(Row::from(record))?;
        rows += 1;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

/// Creates (or truncates) `path` and exports `records` into it.
pub fn export_to_path<'a, I>(path: impl AsRef<Path>, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| TraceError::io(path, e))?;
    let rows = write_records(file, records)?;
    info!(path = %path.display(), rows, "exported records");
    Ok(rows)
}

/// Reads an export back into records.
///
/// DateTime cells hold the normalized timestamp text, so `date_time` of the
/// result is that text rather than the original header capture.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ParsedRecord>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut records = Vec::new();
    let mut raw = csv::StringRecord::new();
    let headers = rdr.headers()?.clone();
    while rdr.read_record(&mut raw)? {
        let row: Row = raw.deserialize(Some(&headers))?;
        records.push(row.into_record());
    }
    Ok(records)
}
