// src/report.rs

use std::fmt::Write;

use crate::parsers::ParsedRecord;
use crate::stats::{bucket_counts, level_distribution, top_codes, top_messages, Granularity};

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub granularity: Granularity,
    pub top_codes: usize,
    pub top_messages: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Hourly,
            top_codes: 10,
            top_messages: 20,
        }
    }
}

/// Plain-text summary of a (filtered) record set.
pub fn render_report(records: &[&ParsedRecord], opts: &ReportOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, records, opts);
    out
}

fn write_report(out: &mut String, records: &[&ParsedRecord], opts: &ReportOptions) -> std::fmt::Result {
    writeln!(out, "Records: {}", records.len())?;
    if records.is_empty() {
        writeln!(out, "No entries matched the expected format.")?;
        return Ok(());
    }

    let iter = || records.iter().copied();

    writeln!(out, "\nTop Error Codes")?;
    for (code, count) in top_codes(iter(), opts.top_codes) {
        writeln!(out, "  #{:<10} {}", code, count)?;
    }

    writeln!(out, "\nLog Levels Distribution")?;
    for share in level_distribution(iter()) {
        writeln!(out, "  {:<10} {:>6} {:>6.1}%", share.level, share.count, share.percent)?;
    }

    writeln!(out, "\nLogs Over Time ({})", opts.granularity)?;
    let fmt = match opts.granularity {
        Granularity::Hourly => "%Y-%m-%d %H:00",
        Granularity::Daily => "%Y-%m-%d",
    };
    let buckets = bucket_counts(iter(), opts.granularity);
    if buckets.is_empty() {
        writeln!(out, "  (no parseable timestamps)")?;
    }
    for (bucket, count) in buckets {
        writeln!(out, "  {}  {}", bucket.format(fmt), count)?;
    }

    writeln!(out, "\nFrequent Error Messages")?;
    for (message, count) in top_messages(iter(), opts.top_messages) {
        writeln!(out, "  {} ({} times)", message, count)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{parse_log, ENTRY_DELIMITER};

    fn log() -> String {
        [
            "Error Trace::Version 1::Mon Jan 02 03:04:05 2023 ( d pid 1 t@1)\n#1 ERROR #900 disk full",
            "Error Trace::Version 1::Mon Jan 02 03:30:00 2023 ( d pid 1 t@1)\n#2 ERROR #900 disk full",
            "Error Trace::Version 1::Tue Jan 03 09:00:00 2023 ( d pid 1 t@1)\n#3 WARN #12 slow",
        ]
        .join(ENTRY_DELIMITER)
    }

    #[test]
    fn test_report_sections() {
        let records = parse_log(&log());
        let refs: Vec<_> = records.iter().collect();
        let report = render_report(&refs, &ReportOptions::default());

        assert!(report.starts_with("Records: 3\n"));
        assert!(report.contains("Logs Over Time (hourly)"));
        assert!(report.contains("  2023-01-02 03:00  2\n"));
        assert!(report.contains("  2023-01-03 09:00  1\n"));
        assert!(report.contains("  disk full (2 times)\n"));
        assert!(report.contains("66.7%"));
    }

    #[test]
    fn test_report_daily() {
        let records = parse_log(&log());
        let refs: Vec<_> = records.iter().collect();
        let opts = ReportOptions {
            granularity: Granularity::Daily,
            ..ReportOptions::default()
        };
        let report = render_report(&refs, &opts);
        assert!(report.contains("  2023-01-02  2\n"));
    }

    #[test]
    fn test_report_empty() {
        let report = render_report(&[], &ReportOptions::default());
        assert!(report.contains("No entries matched the expected format."));
    }
}
