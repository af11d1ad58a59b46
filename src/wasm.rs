use wasm_bindgen::prelude::*;
use crate::{stats, ParsedRecord, TraceParser};

// Returned to the JavaScript front end as a JSON string.
#[derive(serde::Serialize)]
struct WasmResult {
    entry_count: usize,
    record_count: usize,
    records: Vec<ParsedRecord>,
    levels: Vec<stats::LevelShare>,
    top_codes: Vec<(String, usize)>,
}

#[wasm_bindgen]
pub fn parse_trace(log_text: &str) -> String {
    let records = TraceParser::new().parse(log_text);

    let result = WasmResult {
        entry_count: crate::split_entries(log_text).len(),
        record_count: records.len(),
        levels: stats::level_distribution(&records),
        top_codes: stats::top_codes(&records, 10),
        records,
    };
    serde_json::to_string(&result).unwrap_or_default()
}
