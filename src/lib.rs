pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod parsers;
pub mod report;
pub mod stats;
pub mod time;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export for easy access
pub use error::{Result, TraceError};
pub use parsers::{parse_log, split_entries, ParsedRecord, TraceParser, COLUMNS, ENTRY_DELIMITER};
pub use view::RecordFilter;
