// src/parsers/header.rs

use regex::Regex;

/// `Error Trace::Version <v>::<Dow Mon DD HH:MM:SS YYYY> ( <detail> pid <n> t@<n>[ session <s>]`
///
/// The session clause stops at the first space, `)` or line break; nothing checks that
/// the parenthesis is ever closed.
const HEADER_PATTERN: &str = concat!(
    r"Error Trace::Version (?P<version>.*?)::",
    r"(?P<datetime>[A-Za-z]{3} [A-Za-z]{3}\s+\d+ \d+:\d+:\d+ \d+)",
    r" \( (?P<time_detail>.*?) pid (?P<pid>\d+)\s+t@(?P<thread>-?\d+)",
    r"(?: session (?P<session>[^ )\r\n]+))?",
);

/// Fields captured from an entry's header line, borrowed from the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields<'a> {
    pub version: &'a str,
    pub datetime: &'a str,
    pub time_detail: &'a str,
    pub pid: &'a str,
    pub thread: &'a str,
    pub session: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    re: Regex,
}

impl HeaderMatcher {
    pub fn new() -> Self {
        Self {
            re: Regex::new(HEADER_PATTERN).expect("Invalid header regex"),
        }
    }

    /// Searches anywhere in `entry` for the header shape.
    pub fn find<'a>(&self, entry: &'a str) -> Option<HeaderFields<'a>> {
        let caps = self.re.captures(entry)?;
        // Every group except `session` is mandatory once the regex matched.
        let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

        Some(HeaderFields {
            version: group("version"),
            datetime: group("datetime"),
            time_detail: group("time_detail"),
            pid: group("pid"),
            thread: group("thread"),
            session: caps.name("session").map(|m| m.as_str()),
        })
    }
}

impl Default for HeaderMatcher {
    fn default() -> Self {
        Self::new()
    }
}
