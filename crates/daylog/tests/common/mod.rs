//! Shared helpers for daylog integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

pub use daylog::testing::Captured;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Parse every line of a JSON log file.
pub fn json_lines(path: &Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| {
            serde_json::from_str(line).unwrap_or_else(|e| panic!("bad line {line:?}: {e}"))
        })
        .collect()
}

/// Records in `lines` whose message is `message`.
pub fn with_message<'a>(
    lines: &'a [serde_json::Value],
    message: &str,
) -> Vec<&'a serde_json::Value> {
    lines.iter().filter(|l| l["message"] == message).collect()
}

/// Poll `condition` for up to ten seconds.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}
