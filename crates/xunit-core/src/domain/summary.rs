//! Incremental pass/fail summary parsing for test-runner output.
//!
//! The transport delivers output in arbitrary chunk boundaries, so a marker
//! can straddle two chunks. The parser never scans a chunk's tail while it
//! may hold a truncated marker: everything after the last line break is held
//! back and prepended to the next chunk. The held-back tail is scanned once
//! on [`SummaryParser::finish`], when no further data can arrive.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Counted once per non-overlapping occurrence on a scanned line.
const PASS_MARKER: &str = "passed";

/// Marker that ends counting for the session.
const END_MARKER: &str = "=== Summary ===";

static FAILURE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"failed in (non-)?strict mode ===").unwrap());

static EXPECTED_FAILURE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"failed in (non-)?strict mode as expected").unwrap());

/// Running counters for a summarized session.
///
/// Counters are monotonically non-decreasing until `finished` is set by the
/// end-of-summary marker; data arriving after that is still surfaced as raw
/// output but no longer counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    /// Number of pass markers seen.
    pub passes: u64,
    /// Number of failure lines seen.
    pub failures: u64,
    /// Number of expected-failure lines seen.
    pub expected_failures: u64,
    /// True once the end-of-summary marker was seen.
    pub finished: bool,
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} passes, {} failures", self.passes, self.failures)?;
        if self.expected_failures > 0 {
            write!(f, ", {} expected failures", self.expected_failures)?;
        }
        Ok(())
    }
}

/// Incremental parser over coalesced output chunks.
///
/// Feed it chunks as they surface, then call [`finish`](Self::finish) when
/// the stream ends. Output that never matches the grammar simply leaves the
/// counters at zero; that is not an error.
#[derive(Debug, Default)]
pub struct SummaryParser {
    summary: TestSummary,
    partial: String,
}

impl SummaryParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    #[must_use]
    pub const fn summary(&self) -> &TestSummary {
        &self.summary
    }

    /// True once the end-of-summary marker was seen.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.summary.finished
    }

    /// Consume one chunk.
    ///
    /// Only the portion up to the last line break is scanned; the remainder
    /// is held back until the next chunk or [`finish`](Self::finish).
    pub fn feed(&mut self, chunk: &str) {
        if self.summary.finished {
            return;
        }
        self.partial.push_str(chunk);
        let Some(cut) = self.partial.rfind('\n') else {
            return;
        };
        let rest = self.partial.split_off(cut + 1);
        let complete = std::mem::replace(&mut self.partial, rest);
        self.scan(&complete);
    }

    /// Scan any held-back tail. Call once when the stream has ended.
    pub fn finish(&mut self) {
        let tail = std::mem::take(&mut self.partial);
        if !self.summary.finished && !tail.is_empty() {
            self.scan(&tail);
        }
    }

    fn scan(&mut self, text: &str) {
        for line in text.lines() {
            if line.contains(END_MARKER) {
                self.summary.finished = true;
                return;
            }
            self.summary.passes += line.matches(PASS_MARKER).count() as u64;
            if EXPECTED_FAILURE_LINE.is_match(line) {
                self.summary.expected_failures += 1;
            } else if FAILURE_LINE.is_match(line) {
                self.summary.failures += 1;
            }
        }
    }
}
