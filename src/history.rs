//! End-of-round score history
//!
//! In-memory only, newest first, keeps the last 10 rounds.

use serde::{Deserialize, Serialize};

/// Maximum number of history entries to keep
pub const MAX_HISTORY: usize = 10;

/// A single end-of-round record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Cumulative total score when the round ended
    pub total_score: u64,
    /// Unix timestamp (ms) when the round ended
    pub timestamp: f64,
}

impl HistoryEntry {
    /// Display line, e.g. `14:05 — Total Score: 450`
    pub fn label(&self) -> String {
        format!("{} — Total Score: {}", format_clock(self.timestamp), self.total_score)
    }
}

/// Bounded history list
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreHistory {
    pub entries: Vec<HistoryEntry>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Prepend an entry, trimming the oldest past the cap
    pub fn record(&mut self, total_score: u64, timestamp: f64) {
        self.entries.insert(
            0,
            HistoryEntry {
                total_score,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HISTORY);
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Display lines, newest first
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(HistoryEntry::label).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Format a timestamp as local wall-clock `HH:MM`
#[cfg(target_arch = "wasm32")]
pub fn format_clock(timestamp: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
    format!("{:02}:{:02}", date.get_hours(), date.get_minutes())
}

/// Format a timestamp as UTC `HH:MM`
#[cfg(not(target_arch = "wasm32"))]
pub fn format_clock(timestamp: f64) -> String {
    let minutes_of_day = (timestamp / 60_000.0).floor().rem_euclid(24.0 * 60.0) as u32;
    format!("{:02}:{:02}", minutes_of_day / 60, minutes_of_day % 60)
}
