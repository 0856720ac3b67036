use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for strongest/weakest subject when no subject data exists.
pub const NO_SUBJECT_DATA: &str = "N/A";

/// Per-subject correct/wrong counts within one finished session.
///
/// Kept as a vector entry (not a map value) so subject first-appearance
/// order survives serialization; the strongest/weakest tie-break depends
/// on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectTally {
    pub subject: String,
    pub correct: u32,
    pub wrong: u32,
}

impl SubjectTally {
    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }
}

/// Persisted summary of one finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub passed: bool,
    pub per_subject: Vec<SubjectTally>,
}

/// The `{total, wins}` convenience cache kept next to the history log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total: u32,
    pub wins: u32,
}

impl AggregateStats {
    pub fn win_rate_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.wins as f64 / self.total as f64 * 100.0).round() as u32
    }
}

/// Aggregate accuracy for one subject across the analysis window.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectAccuracy {
    pub subject: String,
    pub correct: u32,
    pub wrong: u32,
    pub accuracy_percent: u32,
}

/// Longitudinal analytics over the most recent history records.
#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub sessions_analyzed: usize,
    pub average_score_percent: u32,
    pub per_subject: Vec<SubjectAccuracy>,
    pub strongest_subject: String,
    pub weakest_subject: String,
    pub passed: bool,
}
