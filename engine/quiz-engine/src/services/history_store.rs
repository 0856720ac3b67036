use anyhow::{Context, Result};

use super::storage::StateStore;
use crate::models::history::{AggregateStats, HistoryRecord};
use crate::models::Language;

pub const HISTORY_KEY: &str = "quiz_history";
pub const STATS_KEY: &str = "quiz_stats";
pub const LANGUAGE_KEY: &str = "language";

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Append-only bounded log of past session outcomes, plus the small
/// `{total, wins}` stats cache and the language preference, all persisted
/// through a [`StateStore`].
pub struct HistoryStore {
    store: Box<dyn StateStore>,
    limit: usize,
}

impl HistoryStore {
    pub fn new(store: Box<dyn StateStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Prepends the record and evicts from the tail down to the limit.
    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        let mut records = self.read_all()?;
        records.insert(0, record.clone());
        records.truncate(self.limit);
        self.write_history(&records)?;

        tracing::info!(
            "Recorded session result: {}/{} ({}%), history length {}",
            record.score,
            record.total,
            record.percentage,
            records.len()
        );
        Ok(())
    }

    /// All retained records, newest first.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        match self.store.get(HISTORY_KEY)? {
            Some(json) => {
                serde_json::from_str(&json).context("Failed to deserialize quiz history")
            }
            None => Ok(Vec::new()),
        }
    }

    /// Drops the history log and the stats cache together.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(HISTORY_KEY)?;
        self.store.remove(STATS_KEY)?;
        tracing::info!("Cleared quiz history and stats");
        Ok(())
    }

    pub fn load_stats(&self) -> Result<AggregateStats> {
        match self.store.get(STATS_KEY)? {
            Some(json) => serde_json::from_str(&json).context("Failed to deserialize quiz stats"),
            None => Ok(AggregateStats::default()),
        }
    }

    /// Bumps the session counter, counting passed sessions as wins.
    pub fn record_outcome(&self, passed: bool) -> Result<AggregateStats> {
        let mut stats = self.load_stats()?;
        stats.total += 1;
        if passed {
            stats.wins += 1;
        }

        let json = serde_json::to_string(&stats).context("Failed to serialize quiz stats")?;
        self.store.set(STATS_KEY, &json)?;
        Ok(stats)
    }

    pub fn save_language(&self, language: Language) -> Result<()> {
        self.store.set(LANGUAGE_KEY, language.as_str())
    }

    pub fn load_language(&self) -> Result<Option<Language>> {
        let Some(value) = self.store.get(LANGUAGE_KEY)? else {
            return Ok(None);
        };

        match value.trim() {
            "english" => Ok(Some(Language::English)),
            "malayalam" => Ok(Some(Language::Malayalam)),
            other => {
                tracing::warn!("Ignoring unknown saved language {:?}", other);
                Ok(None)
            }
        }
    }

    fn write_history(&self, records: &[HistoryRecord]) -> Result<()> {
        let json = serde_json::to_string(records).context("Failed to serialize quiz history")?;
        self.store.set(HISTORY_KEY, &json)
    }
}
