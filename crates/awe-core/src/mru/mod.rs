//! Recency and frequency of past activations, persisted as JSON.
//!
//! File format:
//! `{"history": [{"id": "firefox.desktop", "count": 3, "last": 1700000000000}]}`.
//! The older `{"<id>": <last>}` map is migrated on load.

use crate::Result;
use crate::utils::now_millis;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const HOUR_MS: u64 = 60 * 60 * 1000;
const DAY_MS: u64 = 24 * HOUR_MS;
const WEEK_MS: u64 = 7 * DAY_MS;

const RECENT_HOUR_BOOST: i64 = 500;
const RECENT_DAY_BOOST: i64 = 200;
const RECENT_WEEK_BOOST: i64 = 50;
const FREQUENCY_MULTIPLIER: i64 = 10;
const MAX_FREQUENCY_BOOST: i64 = 500;

/// Usage record for one candidate id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub count: u32,
    /// Milliseconds since the Unix epoch
    pub last_used: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryRecord {
    id: String,
    count: u32,
    last: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    history: Vec<HistoryRecord>,
}

/// MRU store backing the ranking boost
#[derive(Debug, Default)]
pub struct MruStore {
    path: Option<PathBuf>,
    entries: HashMap<String, HistoryEntry>,
    /// 0 disables eviction
    max_entries: usize,
}

impl MruStore {
    /// Store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store from `path`. Never fails: a missing or unreadable file
    /// yields an empty store that will still be saved to `path`.
    #[must_use]
    pub fn load(path: &Path, max_entries: usize) -> Self {
        let mut store = Self {
            path: Some(path.to_path_buf()),
            entries: HashMap::new(),
            max_entries,
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("MRU store not found at {}", path.display());
                return store;
            }
            Err(e) => {
                warn!("Failed to read MRU store {}: {e}", path.display());
                return store;
            }
        };

        let value: Value = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "Failed to parse MRU store: {} (at line {}, column {})",
                    e,
                    e.line(),
                    e.column()
                );
                return store;
            }
        };

        match parse_document(value) {
            Some((entries, legacy)) => {
                store.entries = entries;
                if legacy {
                    info!(
                        "Migrating {} legacy MRU entries to the current format",
                        store.entries.len()
                    );
                    if let Err(e) = store.save() {
                        warn!("Failed to save migrated MRU store: {e}");
                    }
                } else {
                    debug!("Loaded {} MRU entries", store.entries.len());
                }
            }
            None => warn!("Unrecognised MRU store format in {}", path.display()),
        }

        store
    }

    /// Record an activation now and persist.
    pub fn record_activation(&mut self, id: &str) {
        self.record_activation_at(id, now_millis());
    }

    pub fn record_activation_at(&mut self, id: &str, now: u64) {
        let entry = self.entries.entry(id.to_string()).or_insert(HistoryEntry {
            count: 0,
            last_used: now,
        });
        entry.count = entry.count.saturating_add(1);
        entry.last_used = now;

        self.evict_oldest();

        if let Err(e) = self.save() {
            warn!("Failed to save MRU store: {e}");
        }
    }

    #[must_use]
    pub fn boost(&self, id: &str) -> i64 {
        self.boost_at(id, now_millis())
    }

    /// Recency tier plus capped frequency for `id` as seen at `now`.
    #[must_use]
    pub fn boost_at(&self, id: &str, now: u64) -> i64 {
        let Some(entry) = self.entries.get(id) else {
            return 0;
        };

        let age = now.saturating_sub(entry.last_used);
        let recency = if age < HOUR_MS {
            RECENT_HOUR_BOOST
        } else if age < DAY_MS {
            RECENT_DAY_BOOST
        } else if age < WEEK_MS {
            RECENT_WEEK_BOOST
        } else {
            0
        };
        let frequency = (i64::from(entry.count) * FREQUENCY_MULTIPLIER).min(MAX_FREQUENCY_BOOST);

        recency + frequency
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<HistoryEntry> {
        self.entries.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the store to its backing file, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut history: Vec<HistoryRecord> = self
            .entries
            .iter()
            .map(|(id, entry)| HistoryRecord {
                id: id.clone(),
                count: entry.count,
                last: entry.last_used,
            })
            .collect();
        history.sort_by(|a, b| b.last.cmp(&a.last).then_with(|| a.id.cmp(&b.id)));

        let content = serde_json::to_string_pretty(&HistoryFile { history })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        debug!("Saved {} MRU entries", self.entries.len());
        Ok(())
    }

    fn evict_oldest(&mut self) {
        if self.max_entries == 0 || self.entries.len() <= self.max_entries {
            return;
        }

        let mut by_age: Vec<(String, u64)> = self
            .entries
            .iter()
            .map(|(id, e)| (id.clone(), e.last_used))
            .collect();
        by_age.sort_by_key(|(_, last)| *last);

        let excess = self.entries.len() - self.max_entries;
        for (id, _) in by_age.into_iter().take(excess) {
            self.entries.remove(&id);
        }
        debug!("Evicted {excess} old MRU entries");
    }
}

/// Returns the entries and whether the document used the legacy layout.
fn parse_document(value: Value) -> Option<(HashMap<String, HistoryEntry>, bool)> {
    let Value::Object(map) = value else {
        return None;
    };

    if map.contains_key("history") {
        let file: HistoryFile = serde_json::from_value(Value::Object(map)).ok()?;
        let entries = file
            .history
            .into_iter()
            .map(|r| {
                (
                    r.id,
                    HistoryEntry {
                        count: r.count,
                        last_used: r.last,
                    },
                )
            })
            .collect();
        return Some((entries, false));
    }

    let mut entries = HashMap::with_capacity(map.len());
    for (id, last) in map {
        let Some(last_used) = last.as_u64() else {
            warn!("Dropping MRU entry '{id}' with invalid timestamp {last}");
            continue;
        };
        entries.insert(
            id,
            HistoryEntry {
                count: 1,
                last_used,
            },
        );
    }
    Some((entries, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn test_boost_unknown_id_is_zero() {
        let store = MruStore::in_memory();
        assert_eq!(store.boost_at("nope", NOW), 0);
    }

    #[test]
    fn test_boost_recency_tiers() {
        let mut store = MruStore::in_memory();
        store.record_activation_at("a", NOW);

        assert_eq!(store.boost_at("a", NOW + 10), 510);
        assert_eq!(store.boost_at("a", NOW + 2 * HOUR_MS), 210);
        assert_eq!(store.boost_at("a", NOW + 2 * DAY_MS), 60);
        assert_eq!(store.boost_at("a", NOW + 2 * WEEK_MS), 10);
    }

    #[test]
    fn test_frequency_is_capped() {
        let mut store = MruStore::in_memory();
        for _ in 0..80 {
            store.record_activation_at("a", NOW);
        }
        assert_eq!(store.entry("a").map(|e| e.count), Some(80));
        assert_eq!(store.boost_at("a", NOW + 2 * WEEK_MS), 500);
        assert_eq!(store.boost_at("a", NOW), 1000);
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut store = MruStore {
            max_entries: 2,
            ..MruStore::default()
        };
        store.record_activation_at("old", NOW);
        store.record_activation_at("mid", NOW + 1);
        store.record_activation_at("new", NOW + 2);

        assert_eq!(store.len(), 2);
        assert!(store.entry("old").is_none());
        assert!(store.entry("new").is_some());
    }

    #[test]
    fn test_parse_legacy_document() {
        let value = serde_json::json!({"firefox.desktop": NOW, "foot.desktop": NOW - 5});
        let (entries, legacy) = parse_document(value).unwrap();
        assert!(legacy);
        assert_eq!(
            entries["firefox.desktop"],
            HistoryEntry {
                count: 1,
                last_used: NOW
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_shapes() {
        assert!(parse_document(serde_json::json!([1, 2])).is_none());
        assert!(parse_document(serde_json::json!({"a": "yesterday"})).is_none());
    }
}
