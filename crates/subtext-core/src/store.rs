use crate::error::{Result, SubtextError};
use crate::models::{RuleEntry, RuleRecord};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// The replacement database: an ordered set of rules keyed by trigger,
/// persisted to a JSON file after every mutation.
///
/// The file maps trigger -> record. An older format mapping trigger directly
/// to the replacement string is upgraded transparently on load.
pub struct RuleStore {
    path: PathBuf,
    entries: Vec<RuleEntry>,
}

impl RuleStore {
    /// Load the database at `path`. A missing or empty file yields an empty
    /// store; that is the normal first-run state, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self {
                path,
                entries: Vec::new(),
            });
        }

        let value: Value = serde_json::from_str(&content)?;
        let map = match value {
            Value::Object(map) => map,
            _ => {
                return Err(SubtextError::Other(format!(
                    "Replacement database {} is not a JSON object",
                    path.display()
                )))
            }
        };

        let legacy = map.values().next().map(Value::is_string).unwrap_or(false);
        let mut store = Self {
            path,
            entries: Vec::with_capacity(map.len()),
        };

        if legacy {
            // Old format: trigger -> replacement string. Wrap each entry into
            // the full record shape and write the upgraded file back at once.
            for (trigger, value) in map {
                let text = value.as_str().ok_or_else(|| {
                    SubtextError::Other(format!("Malformed entry for trigger '{}'", trigger))
                })?;
                store.entries.push(RuleEntry::new(trigger, text.to_string()));
            }
            store.save()?;
        } else {
            for (trigger, value) in map {
                let record: RuleRecord = serde_json::from_value(value)?;
                store.entries.push(RuleEntry::from_record(trigger, record));
            }
        }

        Ok(store)
    }

    /// Write the whole store to its file. In-memory state is left untouched
    /// on failure; the caller decides how loudly to report it.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut map = serde_json::Map::with_capacity(self.entries.len());
        for entry in &self.entries {
            map.insert(
                entry.trigger.clone(),
                serde_json::to_value(entry.to_record())?,
            );
        }

        let serialized = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    /// Insert a new rule, or replace an existing one in place. Replacing
    /// resets the usage statistics; the rule keeps its position in the file.
    pub fn add(&mut self, trigger: String, text: String) -> Result<()> {
        if trigger.is_empty() {
            return Err(SubtextError::InvalidTrigger(
                "trigger cannot be empty".to_string(),
            ));
        }
        if trigger.chars().any(char::is_whitespace) {
            return Err(SubtextError::InvalidTrigger(
                "trigger cannot contain whitespace".to_string(),
            ));
        }

        let entry = RuleEntry::new(trigger, text);
        match self.position(&entry.trigger) {
            Some(pos) => self.entries[pos] = entry,
            None => self.entries.push(entry),
        }
        self.save()
    }

    /// Delete the rule for `trigger`. Unknown triggers are reported without
    /// touching memory or disk.
    pub fn remove(&mut self, trigger: &str) -> Result<()> {
        match self.position(trigger) {
            Some(pos) => {
                self.entries.remove(pos);
                self.save()
            }
            None => Err(SubtextError::RuleNotFound(trigger.to_string())),
        }
    }

    /// Count one expansion of `trigger` and persist the updated statistics.
    pub fn record_use(&mut self, trigger: &str) -> Result<()> {
        let pos = self
            .position(trigger)
            .ok_or_else(|| SubtextError::RuleNotFound(trigger.to_string()))?;
        self.entries[pos].record_use();
        self.save()
    }

    pub fn find(&self, trigger: &str) -> Option<&RuleEntry> {
        self.entries.iter().find(|entry| entry.trigger == trigger)
    }

    /// All rules in insertion order.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_uses(&self) -> u64 {
        self.entries.iter().map(|entry| entry.usage_count).sum()
    }

    /// The `n` most-used rules, usage descending. The sort is stable, so
    /// rules with equal counts keep their insertion order.
    pub fn top_by_usage(&self, n: usize) -> Vec<&RuleEntry> {
        let mut ranked: Vec<&RuleEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        ranked.truncate(n);
        ranked
    }

    /// The `n` most-recently-used rules, newest first. Rules that have never
    /// fired are excluded.
    pub fn recently_used(&self, n: usize) -> Vec<&RuleEntry> {
        let mut used: Vec<&RuleEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.last_used_instant().is_some())
            .collect();
        used.sort_by(|a, b| b.last_used_instant().cmp(&a.last_used_instant()));
        used.truncate(n);
        used
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn position(&self, trigger: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.trigger == trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(dir: &tempfile::TempDir) -> RuleStore {
        RuleStore::load(dir.path().join("subtext.json")).unwrap()
    }

    #[test]
    fn missing_file_loads_as_empty_store() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn empty_file_loads_as_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subtext.json");
        fs::write(&path, "  \n").unwrap();
        let store = RuleStore::load(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_load_round_trips_every_field() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        store.add("btw".to_string(), "by the way".to_string()).unwrap();
        store.add("sig".to_string(), "Best,\nGokul".to_string()).unwrap();
        store.record_use("btw").unwrap();

        let reloaded = RuleStore::load(store.path()).unwrap();
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn load_preserves_insertion_order() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        for trigger in ["zz", "aa", "mm"] {
            store.add(trigger.to_string(), "x".to_string()).unwrap();
        }

        let reloaded = RuleStore::load(store.path()).unwrap();
        let order: Vec<&str> = reloaded
            .entries()
            .iter()
            .map(|e| e.trigger.as_str())
            .collect();
        assert_eq!(order, vec!["zz", "aa", "mm"]);
    }

    #[test]
    fn legacy_format_is_migrated_and_written_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subtext.json");
        fs::write(&path, r#"{"btw": "by the way", "omw": "on my way"}"#).unwrap();

        let store = RuleStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);
        for entry in store.entries() {
            assert_eq!(entry.usage_count, 0);
            assert!(entry.last_used.is_none());
            assert!(!entry.created_at.is_empty());
        }

        // The upgraded shape must already be on disk before load() returned.
        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["btw"]["text"], "by the way");
        assert_eq!(on_disk["btw"]["usage_count"], 0);
        assert_eq!(on_disk["omw"]["last_used"], Value::Null);
    }

    #[test]
    fn add_rejects_empty_and_whitespace_triggers() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        assert!(matches!(
            store.add(String::new(), "x".to_string()),
            Err(SubtextError::InvalidTrigger(_))
        ));
        assert!(matches!(
            store.add("two words".to_string(), "x".to_string()),
            Err(SubtextError::InvalidTrigger(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn add_overwrite_resets_stats_and_keeps_position() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        store.add("first".to_string(), "1".to_string()).unwrap();
        store.add("btw".to_string(), "by the way".to_string()).unwrap();
        store.add("last".to_string(), "3".to_string()).unwrap();
        store.record_use("btw").unwrap();

        store.add("btw".to_string(), "between".to_string()).unwrap();
        let entry = store.find("btw").unwrap();
        assert_eq!(entry.text, "between");
        assert_eq!(entry.usage_count, 0);
        assert!(entry.last_used.is_none());
        assert_eq!(store.entries()[1].trigger, "btw");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_missing_trigger_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        store.add("btw".to_string(), "by the way".to_string()).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        assert!(matches!(
            store.remove("nonexistent"),
            Err(SubtextError::RuleNotFound(_))
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn remove_deletes_and_persists() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        store.add("btw".to_string(), "by the way".to_string()).unwrap();
        store.remove("btw").unwrap();
        assert!(store.is_empty());

        let reloaded = RuleStore::load(store.path()).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn record_use_is_persisted() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        store.add("btw".to_string(), "by the way".to_string()).unwrap();
        store.record_use("btw").unwrap();
        store.record_use("btw").unwrap();

        let reloaded = RuleStore::load(store.path()).unwrap();
        let entry = reloaded.find("btw").unwrap();
        assert_eq!(entry.usage_count, 2);
        assert!(entry.last_used.is_some());
    }

    #[test]
    fn top_by_usage_sorts_descending_with_stable_ties() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        for trigger in ["a", "b", "c"] {
            store.add(trigger.to_string(), "x".to_string()).unwrap();
        }
        store.record_use("b").unwrap();
        store.record_use("b").unwrap();
        store.record_use("c").unwrap();

        let top: Vec<&str> = store
            .top_by_usage(5)
            .iter()
            .map(|e| e.trigger.as_str())
            .collect();
        assert_eq!(top, vec!["b", "c", "a"]);

        // "a" and "d" both have zero uses; insertion order breaks the tie.
        store.add("d".to_string(), "x".to_string()).unwrap();
        let top: Vec<&str> = store
            .top_by_usage(5)
            .iter()
            .map(|e| e.trigger.as_str())
            .collect();
        assert_eq!(top, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn recently_used_excludes_never_fired_rules() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        for trigger in ["a", "b", "c"] {
            store.add(trigger.to_string(), "x".to_string()).unwrap();
        }
        store.record_use("a").unwrap();
        store.record_use("c").unwrap();

        let recent: Vec<&str> = store
            .recently_used(3)
            .iter()
            .map(|e| e.trigger.as_str())
            .collect();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0], "c");
        assert!(recent.contains(&"a"));
    }

    #[test]
    fn total_uses_sums_across_rules() {
        let dir = tempdir().unwrap();
        let mut store = store_at(&dir);
        store.add("a".to_string(), "x".to_string()).unwrap();
        store.add("b".to_string(), "y".to_string()).unwrap();
        store.record_use("a").unwrap();
        store.record_use("b").unwrap();
        store.record_use("b").unwrap();
        assert_eq!(store.total_uses(), 3);
    }
}
