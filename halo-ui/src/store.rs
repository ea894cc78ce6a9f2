//! Persisted reading state
//!
//! Two small JSON records under fixed keys: the progress map and the daily
//! chapter goal. Every mutation writes through to disk immediately, so a
//! reload observes exactly the last completed mutation. A corrupt record is
//! discarded and the store resets to its default rather than failing the
//! caller.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;

use halo_common::plan::{self, PlanItem};
use halo_common::progress::ProgressMap;
use halo_common::{Error, Result};

/// Storage key for the progress map
pub const CHAPTERS_KEY: &str = "focus-list.chapters.v1";
/// Storage key for the daily chapter goal
pub const DAILY_GOAL_KEY: &str = "focus-list.daily-goal.v1";

const DEFAULT_DAILY_GOAL: u32 = 2;

/// File-backed JSON key-value store (one file per key)
pub struct JsonKvStore {
    dir: PathBuf,
}

impl JsonKvStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read and parse a record. A record that exists but does not parse is
    /// removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let raw = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding corrupt stored record");
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    }

    pub fn put(&self, key: &str, value: &Value) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| Error::Internal(format!("serialize {}: {}", key, e)))?;
        std::fs::write(self.path_for(key), raw)?;
        Ok(())
    }
}

/// Snapshot of overall completion, for the progress report
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressSummary {
    pub completed: u32,
    pub total: u32,
    pub percent: u32,
}

/// Owner of the progress map and daily goal, with write-through persistence
pub struct ProgressStore {
    kv: JsonKvStore,
    progress: RwLock<ProgressMap>,
    daily_goal: RwLock<u32>,
}

impl ProgressStore {
    /// Load persisted state from the data directory.
    ///
    /// Unparseable or non-object progress resets to empty; the goal is
    /// clamped into range and defaults to 2 when absent or invalid.
    pub fn load(data_dir: &Path) -> Self {
        let kv = JsonKvStore::new(data_dir);

        let progress = kv
            .get(CHAPTERS_KEY)
            .and_then(|value| {
                if !value.is_object() {
                    tracing::warn!("Stored progress is not an object; resetting");
                    return None;
                }
                serde_json::from_value::<ProgressMap>(value).ok()
            })
            .map(|mut p| {
                p.sanitize();
                p
            })
            .unwrap_or_default();

        let daily_goal = kv
            .get(DAILY_GOAL_KEY)
            .and_then(|value| value.as_u64())
            .filter(|&g| g > 0)
            .map(|g| plan::clamp_goal(g.min(u32::MAX as u64) as u32))
            .unwrap_or(DEFAULT_DAILY_GOAL);

        tracing::info!(
            completed = progress.completed_count(),
            daily_goal,
            "Loaded reading progress"
        );

        Self {
            kv,
            progress: RwLock::new(progress),
            daily_goal: RwLock::new(daily_goal),
        }
    }

    /// Current progress map snapshot
    pub fn progress(&self) -> ProgressMap {
        self.progress.read().expect("progress lock").clone()
    }

    pub fn daily_goal(&self) -> u32 {
        *self.daily_goal.read().expect("goal lock")
    }

    pub fn summary(&self) -> ProgressSummary {
        let progress = self.progress.read().expect("progress lock");
        ProgressSummary {
            completed: progress.completed_count(),
            total: halo_common::catalog::total_chapters(),
            percent: progress.percent_complete(),
        }
    }

    /// Flip one chapter's read state and persist
    pub fn toggle(&self, book: &str, chapter: u32) -> Result<ProgressMap> {
        let snapshot = {
            let mut progress = self.progress.write().expect("progress lock");
            progress.toggle(book, chapter);
            progress.clone()
        };
        self.persist_progress(&snapshot)?;
        Ok(snapshot)
    }

    /// Mark every plan item read and persist
    pub fn mark_read(&self, items: &[PlanItem]) -> Result<ProgressMap> {
        let snapshot = {
            let mut progress = self.progress.write().expect("progress lock");
            plan::mark_read(&mut progress, items);
            progress.clone()
        };
        self.persist_progress(&snapshot)?;
        Ok(snapshot)
    }

    /// Set the daily goal (clamped to the supported range) and persist
    pub fn set_daily_goal(&self, goal: u32) -> Result<u32> {
        let goal = plan::clamp_goal(goal);
        *self.daily_goal.write().expect("goal lock") = goal;
        self.kv.put(DAILY_GOAL_KEY, &Value::from(goal))?;
        Ok(goal)
    }

    fn persist_progress(&self, progress: &ProgressMap) -> Result<()> {
        let value = serde_json::to_value(progress)
            .map_err(|e| Error::Internal(format!("serialize progress: {}", e)))?;
        self.kv.put(CHAPTERS_KEY, &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProgressStore::load(tmp.path());
        assert_eq!(store.progress().completed_count(), 0);
        assert_eq!(store.daily_goal(), 2);
    }

    #[test]
    fn test_toggle_persists_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let store = ProgressStore::load(tmp.path());
            store.toggle("John", 3).unwrap();
            store.set_daily_goal(5).unwrap();
        }

        let store = ProgressStore::load(tmp.path());
        assert!(store.progress().is_read("John", 3));
        assert_eq!(store.daily_goal(), 5);
    }

    #[test]
    fn test_corrupt_progress_resets_and_removes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(format!("{}.json", CHAPTERS_KEY));
        std::fs::write(&path, "{not json").unwrap();

        let store = ProgressStore::load(tmp.path());
        assert_eq!(store.progress().completed_count(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_non_object_progress_resets() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(format!("{}.json", CHAPTERS_KEY));
        std::fs::write(&path, "[1,2,3]").unwrap();

        let store = ProgressStore::load(tmp.path());
        assert_eq!(store.progress().completed_count(), 0);
    }

    #[test]
    fn test_out_of_range_goal_is_clamped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(format!("{}.json", DAILY_GOAL_KEY)),
            "99",
        )
        .unwrap();

        let store = ProgressStore::load(tmp.path());
        assert_eq!(store.daily_goal(), 6);
    }

    #[test]
    fn test_invalid_stored_entries_sanitized_on_load() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(format!("{}.json", CHAPTERS_KEY)),
            r#"{"Genesis":[1,99],"Hezekiah":[1]}"#,
        )
        .unwrap();

        let store = ProgressStore::load(tmp.path());
        let progress = store.progress();
        assert!(progress.is_read("Genesis", 1));
        assert_eq!(progress.completed_count(), 1);
    }

    #[test]
    fn test_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProgressStore::load(tmp.path());
        store.toggle("Genesis", 1).unwrap();

        let summary = store.summary();
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.total, 1189);
        assert_eq!(summary.percent, 0); // 1/1189 rounds to 0
    }
}
