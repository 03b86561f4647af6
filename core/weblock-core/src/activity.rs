//! Bounded, newest-first activity log persisted through the key-value
//! store.
//!
//! The log holds at most [`MAX_ACTIVITY_ENTRIES`] entries; older entries
//! fall off the tail. Entry ids come from a monotonic counter seeded from
//! the persisted data, so they stay unique even when several entries are
//! recorded within the same millisecond.

use crate::error::{Result, WeblockError};
use crate::storage::{KvStore, KEY_ACTIVITY};
use crate::types::{ActivityEntry, ActivityStatus};
use chrono::Utc;

/// Oldest entries are dropped past this count.
pub const MAX_ACTIVITY_ENTRIES: usize = 100;

/// In-memory view of the activity log. Entries are newest-first; every
/// mutation persists the truncated list.
#[derive(Debug)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
    next_id: u64,
}

impl ActivityLog {
    /// Loads the stored log.
    ///
    /// Absent or unparseable data is treated as an empty log; the parse
    /// failure only goes to diagnostics, never to the user.
    pub fn load(store: &KvStore) -> Self {
        let entries = match store.get(KEY_ACTIVITY) {
            Some(raw) => match serde_json::from_str::<Vec<ActivityEntry>>(raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to parse stored activity log");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        // Timestamps are not a safe uniqueness key; ids continue past
        // whatever was persisted.
        let next_id = entries.iter().map(|entry| entry.id).max().map_or(1, |id| id + 1);

        Self { entries, next_id }
    }

    /// Newest-first view of the log.
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records an entry at the head of the log and persists the result.
    pub fn record(
        &mut self,
        store: &mut KvStore,
        action: &str,
        details: &str,
        status: ActivityStatus,
    ) -> Result<()> {
        let entry = ActivityEntry {
            id: self.next_id,
            timestamp: Utc::now().to_rfc3339(),
            action: action.to_string(),
            details: details.to_string(),
            status,
        };
        self.next_id += 1;

        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ACTIVITY_ENTRIES);
        self.persist(store)
    }

    /// Empties the log, persists the empty list, then records a single
    /// entry noting the clear.
    pub fn clear(&mut self, store: &mut KvStore) -> Result<()> {
        self.entries.clear();
        self.persist(store)?;
        self.record(
            store,
            "Activity Log Cleared",
            "All activity history has been cleared",
            ActivityStatus::Warning,
        )
    }

    fn persist(&self, store: &mut KvStore) -> Result<()> {
        let raw = serde_json::to_string(&self.entries).map_err(|e| WeblockError::Json {
            context: "Failed to serialize activity log".to_string(),
            source: e,
        })?;
        store.set(KEY_ACTIVITY, raw)
    }
}
