//! Persisted session identity with time-based expiry.
//!
//! The signed-in username and the session start time live in the
//! key-value store. On startup the session is restored only while it is
//! younger than 24 hours; anything older (or unreadable) is cleared.

use crate::error::Result;
use crate::storage::{KvStore, KEY_SESSION_STARTED, KEY_USER};

/// Sessions expire this long after they start.
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Reads the persisted session, returning the username only while the
/// session is younger than [`SESSION_TTL_MS`]. An expired, partial, or
/// unparseable session clears both keys and yields nothing.
pub fn restore_session(store: &mut KvStore, now_ms: i64) -> Option<String> {
    let username = store.get(KEY_USER).map(str::to_string);
    let started = store
        .get(KEY_SESSION_STARTED)
        .and_then(|value| value.parse::<i64>().ok());

    match (username, started) {
        (Some(username), Some(started)) if now_ms - started < SESSION_TTL_MS => Some(username),
        (None, None) => None,
        _ => {
            if let Err(err) = clear_session(store) {
                tracing::warn!(error = %err, "Failed to clear expired session");
            }
            None
        }
    }
}

/// Persists the username and session start time.
pub fn start_session(store: &mut KvStore, username: &str, now_ms: i64) -> Result<()> {
    store.set(KEY_USER, username)?;
    store.set(KEY_SESSION_STARTED, now_ms.to_string())
}

/// Clears both persisted session keys.
pub fn clear_session(store: &mut KvStore) -> Result<()> {
    store.remove_many(&[KEY_USER, KEY_SESSION_STARTED])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageConfig;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, KvStore) {
        let tmp = TempDir::new().expect("temp dir");
        let config = StorageConfig::with_root(tmp.path().to_path_buf());
        let store = KvStore::open(&config);
        (tmp, store)
    }

    #[test]
    fn restores_fresh_session() {
        let (_tmp, mut store) = open_store();
        start_session(&mut store, "alice", 1_000_000).expect("start");

        let restored = restore_session(&mut store, 1_000_000 + 60_000);
        assert_eq!(restored.as_deref(), Some("alice"));
        // Keys remain for the next restore.
        assert_eq!(store.get(KEY_USER), Some("alice"));
    }

    #[test]
    fn restores_just_under_the_ttl() {
        let (_tmp, mut store) = open_store();
        start_session(&mut store, "alice", 0).expect("start");

        let restored = restore_session(&mut store, SESSION_TTL_MS - 1);
        assert_eq!(restored.as_deref(), Some("alice"));
    }

    #[test]
    fn exactly_24_hours_is_expired() {
        let (_tmp, mut store) = open_store();
        start_session(&mut store, "alice", 0).expect("start");

        let restored = restore_session(&mut store, SESSION_TTL_MS);
        assert_eq!(restored, None);
        assert_eq!(store.get(KEY_USER), None);
        assert_eq!(store.get(KEY_SESSION_STARTED), None);
    }

    #[test]
    fn expired_session_clears_storage() {
        let (_tmp, mut store) = open_store();
        start_session(&mut store, "alice", 0).expect("start");

        let restored = restore_session(&mut store, SESSION_TTL_MS + 5_000);
        assert_eq!(restored, None);
        assert_eq!(store.get(KEY_USER), None);
    }

    #[test]
    fn unparseable_start_time_counts_as_expired() {
        let (_tmp, mut store) = open_store();
        store.set(KEY_USER, "alice").expect("set");
        store.set(KEY_SESSION_STARTED, "not-a-number").expect("set");

        assert_eq!(restore_session(&mut store, 1_000), None);
        assert_eq!(store.get(KEY_USER), None);
    }

    #[test]
    fn username_without_start_time_is_cleared() {
        let (_tmp, mut store) = open_store();
        store.set(KEY_USER, "alice").expect("set");

        assert_eq!(restore_session(&mut store, 1_000), None);
        assert_eq!(store.get(KEY_USER), None);
    }

    #[test]
    fn empty_store_restores_nothing() {
        let (_tmp, mut store) = open_store();
        assert_eq!(restore_session(&mut store, 1_000), None);
    }
}
