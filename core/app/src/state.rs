//! In-memory dashboard state owned by the controller.

use std::collections::HashMap;
use weblock_core::{WebsiteMap, WebsiteStats};

/// Privileged action staged behind the re-authentication gate.
///
/// A tagged variant rather than a stored closure: successful re-auth
/// takes and dispatches it exactly once, cancel discards it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingAction {
    #[default]
    None,
    Lock(String),
    Unlock(String),
    Remove(String),
}

/// A field-scoped error plus the generation that created it, so a stale
/// expiry event cannot clear a newer message.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldError {
    message: String,
    generation: u64,
}

/// All mutable dashboard state. Mutated only from controller methods, so
/// handlers never interleave.
#[derive(Debug, Default)]
pub struct AppState {
    pub current_user: Option<String>,
    pub websites: WebsiteMap,
    pub pending: PendingAction,
    errors: HashMap<String, FieldError>,
    error_generation: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire website map with the server's snapshot.
    /// There are no partial updates; the server owns the list.
    pub fn replace_websites(&mut self, websites: WebsiteMap) {
        self.websites = websites;
    }

    pub fn stats(&self) -> WebsiteStats {
        WebsiteStats::from_map(&self.websites)
    }

    /// Stores a field-scoped message, returning the generation the
    /// caller schedules the expiry against.
    pub fn set_error(&mut self, field: &str, message: impl Into<String>) -> u64 {
        self.error_generation += 1;
        let generation = self.error_generation;
        self.errors.insert(
            field.to_string(),
            FieldError {
                message: message.into(),
                generation,
            },
        );
        generation
    }

    /// Clears the field's message only if it still belongs to the
    /// expired generation.
    pub fn expire_error(&mut self, field: &str, generation: u64) {
        if self.errors.get(field).map(|e| e.generation) == Some(generation) {
            self.errors.remove(field);
        }
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|e| e.message.as_str())
    }

    /// Takes the staged privileged action, leaving none in place.
    pub fn take_pending(&mut self) -> PendingAction {
        std::mem::take(&mut self.pending)
    }

    /// Resets everything tied to the signed-in user.
    pub fn clear_for_logout(&mut self) {
        self.current_user = None;
        self.websites.clear();
        self.pending = PendingAction::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weblock_api_protocol::Website;

    #[test]
    fn expire_only_clears_matching_generation() {
        let mut state = AppState::new();
        let first = state.set_error("login", "first");
        let second = state.set_error("login", "second");

        // The sleeper for the first message fires late; the newer message
        // must survive it.
        state.expire_error("login", first);
        assert_eq!(state.error("login"), Some("second"));

        state.expire_error("login", second);
        assert_eq!(state.error("login"), None);
    }

    #[test]
    fn errors_are_scoped_per_field() {
        let mut state = AppState::new();
        state.set_error("login", "bad credentials");
        let add_generation = state.set_error("addWebsite", "bad url");

        state.expire_error("addWebsite", add_generation);
        assert_eq!(state.error("login"), Some("bad credentials"));
        assert_eq!(state.error("addWebsite"), None);
    }

    #[test]
    fn take_pending_yields_the_action_once() {
        let mut state = AppState::new();
        state.pending = PendingAction::Unlock("example.com".to_string());

        assert_eq!(
            state.take_pending(),
            PendingAction::Unlock("example.com".to_string())
        );
        assert_eq!(state.take_pending(), PendingAction::None);
    }

    #[test]
    fn replace_websites_is_wholesale() {
        let mut state = AppState::new();
        let mut first = WebsiteMap::new();
        first.insert("a.com".to_string(), Website::default());
        state.replace_websites(first);

        let mut second = WebsiteMap::new();
        second.insert(
            "b.com".to_string(),
            Website {
                locked: true,
                unlock_timestamp: None,
            },
        );
        state.replace_websites(second);

        assert!(!state.websites.contains_key("a.com"));
        assert!(state.websites.contains_key("b.com"));
    }

    #[test]
    fn logout_clears_user_scoped_state() {
        let mut state = AppState::new();
        state.current_user = Some("alice".to_string());
        state
            .websites
            .insert("a.com".to_string(), Website::default());
        state.pending = PendingAction::Remove("a.com".to_string());

        state.clear_for_logout();

        assert_eq!(state.current_user, None);
        assert!(state.websites.is_empty());
        assert_eq!(state.pending, PendingAction::None);
    }
}
