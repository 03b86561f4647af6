//! Action handlers for the dashboard controller.
//!
//! [`App`] is the root controller: it owns all mutable state and every
//! mutation flows through these methods, either directly from the front
//! end or via [`App::handle_event`] for scheduled work. Each handler
//! validates locally, makes at most one network call, replaces the whole
//! website map from the response, and records one activity entry for the
//! outcome.

use crate::client::ApiClient;
use crate::events::{AppEvent, EventSender};
use crate::state::{AppState, PendingAction};
use crate::timers::{TickOutcome, TimerManager};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};
use weblock_api_protocol::{AuthActionRequest, LoginRequest, UserLookupRequest};
use weblock_core::{
    normalize_host, remaining_minutes, session, ActivityLog, ActivityStatus, KvStore,
    UNLOCK_WINDOW_MINUTES,
};

/// How long a field-scoped error stays visible.
pub const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

// The demo account is rejected locally, before any network call. This is
// a literal allow-list exclusion for one credential pair, not an auth
// policy.
const RESTRICTED_USERNAME: &str = "demo";
const RESTRICTED_PASSWORD: &str = "6996";
const RESTRICTED_MESSAGE: &str = "Demo account access restricted in app.";

const SERVER_UNREACHABLE: &str = "Unable to reach the server. Please try again.";

/// Fields that error messages scope to.
pub mod fields {
    pub const LOGIN: &str = "login";
    pub const ADD_WEBSITE: &str = "addWebsite";
    pub const AUTH: &str = "auth";
}

/// Root controller owning all mutable dashboard state.
pub struct App {
    pub state: AppState,
    pub timers: TimerManager,
    pub activity: ActivityLog,
    client: ApiClient,
    store: KvStore,
    events: EventSender,
}

impl App {
    pub fn new(client: ApiClient, store: KvStore, events: EventSender) -> Self {
        let activity = ActivityLog::load(&store);
        Self {
            state: AppState::new(),
            timers: TimerManager::new(),
            activity,
            client,
            store,
            events,
        }
    }

    /// Restores a persisted session and, when one is live, loads the
    /// user's websites. Returns whether a session was restored.
    pub async fn restore(&mut self) -> bool {
        let now_ms = Utc::now().timestamp_millis();
        match session::restore_session(&mut self.store, now_ms) {
            Some(username) => {
                self.state.current_user = Some(username);
                self.load_user_data().await;
                true
            }
            None => false,
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            self.show_error(fields::LOGIN, "Please enter both username and password");
            return false;
        }
        if username == RESTRICTED_USERNAME && password == RESTRICTED_PASSWORD {
            self.show_error(fields::LOGIN, RESTRICTED_MESSAGE);
            return false;
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.client.login(&request).await {
            Ok(response) if response.success => {
                self.state.current_user = Some(username.to_string());
                let now_ms = Utc::now().timestamp_millis();
                if let Err(err) = session::start_session(&mut self.store, username, now_ms) {
                    warn!(error = %err, "Failed to persist session");
                }
                self.record_activity(
                    "Login",
                    &format!("User \"{}\" logged in successfully", username),
                    ActivityStatus::Success,
                );
                self.load_user_data().await;
                true
            }
            Ok(response) => {
                self.record_activity(
                    "Login Failed",
                    &format!("Failed login attempt for user \"{}\"", username),
                    ActivityStatus::Error,
                );
                let message = response
                    .message
                    .unwrap_or_else(|| "Login failed".to_string());
                self.show_error(fields::LOGIN, message);
                false
            }
            Err(err) => {
                debug!(error = %err, "Login request failed");
                self.show_error(fields::LOGIN, SERVER_UNREACHABLE);
                false
            }
        }
    }

    /// Ends the session: clears persisted keys, user-scoped state, and
    /// every countdown.
    pub fn logout(&mut self) {
        if let Err(err) = session::clear_session(&mut self.store) {
            warn!(error = %err, "Failed to clear persisted session");
        }
        if let Some(username) = self.state.current_user.clone() {
            self.record_activity(
                "Logout",
                &format!("User \"{}\" logged out", username),
                ActivityStatus::Info,
            );
        }
        self.state.clear_for_logout();
        self.timers.cancel_all();
    }

    /// Pulls the authoritative website snapshot and rebuilds countdowns
    /// from the server-reported unlock times.
    pub async fn load_user_data(&mut self) {
        let Some(username) = self.state.current_user.clone() else {
            return;
        };

        let request = UserLookupRequest { username };
        match self.client.user_lookup(&request).await {
            Ok(response) if response.success => {
                self.state.replace_websites(response.websites_or_empty());
                self.reconcile_timers();
            }
            Ok(_) => debug!("User lookup rejected by server"),
            Err(err) => warn!(error = %err, "Failed to load user data"),
        }
    }

    pub async fn add_website(&mut self, url: &str) -> bool {
        let Some(username) = self.state.current_user.clone() else {
            return false;
        };

        let url = url.trim();
        if url.is_empty() {
            self.show_error(fields::ADD_WEBSITE, "Please enter a website URL");
            return false;
        }

        let host = normalize_host(url);
        if self.state.websites.contains_key(&host) {
            self.show_error(
                fields::ADD_WEBSITE,
                "This website is already in your protected list",
            );
            return false;
        }

        let request = AuthActionRequest::add(username, url);
        match self.client.auth_action(&request).await {
            Ok(response) if response.success => {
                self.state.replace_websites(response.websites_or_empty());
                self.record_activity(
                    "Website Added",
                    &format!("Added \"{}\" to protected websites list", host),
                    ActivityStatus::Success,
                );
                true
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Failed to add website".to_string());
                self.show_error(fields::ADD_WEBSITE, message);
                false
            }
            Err(err) => {
                debug!(error = %err, "Add website request failed");
                self.show_error(fields::ADD_WEBSITE, SERVER_UNREACHABLE);
                false
            }
        }
    }

    /// Stages a privileged action behind the re-authentication gate. The
    /// front end prompts for admin credentials once something is staged.
    pub fn request_privileged(&mut self, action: PendingAction) {
        self.state.pending = action;
    }

    /// Discards the staged action without running it.
    pub fn cancel_reauth(&mut self) {
        self.state.pending = PendingAction::None;
    }

    /// Re-authenticates and, on success, runs the staged action exactly
    /// once. A failed re-auth keeps the action staged so credentials can
    /// be retried.
    pub async fn confirm_reauth(&mut self, username: &str, password: &str) -> bool {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            self.show_error(fields::AUTH, "Please enter both username and password");
            return false;
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.client.login(&request).await {
            Ok(response) if response.success => {
                self.record_activity(
                    "Admin Authentication",
                    "Admin authenticated successfully",
                    ActivityStatus::Success,
                );
                match self.state.take_pending() {
                    PendingAction::None => true,
                    PendingAction::Lock(host) => self.lock_website(&host, false).await,
                    PendingAction::Unlock(host) => self.unlock_website(&host).await,
                    PendingAction::Remove(host) => self.remove_website(&host).await,
                }
            }
            Ok(_) => {
                self.record_activity(
                    "Admin Authentication Failed",
                    "Failed admin authentication attempt",
                    ActivityStatus::Error,
                );
                self.show_error(fields::AUTH, "Invalid admin credentials");
                false
            }
            Err(err) => {
                debug!(error = %err, "Re-authentication request failed");
                self.show_error(fields::AUTH, SERVER_UNREACHABLE);
                false
            }
        }
    }

    /// Locks a host. `auto` marks the entry as system-triggered; failures
    /// on the auto path are swallowed to diagnostics.
    pub async fn lock_website(&mut self, host: &str, auto: bool) -> bool {
        let Some(username) = self.state.current_user.clone() else {
            return false;
        };

        let request = AuthActionRequest::toggle(username, host, true);
        match self.client.auth_action(&request).await {
            Ok(response) if response.success => {
                self.state.replace_websites(response.websites_or_empty());
                self.timers.cancel(host);
                let details = if auto {
                    format!("\"{}\" has been locked (auto-lock)", host)
                } else {
                    format!("\"{}\" has been locked", host)
                };
                self.record_activity("Website Locked", &details, ActivityStatus::Info);
                true
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Failed to lock website".to_string());
                if auto {
                    warn!(host, message = %message, "Auto-lock rejected by server");
                } else {
                    self.show_error(fields::AUTH, message);
                }
                false
            }
            Err(err) => {
                if auto {
                    // Fire-and-forget: no retry, nothing surfaced. Server
                    // state self-corrects on the next load.
                    warn!(host, error = %err, "Auto-lock request failed");
                } else {
                    self.show_error(fields::AUTH, SERVER_UNREACHABLE);
                }
                false
            }
        }
    }

    /// Unlocks a host for the fixed 60-minute window and starts its
    /// countdown.
    pub async fn unlock_website(&mut self, host: &str) -> bool {
        let Some(username) = self.state.current_user.clone() else {
            return false;
        };

        let request = AuthActionRequest::toggle(username, host, false);
        match self.client.auth_action(&request).await {
            Ok(response) if response.success => {
                self.state.replace_websites(response.websites_or_empty());
                self.timers
                    .start(host, UNLOCK_WINDOW_MINUTES, self.events.clone());
                self.record_activity(
                    "Website Unlocked",
                    &format!("\"{}\" has been unlocked for 1 hour", host),
                    ActivityStatus::Success,
                );
                true
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Failed to unlock website".to_string());
                self.show_error(fields::AUTH, message);
                false
            }
            Err(err) => {
                debug!(error = %err, "Unlock request failed");
                self.show_error(fields::AUTH, SERVER_UNREACHABLE);
                false
            }
        }
    }

    pub async fn remove_website(&mut self, host: &str) -> bool {
        let Some(username) = self.state.current_user.clone() else {
            return false;
        };

        let request = AuthActionRequest::remove(username, host);
        match self.client.auth_action(&request).await {
            Ok(response) if response.success => {
                self.state.replace_websites(response.websites_or_empty());
                self.timers.cancel(host);
                self.record_activity(
                    "Website Removed",
                    &format!("Removed \"{}\" from protected websites list", host),
                    ActivityStatus::Warning,
                );
                true
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Failed to remove website".to_string());
                self.show_error(fields::AUTH, message);
                false
            }
            Err(err) => {
                debug!(error = %err, "Remove request failed");
                self.show_error(fields::AUTH, SERVER_UNREACHABLE);
                false
            }
        }
    }

    pub fn clear_activity(&mut self) {
        if let Err(err) = self.activity.clear(&mut self.store) {
            warn!(error = %err, "Failed to clear activity log");
        }
    }

    /// Applies one scheduled event inside the controller loop.
    pub async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::UnlockTick(host) => match self.timers.on_tick(&host) {
                Some(TickOutcome::Expired) => {
                    debug!(host = %host, "Unlock window elapsed; locking");
                    self.lock_website(&host, true).await;
                }
                Some(TickOutcome::Continue(remaining)) => {
                    debug!(host = %host, remaining, "Unlock countdown tick");
                }
                None => {}
            },
            AppEvent::ErrorExpired { field, generation } => {
                self.state.expire_error(&field, generation);
            }
        }
    }

    /// Rebuilds countdowns for unlocked hosts. A host whose window has
    /// already elapsed stays without a timer; the server is the source of
    /// truth until the next explicit action.
    fn reconcile_timers(&mut self) {
        let now_secs = Utc::now().timestamp();
        let mut to_start = Vec::new();
        for (host, site) in &self.state.websites {
            if site.locked {
                continue;
            }
            let Some(unlocked_at) = site.unlock_timestamp else {
                continue;
            };
            let remaining = remaining_minutes(unlocked_at, now_secs);
            if remaining > 0 {
                to_start.push((host.clone(), remaining));
            }
        }
        for (host, remaining) in to_start {
            self.timers.start(&host, remaining, self.events.clone());
        }
    }

    /// Stores a field-scoped message and schedules its expiry.
    fn show_error(&mut self, field: &str, message: impl Into<String>) {
        let generation = self.state.set_error(field, message);
        let events = self.events.clone();
        let field = field.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(ERROR_DISPLAY_TIME).await;
            let _ = events.send(AppEvent::ErrorExpired { field, generation });
        });
    }

    fn record_activity(&mut self, action: &str, details: &str, status: ActivityStatus) {
        if let Err(err) = self
            .activity
            .record(&mut self.store, action, details, status)
        {
            warn!(error = %err, "Failed to record activity");
        }
    }
}
