//! # weblock-core
//!
//! Core library for the WebLocker dashboard, providing shared business
//! logic for any client shell.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The app shell wraps
//!   these pieces in its own event loop.
//! - **Not thread-safe**: The owning controller serializes all access.
//! - **Graceful degradation**: Missing or corrupt persisted state loads
//!   as empty, never as an error surfaced to the user.
//! - **Server-authoritative**: The protected-website list is only ever
//!   replaced wholesale from server responses, never patched locally.

// Public modules
pub mod activity;
pub mod config;
pub mod error;
pub mod hostname;
pub mod session;
pub mod storage;
pub mod types;
pub mod unlock;

// Re-export commonly used items at crate root
pub use activity::{ActivityLog, MAX_ACTIVITY_ENTRIES};
pub use config::{load_config, AppConfig, DEFAULT_API_BASE_URL};
pub use error::{Result, WeblockError};
pub use hostname::normalize_host;
pub use session::{clear_session, restore_session, start_session, SESSION_TTL_MS};
pub use storage::{KvStore, StorageConfig, KEY_ACTIVITY, KEY_SESSION_STARTED, KEY_USER};
pub use types::{ActivityEntry, ActivityStatus, WebsiteStats};
pub use unlock::{format_minutes, format_relative, remaining_minutes, UNLOCK_WINDOW_MINUTES};

// Wire types shared with the protocol crate
pub use weblock_api_protocol::{Website, WebsiteMap};
