//! Shared data types for the WebLocker client core.

use serde::{Deserialize, Serialize};
use weblock_api_protocol::WebsiteMap;

/// Severity attached to an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Info => "info",
            ActivityStatus::Success => "success",
            ActivityStatus::Error => "error",
            ActivityStatus::Warning => "warning",
        }
    }
}

/// A single entry in the local activity log.
///
/// Uses `#[serde(default)]` for forward compatibility - if future versions
/// add fields, old data will still parse correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ActivityEntry {
    /// Unique id, monotonically increasing for the session's lifetime
    #[serde(default)]
    pub id: u64,
    /// RFC 3339 timestamp of when the entry was recorded
    #[serde(default)]
    pub timestamp: String,
    /// Short action label ("Login", "Website Added", ...)
    #[serde(default)]
    pub action: String,
    /// Free-form detail line, may be empty
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub status: ActivityStatus,
}

/// Dashboard counters derived from the website map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WebsiteStats {
    pub total: usize,
    pub locked: usize,
    pub unlocked: usize,
}

impl WebsiteStats {
    pub fn from_map(websites: &WebsiteMap) -> Self {
        let total = websites.len();
        let locked = websites.values().filter(|site| site.locked).count();
        Self {
            total,
            locked,
            unlocked: total - locked,
        }
    }
}
