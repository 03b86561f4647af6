//! WebLocker dashboard runtime.
//!
//! A single-threaded controller owns all mutable state ([`actions::App`]);
//! scheduled work (unlock countdowns, error expiry) re-enters the
//! controller loop as [`events::AppEvent`] messages, so handlers never
//! interleave.

pub mod actions;
pub mod client;
pub mod events;
pub mod state;
pub mod timers;

pub use actions::App;
pub use client::{ApiClient, ApiError};
pub use events::{AppEvent, EventReceiver, EventSender};
pub use state::{AppState, PendingAction};
pub use timers::{TickOutcome, TimerManager};
