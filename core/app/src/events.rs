//! Events delivered back into the controller loop.

use tokio::sync::mpsc;

/// Messages from scheduled tasks to the single-threaded controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// One minute elapsed on a host's unlock countdown.
    UnlockTick(String),
    /// A field-scoped error message reached its display deadline.
    ErrorExpired { field: String, generation: u64 },
}

pub type EventSender = mpsc::UnboundedSender<AppEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AppEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
