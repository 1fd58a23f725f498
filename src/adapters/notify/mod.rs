//! Notifier adapters.
//!
//! - **TracingNotifier** - Toasts as tracing events (terminal, headless)
//! - **RecordingNotifier** - Toasts kept in memory (UI layer, tests)

mod recording_notifier;
mod tracing_notifier;

pub use recording_notifier::RecordingNotifier;
pub use tracing_notifier::TracingNotifier;
