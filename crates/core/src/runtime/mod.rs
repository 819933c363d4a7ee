//! Host-side runtime pieces that are not tied to a particular bundler.

mod watch;

pub use watch::{DEBOUNCE_INTERVAL, NotifyWatcher, translate_event};
