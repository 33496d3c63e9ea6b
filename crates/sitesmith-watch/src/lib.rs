//! Watch mode for sitesmith.
//!
//! Observes a template directory and re-renders through a
//! [`sitesmith_render::Renderer`] until asked to stop.

pub mod reload;
pub mod watcher;

pub use reload::{watch, WatchError, WatchSummary, DEBOUNCE};
pub use watcher::{FileWatcher, WatchEvent};
