//! Activity timeline and comment thread engines for a code-review UI.
//!
//! Two independent, pure engines over the same domain model:
//!
//! - [`timeline`] merges a change's authored messages and reviewer updates into
//!   one chronological sequence, groups related events by tag, carries
//!   patchset numbers forward, and decides which events are shown by default.
//! - [`threads`] and [`filter`] order comment threads deterministically and
//!   apply the thread list's filter selection, never hiding a thread that is
//!   being edited.
//!
//! Neither engine does I/O or keeps state between calls. Callers re-run them
//! whenever an input changes.

pub mod config;
pub mod error;
pub mod filter;
pub mod snapshot;
pub mod tags;
pub mod threads;
pub mod timeline;
pub mod timestamp;
pub mod types;

pub use error::{Error, Result};
pub use timestamp::Timestamp;
