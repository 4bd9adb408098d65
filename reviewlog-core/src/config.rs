//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/reviewlog/config.toml`, falling back to
//! `~/.config/reviewlog/config.toml`. Every key is optional:
//!
//! ```toml
//! [timeline]
//! show_all_activity = false
//!
//! [threads]
//! sort = "by_timestamp"      # or "by_file"
//! filter = "unresolved"      # all | unresolved | drafts | mentions
//! only_robot_with_human_reply = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::filter::{CommentFilter, ThreadListState};
use crate::threads::SortMode;
use crate::timeline::TimelineView;

/// Timeline defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub show_all_activity: bool,
}

/// Thread list defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThreadListConfig {
    pub sort: SortMode,
    pub filter: CommentFilter,
    pub only_robot_with_human_reply: bool,
}

/// Top-level config file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timeline: TimelineConfig,
    pub threads: ThreadListConfig,
}

/// Returns the path to the reviewlog config file.
///
/// Prefers `$XDG_CONFIG_HOME/reviewlog/config.toml`; falls back to
/// `~/.config/reviewlog/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("reviewlog").join("config.toml")
}

impl Config {
    /// Loads the config from [`config_path`].
    ///
    /// Never fails: a missing file yields defaults, and an unreadable or
    /// malformed file is logged and yields defaults too.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Loads the config from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Toml`] if it
    /// does not parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| Error::Toml {
            path: path.to_owned(),
            source,
        })
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn timeline_view(&self) -> TimelineView {
        TimelineView::new(self.timeline.show_all_activity)
    }

    /// Initial thread list selection; no authors are preselected.
    pub fn thread_list_state(&self) -> ThreadListState {
        ThreadListState {
            filter: self.threads.filter,
            sort: self.threads.sort,
            selected_authors: Default::default(),
            only_robot_with_human_reply: self.threads.only_robot_with_human_reply,
        }
    }
}
