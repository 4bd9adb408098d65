//! Change snapshots: everything the engines need about one change, as JSON.
//!
//! Fetching this data from a server is someone else's job. A snapshot is what
//! such a fetcher hands over, plus the bits of presentation state (who is
//! looking, which threads are open for editing) the thread filter needs.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::Viewer;
use crate::types::{ChangeMessageInfo, CommentId, CommentThread, ReviewerUpdateInfo};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeSnapshot {
    /// Authored messages, ascending by date.
    pub messages: Vec<ChangeMessageInfo>,
    /// Reviewer updates, ascending by date.
    pub reviewer_updates: Vec<ReviewerUpdateInfo>,
    pub threads: Vec<CommentThread>,
    pub viewer: Option<Viewer>,
    /// Root ids of threads open for editing.
    pub editing: Vec<CommentId>,
}

impl ChangeSnapshot {
    /// Reads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Json`] if
    /// its contents are not a snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        let snapshot: Self = serde_json::from_str(&raw).map_err(|source| Error::Json {
            path: path.to_owned(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            messages = snapshot.messages.len(),
            reviewer_updates = snapshot.reviewer_updates.len(),
            threads = snapshot.threads.len(),
            "loaded change snapshot"
        );
        Ok(snapshot)
    }

    pub fn editing_set(&self) -> HashSet<CommentId> {
        self.editing.iter().cloned().collect()
    }
}
