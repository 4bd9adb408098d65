//! Thread list display pipeline.
//!
//! Given the raw thread collection, [`display_threads`] derives what the thread
//! list shows:
//!
//! 1. Base visibility: optionally drop robot threads nobody has replied to.
//! 2. Sort with [`compare_threads`].
//! 3. Display filter: author chips, then the single-select filter mode.
//!
//! A thread the user is currently editing passes step 3 unconditionally, so an
//! in-progress reply never disappears because a filter stopped matching.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::threads::{compare_threads, SortMode};
use crate::types::{AccountId, CommentId, CommentThread};

/// Single-select filter mode of the thread list.
///
/// Choosing one mode replaces the previous one; "unresolved only" and
/// "drafts only" can never be active together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentFilter {
    #[default]
    All,
    /// Threads whose last comment leaves them unresolved.
    Unresolved,
    /// Threads with at least one draft.
    Drafts,
    /// Unresolved threads that `@`-mention the viewer.
    Mentions,
}

/// The signed-in user, as far as filtering needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub account_id: AccountId,
    pub email: Option<String>,
}

/// Filter and sort selection of one thread list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadListState {
    pub filter: CommentFilter,
    pub sort: SortMode,
    /// Author chips; empty means no author restriction.
    pub selected_authors: BTreeSet<AccountId>,
    /// Hide robot threads that have no human reply.
    pub only_robot_with_human_reply: bool,
}

impl ThreadListState {
    pub fn set_filter(&mut self, filter: CommentFilter) {
        self.filter = filter;
    }

    /// Selects `author` if unselected, deselects it otherwise.
    ///
    /// Returns whether the author is selected afterwards.
    pub fn toggle_author(&mut self, author: AccountId) -> bool {
        if self.selected_authors.remove(&author) {
            false
        } else {
            self.selected_authors.insert(author);
            true
        }
    }

    pub fn clear_authors(&mut self) {
        self.selected_authors.clear();
    }

    /// Step 1 of the pipeline.
    pub fn is_base_visible(&self, thread: &CommentThread) -> bool {
        !(self.only_robot_with_human_reply
            && thread.is_robot_thread()
            && !thread.has_human_reply())
    }

    /// Step 3 of the pipeline, ignoring the editing exemption.
    pub fn matches(&self, thread: &CommentThread, viewer: Option<&Viewer>) -> bool {
        self.matches_authors(thread) && matches_filter(self.filter, thread, viewer)
    }

    fn matches_authors(&self, thread: &CommentThread) -> bool {
        self.selected_authors.is_empty()
            || self
                .selected_authors
                .iter()
                .any(|author| thread.has_comment_by(*author))
    }
}

/// Whether `thread` passes `filter` alone.
pub fn matches_filter(filter: CommentFilter, thread: &CommentThread, viewer: Option<&Viewer>) -> bool {
    match filter {
        CommentFilter::All => true,
        CommentFilter::Unresolved => thread.is_unresolved(),
        CommentFilter::Drafts => thread.has_draft(),
        CommentFilter::Mentions => {
            let email = viewer.and_then(|v| v.email.as_deref());
            thread.is_unresolved() && email.is_some_and(|e| thread.mentions(e))
        }
    }
}

/// Runs the full pipeline and returns the threads to show, in display order.
///
/// `editing` holds the root ids of threads the user has open for editing.
pub fn display_threads<'a>(
    state: &ThreadListState,
    threads: &'a [CommentThread],
    editing: &HashSet<CommentId>,
    viewer: Option<&Viewer>,
) -> Vec<&'a CommentThread> {
    let mut visible: Vec<&CommentThread> = threads
        .iter()
        .filter(|t| state.is_base_visible(t))
        .collect();
    visible.sort_by(|a, b| compare_threads(a, b, state.sort));
    visible.retain(|t| editing.contains(&t.root_id) || state.matches(t, viewer));

    tracing::debug!(
        total = threads.len(),
        shown = visible.len(),
        filter = ?state.filter,
        editing = editing.len(),
        "derived thread list"
    );
    visible
}

/// Distinct comment authors across `threads`, in first-seen order.
pub fn thread_authors(threads: &[CommentThread]) -> Vec<AccountId> {
    let mut seen = HashSet::new();
    threads
        .iter()
        .flat_map(|t| t.comments.iter())
        .filter_map(|c| c.author)
        .filter(|a| seen.insert(*a))
        .collect()
}

/// How many base-visible threads each filter mode would show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub unresolved: usize,
    pub drafts: usize,
    pub mentions: usize,
}

/// Counts per filter mode, respecting the base visibility filter but not the
/// author chips.
pub fn filter_counts(
    state: &ThreadListState,
    threads: &[CommentThread],
    viewer: Option<&Viewer>,
) -> FilterCounts {
    let mut counts = FilterCounts::default();
    for thread in threads.iter().filter(|t| state.is_base_visible(t)) {
        counts.all += 1;
        if matches_filter(CommentFilter::Unresolved, thread, viewer) {
            counts.unresolved += 1;
        }
        if matches_filter(CommentFilter::Drafts, thread, viewer) {
            counts.drafts += 1;
        }
        if matches_filter(CommentFilter::Mentions, thread, viewer) {
            counts.mentions += 1;
        }
    }
    counts
}
