//! Activity timeline: merge, tag grouping, revision carry-forward and
//! importance classification.
//!
//! [`combine_messages`] is a pure function of its three inputs and must be
//! re-run whenever any of them changes; there is no incremental path.
//!
//! # Pipeline
//!
//! 1. Stable two-pointer merge of authored messages and reviewer updates
//!    (authored message first on equal dates), recording each authored
//!    message's position in its input.
//! 2. Comment threads are linked to the authored message that posted them.
//! 3. Revision numbers and grouping tags are resolved for every entry.
//! 4. Importance is classified. This pass reads only the fields written by
//!    pass 3, so it must run after pass 3 has finished for all entries.

use std::iter::Peekable;

use crate::tags;
use crate::timestamp::Timestamp;
use crate::types::{
    ChangeMessageInfo, CombinedMessage, CommentThread, MessageId, MessageSource,
    ReviewerUpdateInfo,
};

/// Builds the decorated timeline for a change.
///
/// Both input sequences are expected in ascending date order. Out-of-order
/// input is logged and merged anyway; the result is then only as ordered as
/// the input allowed.
pub fn combine_messages(
    messages: &[ChangeMessageInfo],
    reviewer_updates: &[ReviewerUpdateInfo],
    threads: &[CommentThread],
) -> Vec<CombinedMessage> {
    tracing::debug!(
        messages = messages.len(),
        reviewer_updates = reviewer_updates.len(),
        threads = threads.len(),
        "combining change messages"
    );

    let mut combined = merge_messages(messages, reviewer_updates);
    link_threads(&mut combined, threads);
    resolve_all(&mut combined);
    classify_all(&mut combined);
    combined
}

/// Merges the two ascending inputs into one ascending sequence.
///
/// On equal dates the authored message is emitted before the reviewer update.
/// Returned entries are undecorated: no threads, no resolved tag or revision,
/// and every entry important.
pub fn merge_messages(
    messages: &[ChangeMessageInfo],
    reviewer_updates: &[ReviewerUpdateInfo],
) -> Vec<CombinedMessage> {
    warn_if_unsorted("messages", messages.iter().map(|m| m.date));
    warn_if_unsorted("reviewer updates", reviewer_updates.iter().map(|u| u.date));

    let mut authored = messages.iter().enumerate().peekable();
    let mut updates = reviewer_updates.iter().peekable();
    let mut merged = Vec::with_capacity(messages.len() + reviewer_updates.len());

    while let Some(next) = next_in_order(&mut authored, &mut updates) {
        merged.push(next);
    }
    merged
}

fn next_in_order<'a, A, U>(
    authored: &mut Peekable<A>,
    updates: &mut Peekable<U>,
) -> Option<CombinedMessage>
where
    A: Iterator<Item = (usize, &'a ChangeMessageInfo)>,
    U: Iterator<Item = &'a ReviewerUpdateInfo>,
{
    let take_authored = match (authored.peek(), updates.peek()) {
        (Some((_, m)), Some(u)) => m.date <= u.date,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => return None,
    };
    if take_authored {
        authored
            .next()
            .map(|(index, m)| undecorated(MessageSource::Authored(m.clone()), Some(index)))
    } else {
        updates
            .next()
            .map(|u| undecorated(MessageSource::ReviewerUpdate(u.clone()), None))
    }
}

fn undecorated(source: MessageSource, source_index: Option<usize>) -> CombinedMessage {
    CombinedMessage {
        source,
        source_index,
        expanded: false,
        comment_threads: Vec::new(),
        resolved_revision_number: None,
        resolved_tag: None,
        is_important: true,
    }
}

fn warn_if_unsorted(kind: &str, dates: impl Iterator<Item = Timestamp>) {
    let mut prev: Option<Timestamp> = None;
    for (index, date) in dates.enumerate() {
        if prev.is_some_and(|p| p > date) {
            tracing::warn!(kind, index, %date, "timeline input is not in ascending date order");
            return;
        }
        prev = Some(date);
    }
}

/// Attaches to every authored entry the threads it posted comments into.
fn link_threads(combined: &mut [CombinedMessage], threads: &[CommentThread]) {
    for message in combined.iter_mut() {
        if message.source_index.is_none() {
            continue;
        }
        let Some(id) = message.id().cloned() else {
            continue;
        };
        message.comment_threads = threads_for_message(&id, threads);
    }
}

/// Threads containing a comment posted with message `id`, in input order.
pub fn threads_for_message(id: &MessageId, threads: &[CommentThread]) -> Vec<CommentThread> {
    threads
        .iter()
        .filter(|t| t.is_linked_to(id))
        .cloned()
        .collect()
}

fn resolve_all(combined: &mut [CombinedMessage]) {
    let view: &[CombinedMessage] = combined;
    let revisions: Vec<Option<u32>> = view.iter().map(|m| resolve_revision(m, view)).collect();
    let resolved_tags: Vec<Option<String>> = view.iter().map(compute_tag).collect();

    for ((message, revision), tag) in combined.iter_mut().zip(revisions).zip(resolved_tags) {
        message.resolved_revision_number = revision;
        message.resolved_tag = tag;
    }
}

fn classify_all(combined: &mut [CombinedMessage]) {
    let view: &[CombinedMessage] = combined;
    let importance: Vec<bool> = view
        .iter()
        .map(|m| compute_is_important(m, view))
        .collect();
    for (message, important) in combined.iter_mut().zip(importance) {
        message.is_important = important;
    }
}

/// The revision an entry belongs to.
///
/// A declared positive revision wins. Otherwise the entry inherits the last
/// declared revision among entries of `all` dated at or before it; the scan
/// stops at the first entry dated strictly later.
pub fn resolve_revision(message: &CombinedMessage, all: &[CombinedMessage]) -> Option<u32> {
    if let Some(revision) = message.declared_revision() {
        return Some(revision);
    }
    let date = message.date();
    let mut revision = None;
    for other in all {
        if other.date() > date {
            break;
        }
        if let Some(r) = other.declared_revision() {
            revision = Some(r);
        }
    }
    revision
}

/// Grouping tag of an entry; see [`tags::resolve_tag`].
///
/// An untagged authored message that posted a robot comment is grouped under
/// that robot's id.
pub fn compute_tag(message: &CombinedMessage) -> Option<String> {
    tags::resolve_tag(message.raw_tag(), message.text()).or_else(|| robot_tag(message))
}

fn robot_tag(message: &CombinedMessage) -> Option<String> {
    let id = message.id()?;
    message
        .comment_threads
        .iter()
        .flat_map(|t| t.comments.iter())
        .filter(|c| c.change_message_id.as_ref() == Some(id))
        .find_map(|c| c.robot_id.as_deref())
        .map(tags::strip_variant)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Whether an entry is shown without "show all activity".
///
/// Untagged entries are always important. A tagged entry is hidden when another
/// entry with the same resolved tag has a strictly higher resolved revision
/// (a missing revision counts as 0). Expects resolved fields on all of `all`.
pub fn compute_is_important(message: &CombinedMessage, all: &[CombinedMessage]) -> bool {
    let Some(tag) = message.resolved_tag.as_deref() else {
        return true;
    };
    let revision = message.resolved_revision_number.unwrap_or(0);
    !all.iter().any(|other| {
        other.resolved_tag.as_deref() == Some(tag)
            && other.resolved_revision_number.unwrap_or(0) > revision
    })
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Presentation state for a combined timeline.
///
/// Only the "show all activity" toggle lives here; per-entry expansion is the
/// `expanded` flag on [`CombinedMessage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineView {
    pub show_all_activity: bool,
}

impl TimelineView {
    pub fn new(show_all_activity: bool) -> Self {
        Self { show_all_activity }
    }

    pub fn is_visible(&self, message: &CombinedMessage) -> bool {
        self.show_all_activity || message.is_important
    }

    /// Entries to display, in timeline order.
    pub fn visible<'a>(&self, messages: &'a [CombinedMessage]) -> Vec<&'a CombinedMessage> {
        messages.iter().filter(|m| self.is_visible(m)).collect()
    }

    /// Number of entries currently hidden behind the toggle.
    pub fn hidden_count(&self, messages: &[CombinedMessage]) -> usize {
        messages.iter().filter(|m| !self.is_visible(m)).count()
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all_activity = !self.show_all_activity;
    }

    /// Expands or collapses every entry.
    pub fn set_expanded_all(messages: &mut [CombinedMessage], expanded: bool) {
        for message in messages {
            message.expanded = expanded;
        }
    }

    /// Makes the authored message `id` visible and expanded.
    ///
    /// Turns "show all activity" on when the message is not important.
    /// Returns its index, or `None` when no entry has that id.
    pub fn reveal(&mut self, messages: &mut [CombinedMessage], id: &MessageId) -> Option<usize> {
        let index = messages.iter().position(|m| m.id() == Some(id))?;
        if !self.is_visible(&messages[index]) {
            tracing::debug!(%id, "showing all activity to reveal message");
            self.show_all_activity = true;
        }
        messages[index].expanded = true;
        Some(index)
    }
}
