//! Plain-text rendering of engine output.
//!
//! Pure functions from engine results to strings, so `main.rs` only decides
//! where the text goes.

use std::fmt::Write as _;

use reviewlog_core::filter::FilterCounts;
use reviewlog_core::timeline::TimelineView;
use reviewlog_core::types::{
    CombinedMessage, CommentLine, CommentThread, LineMarker, MessageSource, ReviewerState,
};

/// One line per visible timeline entry, followed by a hidden-entries note.
///
/// Expanded entries also print their full body, indented.
pub fn render_timeline(messages: &[CombinedMessage], view: &TimelineView) -> String {
    let mut out = String::new();
    for message in view.visible(messages) {
        let revision = message
            .resolved_revision_number
            .map_or_else(|| "-".to_owned(), |r| format!("PS{r}"));
        let marker = if message.is_important { '*' } else { ' ' };
        let tag = message.resolved_tag.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{} {:>5} {marker} {tag:<40} [{}] {}",
            message.date(),
            revision,
            message.comment_threads.len(),
            summary(message),
        );
        if message.expanded {
            for line in message.text().lines().skip(1) {
                let _ = writeln!(out, "      {line}");
            }
        }
    }
    let hidden = view.hidden_count(messages);
    if hidden > 0 {
        let _ = writeln!(out, "({hidden} more hidden, use --show-all)");
    }
    out
}

fn summary(message: &CombinedMessage) -> String {
    match &message.source {
        MessageSource::Authored(m) => m.message.lines().next().unwrap_or("").to_owned(),
        MessageSource::ReviewerUpdate(u) => {
            let changes: Vec<String> = u
                .updates
                .iter()
                .map(|c| {
                    let state = match c.state {
                        ReviewerState::Reviewer => "reviewer",
                        ReviewerState::Cc => "cc",
                        ReviewerState::Removed => "removed",
                    };
                    format!("{} {state}", c.reviewer)
                })
                .collect();
            format!("Reviewers updated: {}", changes.join(", "))
        }
    }
}

/// One line per displayed thread, followed by the per-filter counts.
pub fn render_threads(threads: &[&CommentThread], counts: &FilterCounts) -> String {
    let mut out = String::new();
    for thread in threads {
        let line = match thread.line {
            Some(CommentLine::Number(n)) => n.to_string(),
            Some(CommentLine::Marker(LineMarker::Lost)) => "lost".to_owned(),
            Some(CommentLine::Marker(LineMarker::File)) | None => "file".to_owned(),
        };
        let patchset = thread
            .patch_num
            .map_or_else(|| "-".to_owned(), |p| format!("PS{p}"));
        let mut state = if thread.is_unresolved() { "unresolved" } else { "resolved" }.to_owned();
        if thread.has_draft() {
            state.push_str(", draft");
        }
        let _ = writeln!(
            out,
            "{}:{} {:>5} ({state}) {} comment(s) [{}]",
            thread.path,
            line,
            patchset,
            thread.comments.len(),
            thread.root_id,
        );
    }
    let _ = writeln!(
        out,
        "all {} | unresolved {} | drafts {} | mentions {}",
        counts.all, counts.unresolved, counts.drafts, counts.mentions
    );
    out
}
