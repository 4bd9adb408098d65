//! Message tags and their grouping.
//!
//! Tools may emit fine-grained tags such as `autogenerated:my-bot~v2`. For the
//! importance rules every variant of one tool's activity must land in the same
//! group, and paired events (WIP and ready, private and public) should cluster
//! together, so raw tags are resolved into grouping tags first.

pub const TAG_NEW_PATCHSET: &str = "autogenerated:gerrit:newPatchSet";
pub const TAG_NEW_WIP_PATCHSET: &str = "autogenerated:gerrit:newWipPatchSet";
/// Grouping tag for uploads that outdated existing votes. Never sent by the
/// server.
pub const TAG_NEW_PATCHSET_OUTDATED_VOTES: &str = "autogenerated:gerrit:newPatchSetOutdatedVotes";
pub const TAG_SET_PRIVATE: &str = "autogenerated:gerrit:setPrivate";
pub const TAG_UNSET_PRIVATE: &str = "autogenerated:gerrit:unsetPrivate";
pub const TAG_SET_WIP: &str = "autogenerated:gerrit:setWorkInProgress";
pub const TAG_SET_READY: &str = "autogenerated:gerrit:setReadyForReview";
pub const TAG_REVIEWER_UPDATE: &str = "autogenerated:gerrit:reviewerUpdate";
pub const TAG_MERGED: &str = "autogenerated:gerrit:merged";
pub const TAG_ABANDON: &str = "autogenerated:gerrit:abandon";
pub const TAG_RESTORE: &str = "autogenerated:gerrit:restore";

const AUTOGENERATED_PREFIX: &str = "autogenerated:";
const OUTDATED_VOTES_LINE: &str = "Outdated Votes:";

/// Resolves a raw tag into its grouping tag.
///
/// `message` is the body of the message carrying the tag; it decides whether
/// an upload outdated votes. A tag that is empty once its `~` suffix is
/// dropped counts as no tag. Resolving an already resolved tag against the
/// same body returns it unchanged.
pub fn resolve_tag(raw: Option<&str>, message: &str) -> Option<String> {
    let tag = strip_variant(raw?);
    if tag.is_empty() {
        return None;
    }
    let resolved = match tag {
        TAG_NEW_PATCHSET | TAG_NEW_WIP_PATCHSET => {
            if has_outdated_votes(message) {
                TAG_NEW_PATCHSET_OUTDATED_VOTES
            } else {
                TAG_NEW_PATCHSET
            }
        }
        TAG_UNSET_PRIVATE => TAG_SET_PRIVATE,
        TAG_SET_WIP => TAG_SET_READY,
        other => other,
    };
    Some(resolved.to_owned())
}

/// Drops everything from the first `~` onward.
pub fn strip_variant(tag: &str) -> &str {
    match tag.find('~') {
        Some(idx) => &tag[..idx],
        None => tag,
    }
}

/// True when `message` has an `Outdated Votes:` line.
pub fn has_outdated_votes(message: &str) -> bool {
    message.lines().any(|line| line.trim_end() == OUTDATED_VOTES_LINE)
}

/// True for tags the server generates itself.
pub fn is_automated_tag(tag: &str) -> bool {
    tag.starts_with(AUTOGENERATED_PREFIX)
}
