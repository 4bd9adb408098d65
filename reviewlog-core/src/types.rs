//! Domain model shared by the timeline and thread engines.
//!
//! All types are plain owned data that deserialize from the review server's
//! JSON field names. Nothing in here is mutated by the engines; they build new
//! [`CombinedMessage`] records instead of decorating their inputs.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::timestamp::Timestamp;

/// Pseudo-path of comments anchored to the patchset as a whole.
pub const PATCHSET_LEVEL_PATH: &str = "/PATCHSET_LEVEL";

/// Numeric account id as assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account reference as it appears on the wire: either a bare id or an
/// `AccountInfo` object carrying `_account_id`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AccountRef {
    Id(AccountId),
    Info {
        #[serde(rename = "_account_id")]
        account_id: AccountId,
    },
}

impl From<AccountRef> for AccountId {
    fn from(account: AccountRef) -> Self {
        match account {
            AccountRef::Id(id) | AccountRef::Info { account_id: id } => id,
        }
    }
}

fn account<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AccountId, D::Error> {
    AccountRef::deserialize(deserializer).map(AccountId::from)
}

fn optional_account<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<AccountId>, D::Error> {
    Ok(Option::<AccountRef>::deserialize(deserializer)?.map(AccountId::from))
}

/// Server id of a comment, or the local id of a draft that has none yet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of an authored change message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-numeric line anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineMarker {
    /// Anchored to the file rather than a line.
    File,
    /// The original line could not be mapped onto the current patchset.
    Lost,
}

/// Where in a file a comment sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentLine {
    Number(u32),
    Marker(LineMarker),
}

impl CommentLine {
    /// The line number, or `None` for file-level and lost anchors.
    pub fn number(&self) -> Option<u32> {
        match self {
            CommentLine::Number(n) => Some(*n),
            CommentLine::Marker(_) => None,
        }
    }
}

/// A single review comment.
///
/// Comments are immutable once the server has them. A local draft is a
/// comment with `draft` set, and has no server `id` until it is saved; such
/// drafts carry a `draft_id` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<CommentId>,
    pub path: String,
    pub line: Option<CommentLine>,
    pub patch_set: u32,
    #[serde(default, deserialize_with = "optional_account")]
    pub author: Option<AccountId>,
    pub message: String,
    #[serde(default)]
    pub unresolved: bool,
    pub updated: Timestamp,
    pub in_reply_to: Option<CommentId>,
    pub robot_id: Option<String>,
    pub change_message_id: Option<MessageId>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<Uuid>,
}

impl Comment {
    /// Creates an unsaved draft with a fresh local id.
    ///
    /// Drafts start unresolved, matching what the reply box defaults to.
    pub fn new_draft(
        path: impl Into<String>,
        line: Option<CommentLine>,
        patch_set: u32,
        message: impl Into<String>,
        updated: Timestamp,
    ) -> Self {
        Self {
            id: None,
            path: path.into(),
            line,
            patch_set,
            author: None,
            message: message.into(),
            unresolved: true,
            updated,
            in_reply_to: None,
            robot_id: None,
            change_message_id: None,
            draft: true,
            draft_id: Some(Uuid::new_v4()),
        }
    }

    /// True for unsaved comments and locally-owned drafts.
    pub fn is_draft(&self) -> bool {
        self.draft || self.id.is_none()
    }

    pub fn is_robot(&self) -> bool {
        self.robot_id.is_some()
    }

    /// The server id, falling back to the local draft id.
    pub fn key(&self) -> Option<CommentId> {
        self.id
            .clone()
            .or_else(|| self.draft_id.map(|u| CommentId(u.to_string())))
    }
}

/// A linear chain of comments replying to one root comment.
///
/// Threads are grouped by a collaborator; the engines only read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    pub root_id: CommentId,
    pub path: String,
    pub line: Option<CommentLine>,
    pub patch_num: Option<u32>,
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub ported: bool,
}

impl CommentThread {
    pub fn last_comment(&self) -> Option<&Comment> {
        self.comments.last()
    }

    /// `updated` of the most recent comment.
    pub fn last_updated(&self) -> Option<Timestamp> {
        self.comments.iter().map(|c| c.updated).max()
    }

    /// A thread is unresolved when its last comment leaves it unresolved.
    pub fn is_unresolved(&self) -> bool {
        self.last_comment().is_some_and(|c| c.unresolved)
    }

    pub fn has_draft(&self) -> bool {
        self.comments.iter().any(Comment::is_draft)
    }

    /// True when the root comment was posted by a robot.
    pub fn is_robot_thread(&self) -> bool {
        self.comments.first().is_some_and(Comment::is_robot)
    }

    /// True when someone other than a robot replied after the root comment.
    pub fn has_human_reply(&self) -> bool {
        self.comments.iter().skip(1).any(|c| !c.is_robot())
    }

    pub fn is_patchset_level(&self) -> bool {
        self.path == PATCHSET_LEVEL_PATH
    }

    pub fn has_comment_by(&self, author: AccountId) -> bool {
        self.comments.iter().any(|c| c.author == Some(author))
    }

    /// True when some comment `@`-mentions `email`.
    pub fn mentions(&self, email: &str) -> bool {
        if email.is_empty() {
            return false;
        }
        let needle = format!("@{email}");
        self.comments.iter().any(|c| c.message.contains(&needle))
    }

    /// True when one of the comments was posted together with message `id`.
    pub fn is_linked_to(&self, id: &MessageId) -> bool {
        self.comments
            .iter()
            .any(|c| c.change_message_id.as_ref() == Some(id))
    }
}

/// An authored change message, e.g. "Patch Set 3: Code-Review+2".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeMessageInfo {
    pub id: MessageId,
    pub date: Timestamp,
    pub message: String,
    pub tag: Option<String>,
    #[serde(rename = "_revision_number")]
    pub revision_number: Option<u32>,
    #[serde(default, deserialize_with = "optional_account")]
    pub author: Option<AccountId>,
}

/// Role a reviewer update moved an account into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewerState {
    Reviewer,
    Cc,
    Removed,
}

/// One account's change within a reviewer update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerStateChange {
    #[serde(deserialize_with = "account")]
    pub reviewer: AccountId,
    pub state: ReviewerState,
}

/// Synthetic, id-less summary of reviewer and CC list changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerUpdateInfo {
    pub date: Timestamp,
    #[serde(default)]
    pub updates: Vec<ReviewerStateChange>,
    #[serde(default, deserialize_with = "optional_account")]
    pub author: Option<AccountId>,
}

/// The two kinds of timeline input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageSource {
    Authored(ChangeMessageInfo),
    ReviewerUpdate(ReviewerUpdateInfo),
}

/// A timeline entry, built fresh by [`crate::timeline::combine_messages`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedMessage {
    pub source: MessageSource,
    /// Position in the authored-message input; `None` for reviewer updates.
    pub source_index: Option<usize>,
    pub expanded: bool,
    pub comment_threads: Vec<CommentThread>,
    pub resolved_revision_number: Option<u32>,
    pub resolved_tag: Option<String>,
    pub is_important: bool,
}

impl CombinedMessage {
    pub fn date(&self) -> Timestamp {
        match &self.source {
            MessageSource::Authored(m) => m.date,
            MessageSource::ReviewerUpdate(u) => u.date,
        }
    }

    pub fn id(&self) -> Option<&MessageId> {
        match &self.source {
            MessageSource::Authored(m) => Some(&m.id),
            MessageSource::ReviewerUpdate(_) => None,
        }
    }

    /// The tag as sent by the server, before grouping.
    pub fn raw_tag(&self) -> Option<&str> {
        match &self.source {
            MessageSource::Authored(m) => m.tag.as_deref(),
            MessageSource::ReviewerUpdate(_) => None,
        }
    }

    /// Message body; empty for reviewer updates.
    pub fn text(&self) -> &str {
        match &self.source {
            MessageSource::Authored(m) => &m.message,
            MessageSource::ReviewerUpdate(_) => "",
        }
    }

    /// The revision number the input declared, if it is a valid one.
    pub fn declared_revision(&self) -> Option<u32> {
        match &self.source {
            MessageSource::Authored(m) => m.revision_number.filter(|r| *r > 0),
            MessageSource::ReviewerUpdate(_) => None,
        }
    }

    pub fn is_reviewer_update(&self) -> bool {
        matches!(self.source, MessageSource::ReviewerUpdate(_))
    }
}
