//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use reviewlog_core::types::{
    AccountId, ChangeMessageInfo, Comment, CommentId, CommentLine, CommentThread, MessageId,
    ReviewerState, ReviewerStateChange, ReviewerUpdateInfo,
};
use reviewlog_core::Timestamp;

/// A timestamp `secs` seconds into a fixed day.
pub fn ts(secs: i64) -> Timestamp {
    Timestamp::from_unix_seconds(1_600_000_000 + secs).unwrap()
}

pub fn message(id: &str, secs: i64, tag: Option<&str>, rev: Option<u32>) -> ChangeMessageInfo {
    ChangeMessageInfo {
        id: MessageId::from(id),
        date: ts(secs),
        message: format!("message {id}"),
        tag: tag.map(str::to_owned),
        revision_number: rev,
        author: Some(AccountId(1000)),
    }
}

pub fn update(secs: i64) -> ReviewerUpdateInfo {
    ReviewerUpdateInfo {
        date: ts(secs),
        updates: vec![ReviewerStateChange {
            reviewer: AccountId(2000),
            state: ReviewerState::Cc,
        }],
        author: Some(AccountId(1000)),
    }
}

pub fn comment(id: &str, author: u64, secs: i64) -> Comment {
    Comment {
        id: Some(CommentId::from(id)),
        path: "a.txt".to_owned(),
        line: None,
        patch_set: 1,
        author: Some(AccountId(author)),
        message: format!("comment {id}"),
        unresolved: false,
        updated: ts(secs),
        in_reply_to: None,
        robot_id: None,
        change_message_id: None,
        draft: false,
        draft_id: None,
    }
}

pub fn thread(
    root: &str,
    path: &str,
    line: Option<u32>,
    patch_num: Option<u32>,
    comments: Vec<Comment>,
) -> CommentThread {
    CommentThread {
        root_id: CommentId::from(root),
        path: path.to_owned(),
        line: line.map(CommentLine::Number),
        patch_num,
        comments,
        ported: false,
    }
}

/// A thread with one comment by account 1000, updated at `secs`.
pub fn simple_thread(
    root: &str,
    path: &str,
    line: Option<u32>,
    patch_num: Option<u32>,
    secs: i64,
) -> CommentThread {
    thread(root, path, line, patch_num, vec![comment(root, 1000, secs)])
}

pub fn root_ids<'a>(threads: impl IntoIterator<Item = &'a CommentThread>) -> Vec<String> {
    threads.into_iter().map(|t| t.root_id.0.clone()).collect()
}
