//! Loading config files and change snapshots from disk.

use std::path::PathBuf;

use reviewlog_core::config::Config;
use reviewlog_core::filter::CommentFilter;
use reviewlog_core::snapshot::ChangeSnapshot;
use reviewlog_core::threads::SortMode;
use reviewlog_core::timeline::combine_messages;
use reviewlog_core::types::{
    AccountId, Comment, CommentId, CommentLine, LineMarker, MessageId, ReviewerState,
};
use reviewlog_core::{Error, Timestamp};

fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn config_file_sets_engine_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_temp(
        &dir,
        "config.toml",
        r#"
[timeline]
show_all_activity = true

[threads]
sort = "by_timestamp"
filter = "unresolved"
only_robot_with_human_reply = true
"#,
    );

    let config = Config::load_from(&path).unwrap();

    assert!(config.timeline_view().show_all_activity);
    let state = config.thread_list_state();
    assert_eq!(state.sort, SortMode::ByTimestamp);
    assert_eq!(state.filter, CommentFilter::Unresolved);
    assert!(state.only_robot_with_human_reply);
    assert!(state.selected_authors.is_empty());
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let config = Config::parse("[threads]\nfilter = \"drafts\"\n").unwrap();
    assert!(!config.timeline.show_all_activity);
    assert_eq!(config.threads.sort, SortMode::ByFile);
    assert_eq!(config.threads.filter, CommentFilter::Drafts);

    assert_eq!(Config::parse("").unwrap(), Config::default());
}

#[test]
fn malformed_config_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_temp(&dir, "config.toml", "[threads]\nsort = \"sideways\"\n");

    let err = Config::load_from(&path).unwrap_err();

    assert!(matches!(err, Error::Toml { .. }), "got {err:?}");
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

const SNAPSHOT: &str = r#"{
  "messages": [
    {
      "id": "m1",
      "date": "2024-03-01 09:00:00.000000000",
      "message": "Uploaded patch set 1.",
      "tag": "autogenerated:gerrit:newPatchSet",
      "_revision_number": 1,
      "author": 1000
    },
    {
      "id": "m2",
      "date": "2024-03-01 10:00:00.5",
      "message": "Patch Set 1:\n\n(1 comment)",
      "_revision_number": 1,
      "author": 2000
    }
  ],
  "reviewer_updates": [
    {
      "date": "2024-03-01 09:30:00",
      "updates": [{ "reviewer": 2000, "state": "REVIEWER" }],
      "author": 1000
    }
  ],
  "threads": [
    {
      "root_id": "c1",
      "path": "src/lib.rs",
      "line": 12,
      "patch_num": 1,
      "comments": [
        {
          "id": "c1",
          "path": "src/lib.rs",
          "line": 12,
          "patch_set": 1,
          "author": 2000,
          "message": "@owner@example.com off by one?",
          "unresolved": true,
          "updated": "2024-03-01 10:00:00.5",
          "change_message_id": "m2"
        }
      ]
    },
    {
      "root_id": "c2",
      "path": "src/lib.rs",
      "line": "FILE",
      "patch_num": 1,
      "comments": [
        {
          "id": "c2",
          "path": "src/lib.rs",
          "line": "FILE",
          "patch_set": 1,
          "author": 1000,
          "message": "Missing license header",
          "updated": "2024-03-01 10:00:00.5",
          "draft": true
        }
      ]
    }
  ],
  "viewer": { "account_id": 1000, "email": "owner@example.com" },
  "editing": ["c2"]
}"#;

#[test]
fn snapshot_reads_server_field_names() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_temp(&dir, "change.json", SNAPSHOT);

    let snapshot = ChangeSnapshot::load(&path).unwrap();

    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.messages[0].revision_number, Some(1));
    assert_eq!(snapshot.messages[1].tag, None);
    assert_eq!(snapshot.reviewer_updates[0].updates[0].state, ReviewerState::Reviewer);

    let first = &snapshot.threads[0];
    assert_eq!(first.line, Some(CommentLine::Number(12)));
    assert!(first.is_unresolved());
    assert!(first.mentions("owner@example.com"));
    assert!(first.is_linked_to(&MessageId::from("m2")));

    let second = &snapshot.threads[1];
    assert_eq!(second.line, Some(CommentLine::Marker(LineMarker::File)));
    assert!(second.has_draft());
    assert!(!second.is_unresolved());

    let viewer = snapshot.viewer.as_ref().unwrap();
    assert_eq!(viewer.account_id, AccountId(1000));
    assert!(snapshot.editing_set().contains(&CommentId::from("c2")));
}

#[test]
fn snapshot_feeds_the_timeline() {
    let snapshot: ChangeSnapshot = serde_json::from_str(SNAPSHOT).unwrap();

    let combined = combine_messages(
        &snapshot.messages,
        &snapshot.reviewer_updates,
        &snapshot.threads,
    );

    assert_eq!(combined.len(), 3);
    assert!(combined[1].is_reviewer_update());
    assert_eq!(combined[1].resolved_revision_number, Some(1));
    assert_eq!(combined[2].comment_threads.len(), 1);
    assert!(combined.iter().all(|m| m.is_important));
}

#[test]
fn accounts_may_be_server_account_objects() {
    let snapshot: ChangeSnapshot = serde_json::from_str(
        r#"{
          "messages": [{
            "id": "m1",
            "date": "2024-03-01 09:00:00",
            "message": "Patch Set 1: Code-Review+1",
            "author": { "_account_id": 1000, "name": "Owner", "email": "owner@example.com" }
          }],
          "reviewer_updates": [{
            "date": "2024-03-01 09:30:00",
            "updates": [{ "reviewer": { "_account_id": 2000 }, "state": "CC" }],
            "author": { "_account_id": 1000 }
          }],
          "threads": [{
            "root_id": "c1",
            "path": "a.txt",
            "comments": [{
              "id": "c1",
              "path": "a.txt",
              "patch_set": 1,
              "author": { "_account_id": 2000, "name": "Reviewer" },
              "message": "nit",
              "updated": "2024-03-01 10:00:00"
            }]
          }]
        }"#,
    )
    .unwrap();

    assert_eq!(snapshot.messages[0].author, Some(AccountId(1000)));
    assert_eq!(snapshot.reviewer_updates[0].author, Some(AccountId(1000)));
    assert_eq!(snapshot.reviewer_updates[0].updates[0].reviewer, AccountId(2000));
    assert!(snapshot.threads[0].has_comment_by(AccountId(2000)));
    assert_eq!(snapshot.messages[0].revision_number, None);
}

#[test]
fn empty_snapshot_is_valid() {
    let snapshot: ChangeSnapshot = serde_json::from_str("{}").unwrap();
    assert_eq!(snapshot, ChangeSnapshot::default());
}

#[test]
fn invalid_snapshot_is_a_json_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_temp(&dir, "change.json", r#"{ "messages": [{ "id": "m1" }] }"#);
    let err = ChangeSnapshot::load(&path).unwrap_err();
    assert!(matches!(err, Error::Json { .. }), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Timestamps and drafts
// ---------------------------------------------------------------------------

#[test]
fn timestamps_compare_by_instant_not_by_text() {
    let short = Timestamp::parse("2024-03-01 10:00:00.5").unwrap();
    let long = Timestamp::parse("2024-03-01 10:00:00.500000000").unwrap();
    let earlier = Timestamp::parse("2024-03-01 10:00:00.49").unwrap();
    assert_eq!(short, long);
    assert!(earlier < short);

    let whole = Timestamp::parse("2024-03-01 10:00:00").unwrap();
    let fraction = Timestamp::parse("2024-03-01 10:00:00.000000001").unwrap();
    assert!(whole < fraction);
}

#[test]
fn timestamps_accept_iso_and_rfc3339() {
    let wire = Timestamp::parse("2024-03-01 10:00:00").unwrap();
    assert_eq!(Timestamp::parse("2024-03-01T10:00:00").unwrap(), wire);
    assert_eq!(Timestamp::parse("2024-03-01T12:00:00+02:00").unwrap(), wire);
    assert!(matches!(Timestamp::parse("yesterday"), Err(Error::Timestamp(_))));
}

#[test]
fn timestamps_serialize_in_wire_format() {
    let ts = Timestamp::parse("2024-03-01 10:00:00.5").unwrap();
    let json = serde_json::to_string(&ts).unwrap();
    assert_eq!(json, "\"2024-03-01 10:00:00.500000000\"");
    assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), ts);
}

#[test]
fn new_drafts_get_distinct_local_keys() {
    let updated = Timestamp::parse("2024-03-01 10:00:00").unwrap();
    let a = Comment::new_draft("a.txt", Some(CommentLine::Number(1)), 2, "nit", updated);
    let b = Comment::new_draft("a.txt", Some(CommentLine::Number(1)), 2, "nit", updated);

    assert!(a.is_draft());
    assert!(a.unresolved);
    assert!(a.id.is_none());
    assert_ne!(a.key(), b.key());
    assert!(a.key().is_some());
}
