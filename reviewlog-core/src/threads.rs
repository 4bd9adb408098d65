//! Display order for comment threads.
//!
//! The order only looks at where a thread is anchored and when it was last
//! touched. Resolved state and drafts change while the user works through a
//! review; sorting on them would make threads jump around under the cursor.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::CommentThread;

pub use crate::types::PATCHSET_LEVEL_PATH;

/// How the thread list is sorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// By file, then line, then patchset (newest first).
    #[default]
    ByFile,
    /// Most recently updated first, falling back to file order.
    ByTimestamp,
}

impl SortMode {
    pub fn by_timestamp(self) -> bool {
        self == SortMode::ByTimestamp
    }
}

/// Total order over threads for display.
///
/// 1. With [`SortMode::ByTimestamp`]: newest last comment first.
/// 2. Path, with the patchset-level pseudo-path before every real path.
/// 3. Line, with file-level anchors before numbered lines.
/// 4. Patchset, missing first, then highest first.
/// 5. Newest last comment first.
///
/// Threads equal on every key compare `Equal`, so a stable sort keeps their
/// input order.
pub fn compare_threads(a: &CommentThread, b: &CommentThread, mode: SortMode) -> Ordering {
    let newest_first = || b.last_updated().cmp(&a.last_updated());

    if mode.by_timestamp() {
        let by_time = newest_first();
        if by_time != Ordering::Equal {
            return by_time;
        }
    }

    compare_paths(a, b)
        .then_with(|| compare_lines(a, b))
        .then_with(|| compare_patch_nums(a.patch_num, b.patch_num))
        .then_with(newest_first)
}

fn compare_paths(a: &CommentThread, b: &CommentThread) -> Ordering {
    match (a.is_patchset_level(), b.is_patchset_level()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.path.cmp(&b.path),
    }
}

fn compare_lines(a: &CommentThread, b: &CommentThread) -> Ordering {
    let a_line = a.line.and_then(|l| l.number());
    let b_line = b.line.and_then(|l| l.number());
    // `None` (file level) orders before any `Some`.
    a_line.cmp(&b_line)
}

fn compare_patch_nums(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

/// Stable sort of `threads` by [`compare_threads`].
pub fn sort_threads(threads: &mut [CommentThread], mode: SortMode) {
    threads.sort_by(|a, b| compare_threads(a, b, mode));
}
