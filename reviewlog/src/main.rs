//! reviewlog: activity timeline and comment thread viewer for a change.
//!
//! Loads a change snapshot (JSON), runs the timeline or thread engine from
//! `reviewlog-core`, and prints the result as text or JSON.
//!
//! ```text
//! reviewlog timeline change.json --show-all
//! reviewlog threads change.json --filter unresolved --author 1000
//! ```
//!
//! Settings come from `~/.config/reviewlog/config.toml` (or `--config`); flags
//! override them. Logs go to stderr, filtered by `RUST_LOG`.

mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use reviewlog_core::config::Config;
use reviewlog_core::filter::{
    display_threads, filter_counts, CommentFilter, FilterCounts, ThreadListState,
};
use reviewlog_core::snapshot::ChangeSnapshot;
use reviewlog_core::threads::SortMode;
use reviewlog_core::timeline::{combine_messages, TimelineView};
use reviewlog_core::types::{AccountId, CombinedMessage, CommentThread};

/// Activity timeline and comment thread viewer.
#[derive(Parser, Debug)]
#[command(name = "reviewlog")]
#[command(about = "Show a change's activity timeline and comment threads")]
struct Args {
    /// Config file to use instead of the XDG default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merged, classified activity timeline
    Timeline(TimelineArgs),
    /// Sorted, filtered comment threads
    Threads(ThreadsArgs),
}

#[derive(clap::Args, Debug)]
struct TimelineArgs {
    /// Change snapshot (JSON)
    snapshot: PathBuf,

    /// Include entries hidden by default
    #[arg(long, overrides_with = "no_show_all")]
    show_all: bool,

    /// Only show important entries, even if the config says otherwise
    #[arg(long, overrides_with = "show_all")]
    no_show_all: bool,

    /// Print full message bodies
    #[arg(long)]
    expand: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

impl TimelineArgs {
    /// Applies the flags on top of the configured view.
    fn apply(&self, view: &mut TimelineView) {
        if let Some(show_all) = switch(self.show_all, self.no_show_all) {
            view.show_all_activity = show_all;
        }
    }
}

#[derive(clap::Args, Debug)]
struct ThreadsArgs {
    /// Change snapshot (JSON)
    snapshot: PathBuf,

    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    #[arg(long, value_enum)]
    filter: Option<FilterArg>,

    /// Only threads with a comment by this account (repeatable)
    #[arg(long = "author")]
    authors: Vec<u64>,

    /// Hide robot threads nobody has replied to
    #[arg(long, overrides_with = "show_unreplied_robot")]
    hide_unreplied_robot: bool,

    /// Show robot threads nobody has replied to
    #[arg(long, overrides_with = "hide_unreplied_robot")]
    show_unreplied_robot: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

impl ThreadsArgs {
    /// Applies the flags on top of the configured thread list state.
    fn apply(&self, state: &mut ThreadListState) {
        if let Some(sort) = self.sort {
            state.sort = sort.into();
        }
        if let Some(filter) = self.filter {
            state.set_filter(filter.into());
        }
        state
            .selected_authors
            .extend(self.authors.iter().copied().map(AccountId));
        if let Some(hide) = switch(self.hide_unreplied_robot, self.show_unreplied_robot) {
            state.only_robot_with_human_reply = hide;
        }
    }
}

/// Collapses an `--x` / `--no-x` pair; `None` leaves the config value alone.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    File,
    Timestamp,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::File => SortMode::ByFile,
            SortArg::Timestamp => SortMode::ByTimestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Unresolved,
    Drafts,
    Mentions,
}

impl From<FilterArg> for CommentFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => CommentFilter::All,
            FilterArg::Unresolved => CommentFilter::Unresolved,
            FilterArg::Drafts => CommentFilter::Drafts,
            FilterArg::Mentions => CommentFilter::Mentions,
        }
    }
}

#[derive(Serialize)]
struct TimelineOutput<'a> {
    messages: Vec<&'a CombinedMessage>,
    hidden: usize,
}

#[derive(Serialize)]
struct ThreadsOutput<'a> {
    threads: Vec<&'a CommentThread>,
    counts: FilterCounts,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    tracing::debug!(?config, "effective config");

    match args.command {
        Command::Timeline(timeline) => {
            let snapshot = load_snapshot(&timeline.snapshot)?;
            let mut view = config.timeline_view();
            timeline.apply(&mut view);

            let mut messages = combine_messages(
                &snapshot.messages,
                &snapshot.reviewer_updates,
                &snapshot.threads,
            );
            if timeline.expand {
                TimelineView::set_expanded_all(&mut messages, true);
            }

            if timeline.json {
                let output = TimelineOutput {
                    messages: view.visible(&messages),
                    hidden: view.hidden_count(&messages),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", render::render_timeline(&messages, &view));
            }
        }
        Command::Threads(threads) => {
            let snapshot = load_snapshot(&threads.snapshot)?;
            let mut state = config.thread_list_state();
            threads.apply(&mut state);

            let editing = snapshot.editing_set();
            let viewer = snapshot.viewer.as_ref();
            let shown = display_threads(&state, &snapshot.threads, &editing, viewer);
            let counts = filter_counts(&state, &snapshot.threads, viewer);

            if threads.json {
                let output = ThreadsOutput {
                    threads: shown,
                    counts,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", render::render_threads(&shown, &counts));
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(Config::load()),
    }
}

fn load_snapshot(path: &Path) -> Result<ChangeSnapshot> {
    ChangeSnapshot::load(path).with_context(|| format!("loading snapshot {}", path.display()))
}
