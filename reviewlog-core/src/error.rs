//! Error type for the fallible edges of reviewlog-core.
//!
//! The timeline and thread engines never fail. Errors only come from reading
//! things off disk: configuration files, change snapshots, and timestamps
//! embedded in them.

use std::path::PathBuf;

/// Errors produced while loading configuration or change snapshots.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A snapshot file was not valid JSON for the expected shape.
    #[error("invalid snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A config file was not valid TOML for the expected shape.
    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// A timestamp string did not match `YYYY-MM-DD hh:mm:ss[.fffffffff]`.
    #[error("invalid timestamp {0:?}")]
    Timestamp(String),
}

pub type Result<T> = std::result::Result<T, Error>;
