/// Crate-level error types for quickref diagnostics.
use std::path::PathBuf;

/// Errors from the tooling around the resolver: config, file access, output.
/// The resolver itself never errors; see `resolver::Unresolved`.
#[allow(clippy::error_impl_error, reason = "crate error type re-exported as quickref::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config file parsed but holds an unusable value.
    #[error("invalid config {}: {reason}", path.display())]
    ConfigInvalid {
        /// Config file containing the bad value.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// A named document does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A scanned document exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadFailed {
        /// Document that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be set up.
    #[error("watch failed: {reason}")]
    WatchFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}
