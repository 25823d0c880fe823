//! Error types for the engine binary.

use std::path::PathBuf;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific failure, providing a single error type
/// that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: corruption_core::ConfigError,
    },

    /// The simulation could not be started.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: corruption_core::RunnerError,
    },

    /// The blocking simulation task panicked or was cancelled.
    #[error("simulation task failed: {source}")]
    Task {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },

    /// The metrics log could not be serialized.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The metrics log could not be written.
    #[error("failed to write output to {}: {source}", path.display())]
    Output {
        /// Destination that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
