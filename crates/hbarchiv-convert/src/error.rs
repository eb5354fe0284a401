//! Error types for the conversion phase.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by catalog scanning and batch setup. Setup errors are
/// fatal to the batch; per-item transcode failures are not (they are
/// collected in the batch summary instead).
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The archive root is missing or not a directory.
    #[error("{path} ist kein Verzeichnis!")]
    RootNotADirectory { path: String },

    /// The destination root is missing or not a directory.
    #[error("Zielverzeichnis {path} ist kein Verzeichnis!")]
    DestinationMissing { path: String },

    /// A directory below the root could not be read.
    #[error("failed to read {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from one transcoder invocation.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// ffmpeg executable not found.
    #[error("ffmpeg not found. Ensure ffmpeg is installed and in PATH, or set FFMPEG_PATH environment variable")]
    FfmpegNotFound,

    /// No input files for this book.
    #[error("no input files")]
    NoInputs,

    /// Failed to spawn the ffmpeg process.
    #[error("failed to spawn ffmpeg: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The ffmpeg process exceeded the configured timeout and was killed.
    #[error("ffmpeg timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The ffmpeg process exited with a non-zero status.
    #[error("ffmpeg exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// ffmpeg exited successfully but the output file is missing.
    #[error("expected output file not found: {path}")]
    OutputNotFound { path: PathBuf },

    /// IO error during file operations (concat list, output directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
