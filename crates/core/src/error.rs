/// Error types for backing file access
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A privileged write that did not land
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteFailure {
    #[error("timed out after {after:?} writing {path}")]
    Timeout { path: PathBuf, after: Duration },

    #[error("elevated write to {path} exited with {code:?}: {stderr}")]
    NonZeroExit {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to run elevated write to {path}: {message}")]
    Invocation { path: PathBuf, message: String },
}

impl WriteFailure {
    /// Short human-readable cause
    pub fn diagnostic(&self) -> &str {
        match self {
            WriteFailure::Timeout { .. } => "timeout",
            WriteFailure::NonZeroExit { stderr, .. } => stderr,
            WriteFailure::Invocation { message, .. } => message,
        }
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            WriteFailure::Timeout { path, .. }
            | WriteFailure::NonZeroExit { path, .. }
            | WriteFailure::Invocation { path, .. } => path,
        }
    }
}

/// A backing file that could not be read. Never leaves the controller.
#[derive(Debug, Error)]
pub enum ReadFailure {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not UTF-8 text")]
    Malformed { path: PathBuf },
}
