//! Error handling for the volosd crate.

use std::{io, process::ExitStatus, result};

use thiserror::Error;

/// Convenient result type for volosd operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can end an invocation. None of them are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed flags, wrong positional count, bad magnitude or keyword.
    #[error("{0}")]
    InvalidArguments(String),

    /// A device type that is neither `output` nor `input`.
    #[error("unknown stream type: {0}")]
    UnknownStreamType(String),

    /// The audio backend answered with something we cannot interpret.
    #[error("backend error: {0}")]
    Backend(String),

    /// An external command ran but exited unsuccessfully.
    #[error("`{program}` failed ({status}){}", fmt_stderr(.stderr))]
    CommandFailed {
        /// Program that was invoked.
        program: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
        /// Trimmed stderr output, possibly empty.
        stderr: String,
    },

    /// An external command could not be started at all.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// I/O failure outside of external command execution.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Desktop notification delivery failed.
    #[error("notification failed: {0}")]
    Notify(String),
}

/// Render captured stderr as a `: <text>` suffix, or nothing when empty.
fn fmt_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl Error {
    /// Helper to build an argument error from an arbitrary message.
    pub fn invalid<M: Into<String>>(msg: M) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Helper to build a backend protocol error from an arbitrary message.
    pub fn backend<M: Into<String>>(msg: M) -> Self {
        Self::Backend(msg.into())
    }
}
