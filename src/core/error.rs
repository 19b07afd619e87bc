//! Fetch error types.
//!
//! Structural errors (bad references, bad operator grammar, bad hash specs)
//! abort a fetch immediately. Transport errors are reported by downloaders as
//! a plain `false` so the mirror loop can move on; `TransportFailure` only
//! surfaces when a caller asks for a single transfer directly.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// Errors that can occur while resolving or fetching a source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("malformed URL: {url} ({reason})")]
    MalformedReference { url: String, reason: String },

    #[error("invalid hash format: {file}: {spec}")]
    InvalidHashFormat { file: String, spec: String },

    #[error("invalid hash algorithm for {file}: {algorithm}")]
    InvalidHashAlgorithm { file: String, algorithm: String },

    #[error("checksum failure file: {file}")]
    ChecksumFailure { file: String },

    #[error("download: {url}: error: {message}")]
    TransportFailure { url: String, message: String },

    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("downloading {url}: all paths have failed, giving up")]
    AllMirrorsExhausted { url: String },

    #[error("invalid cvs path: {0}")]
    InvalidCvsUrl(String),

    #[error("invalid cvs {key}: {operator}")]
    InvalidCvsOption { key: String, operator: String },

    #[error("invalid git {key}: {operator}")]
    InvalidGitOption { key: String, operator: String },

    #[error("cvs URL cannot have a {first} and {second}: {url}")]
    MutuallyExclusiveOption {
        url: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("source is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("macro not defined: {0}")]
    UndefinedMacro(String),

    #[error("{tool} {command} failed in {}\nstderr: {stderr}", .dir.display())]
    VcsCommandFailed {
        tool: &'static str,
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether the mirror loop may route around this error by trying the
    /// next candidate.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TransportFailure { .. })
    }

    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        Self::MalformedReference {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
