//! Error types for the I/O collaborators around the parser.
//! The parser itself is total and has no error type.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status} on {path}: {stderr}")]
    Failed {
        command: String,
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
    #[error("OCR output for {0} is not valid UTF-8")]
    Encoding(PathBuf),
    #[cfg_attr(not(feature = "native-ocr"), allow(dead_code))]
    #[error("tesseract failed on {path}: {message}")]
    Native { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("no input files found under {0}")]
    NoInputs(PathBuf),
    #[error("no records extracted from {pages} page(s); nothing written")]
    NoRecords { pages: usize },
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Build(#[from] config::ConfigError),
    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
