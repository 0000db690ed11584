//! Error types for parsing, fetching and syncing.

use std::path::PathBuf;

use thiserror::Error;

/// The response text did not have the shape the source's parser expects.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("response has no `#` documentation lines")]
    NoHeader,

    #[error("expected at least {expected} header lines, found {found}")]
    HeaderTooShort { expected: usize, found: usize },

    #[error("header line {index} has no field name: `{line}`")]
    MissingFieldName { index: usize, line: String },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("could not parse response: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("no CSV files found in {0}")]
    NoInputFiles(PathBuf),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("cannot read local file {path}: {source}")]
    LocalFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("metadata lookup for `{key}` failed: {reason}")]
    Metadata { key: String, reason: String },

    #[error("storage operation on `{key}` failed: {reason}")]
    Storage { key: String, reason: String },
}
