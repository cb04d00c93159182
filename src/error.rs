//! Error taxonomy for a generation run.
//!
//! Only fatal conditions live here. Per-record problems are
//! [`Warning`](crate::models::Warning) values and never become errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading records from a license source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("unable to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid license XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("invalid license bundle {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("text file {path} for {id} does not exist")]
    MissingText { id: String, path: PathBuf },

    #[error("unsupported input {0}: expected a directory of license XML files or a .toml bundle")]
    Unsupported(PathBuf),
}

/// Failure inside a single format writer.
#[derive(Error, Debug)]
pub enum WriterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("XML serialization failed: {0}")]
    Xml(String),
}

/// Fatal outcome of a generation run; every variant maps to exit status 1.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("invalid arguments: {0}")]
    Argument(String),

    #[error("error reading license source")]
    Source(#[from] SourceError),

    #[error("unable to prepare output {path}")]
    OutputPreparation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{writer} writer failed on {record}")]
    Writer {
        writer: &'static str,
        record: String,
        #[source]
        source: WriterError,
    },

    #[error("unable to write static resource {path}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unhandled error generating license data: {0}")]
    Internal(String),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
