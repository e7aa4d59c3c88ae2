use std::path::PathBuf;

use thiserror::Error;

/// Unrecoverable errors: the quantification directory is inconsistent or unreadable.
#[derive(Error, Debug)]
pub enum FryError {
    #[error("Required file is missing from the quantification directory: {0}")]
    MissingArtifact(PathBuf),

    #[error("Can't parse metadata descriptor {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Can't read matrix market file {path}: {reason}")]
    MatrixMarket { path: PathBuf, reason: String },

    #[error("{path} has {found} labels, expected {expected}")]
    LabelCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Count matrix has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Layer '{layer}' has shape {found:?}, but X has shape {expected:?}")]
    LayerShape {
        layer: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Problems with the metadata or the requested layer combination. These abort a
/// load without being treated as failures of the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Found USA mode, but num_genes = {num_genes} is not a multiple of 3")]
    MalformedGeneCount { num_genes: usize },

    #[error("Layer specification is empty")]
    Empty,

    #[error("Layer specification has no 'X' entry; the primary layer must be given explicitly")]
    MissingPrimary,

    #[error("Layer '{layer}' has tags {tags:?}; only U, S and A are allowed")]
    UnknownTag { layer: String, tags: Vec<String> },

    #[error("Layer '{layer}' has no tags")]
    EmptyLayer { layer: String },

    #[error("Can't parse layer specification: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, FryError>;
