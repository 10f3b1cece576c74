//! Error types for catalog loading

use std::path::PathBuf;
use thiserror::Error;

use crate::error::RaffleError;

/// Errors while reading participant or prize catalogs
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported catalog format for {path} (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("catalog {path} has no entries")]
    EmptyCatalog { path: PathBuf },

    #[error("duplicate {kind} id {id} in {path}")]
    DuplicateId {
        path: PathBuf,
        kind: &'static str,
        id: u64,
    },

    #[error("invalid entry in {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: RaffleError,
    },
}
