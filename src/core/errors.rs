//! SIB-prefixed error types with structured error codes.
//!
//! View-state operations (filter, search, sort) are total and never return
//! these; errors exist only at the edges: configuration, catalog IO, the
//! interaction log, and the terminal runtime.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Crate-wide `Result` specialized to [`SibError`].
pub type Result<T> = std::result::Result<T, SibError>;

/// Top-level error type for Showroom Inventory Browser.
#[derive(Debug, Error)]
pub enum SibError {
    #[error("[SIB-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SIB-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SIB-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SIB-2001] missing catalog file: {path}")]
    MissingCatalog { path: PathBuf },

    #[error("[SIB-2002] invalid catalog: {details}")]
    InvalidCatalog { details: String },

    #[error("[SIB-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SIB-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[SIB-3002] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[SIB-3101] terminal failure: {details}")]
    Terminal { details: String },

    #[error("[SIB-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl SibError {
    /// The `SIB-nnnn` code, stable across releases so scripts can match on it.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SIB-1001",
            Self::MissingConfig { .. } => "SIB-1002",
            Self::ConfigParse { .. } => "SIB-1003",
            Self::MissingCatalog { .. } => "SIB-2001",
            Self::InvalidCatalog { .. } => "SIB-2002",
            Self::Serialization { .. } => "SIB-2101",
            Self::Io { .. } => "SIB-3001",
            Self::ChannelClosed { .. } => "SIB-3002",
            Self::Terminal { .. } => "SIB-3101",
            Self::Runtime { .. } => "SIB-3900",
        }
    }

    /// True for failures where a second attempt could land differently.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::ChannelClosed { .. }
                | Self::Terminal { .. }
                | Self::Runtime { .. }
        )
    }

    /// Build an [`Io`](Self::Io) variant from any path-like argument.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SibError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SibError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
