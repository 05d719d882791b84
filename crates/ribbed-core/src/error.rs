//! Error types for Ribbed geometry generation

use thiserror::Error;

/// Result type alias using Ribbed's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building curves, sweeps, ribs and scene graphs
#[derive(Error, Debug)]
pub enum Error {
    /// The curve derivative vanished, so no orientation frame exists there
    #[error("Degenerate {curve} curve: zero-magnitude tangent at t = {t}")]
    DegenerateCurve { curve: &'static str, t: f64 },

    /// A rib count, interval or remapped rib position was out of range
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// A scene graph path did not name a nested group
    #[error("Invalid group structure: {0}")]
    InvalidGroupStructure(String),

    /// A cross-section profile could not be swept
    #[error("Invalid cross-section profile: {0}")]
    InvalidProfile(String),

    /// Generation of a single rib failed
    #[error("Rib {index} failed: {source}")]
    Rib {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the index of the rib that was being generated
    pub fn in_rib(self, index: usize) -> Self {
        Error::Rib {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping rib context wrappers
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Rib { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
