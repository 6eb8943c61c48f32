use std::path::PathBuf;

/// Errors raised while loading recordings, catalogs and configuration.
///
/// The detection pipeline itself never fails: detections that cannot be
/// inverted are filtered and counted in [`crate::PipelineStats`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported recording schema '{found}' (expected '{expected}')")]
    UnsupportedSchema {
        found: String,
        expected: &'static str,
    },

    #[error("sensor traces are misaligned: top={top}, left={left}, right={right} samples")]
    MisalignedTraces {
        top: usize,
        left: usize,
        right: usize,
    },

    #[error("spectral catalog has no entries")]
    EmptyCatalog,

    #[error("invalid catalog entry '{tech}': {reason}")]
    InvalidCatalogEntry { tech: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
