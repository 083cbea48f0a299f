use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the conversion pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse annotation {path}: {source}")]
    AnnotationParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid image size {width}x{height} in {path}")]
    InvalidImageSize {
        path: PathBuf,
        width: f64,
        height: f64,
    },

    #[error("Label '{label}' in {path} is not in the class list")]
    UnknownLabel { path: PathBuf, label: String },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to serialize dataset config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
