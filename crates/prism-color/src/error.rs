//! Error type for the color engine.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),

    #[error("color space {0:?} is not defined in the config")]
    UnknownColorSpace(String),

    #[error("display {0:?} is not defined in the config")]
    UnknownDisplay(String),

    #[error("view {view:?} is not defined for display {display:?}")]
    UnknownView { display: String, view: String },

    #[error("the config has no displays")]
    NoDisplays,

    #[error("{file}:{line}: {message}")]
    LutParse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("file {0:?} was not found on the search path")]
    FileNotFound(String),

    #[error("file format of {0:?} is not supported")]
    UnsupportedFormat(String),

    #[error("matrix is not invertible")]
    SingularMatrix,

    #[error("{0} channels per pixel; only 3 or 4 are supported")]
    BadPixelLayout(usize),

    #[error("active {list} list is controlled by ${envvar} and cannot be edited")]
    ActiveListLocked {
        list: &'static str,
        envvar: &'static str,
    },
}
