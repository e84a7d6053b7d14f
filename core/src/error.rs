//! Library error type.
//!
//! Construction-time failures (missing files, malformed dictionary or model
//! content) are fatal and surface through this enum. Once a segmenter is
//! built, cut/tag/extract calls do not return recoverable errors: decode
//! problems are logged and produce empty results.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dictionary line {lineno} in {}: {line:?}", path.display())]
    MalformedDict {
        path: PathBuf,
        lineno: usize,
        line: String,
    },

    #[error("malformed hmm model: {0}")]
    MalformedModel(String),

    #[error("invalid utf-8 sequence")]
    BadUtf8,

    #[error("separator {0:?} given more than once")]
    DuplicateSeparator(char),

    #[error("prepared dictionary: {0}")]
    Prepared(String),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
