use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = CardError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to serialize listing: {0}")]
    Json(#[from] serde_json::Error),
    #[error("SVG parse error: {0}")]
    Svg(#[from] usvg::Error),
    #[error("PNG encoding failed for {}: {source}", path.display())]
    Png {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
    #[error("failed to decode image {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("atlas grid {columns}x{rows} has no cells")]
    EmptyGrid { columns: u32, rows: u32 },
    /// A record the content set cannot do without (e.g. The Founder role).
    #[error("{0}")]
    MissingRecord(String),
}

impl CardError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        CardError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
