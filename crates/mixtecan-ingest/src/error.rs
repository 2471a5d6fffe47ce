use std::path::PathBuf;

use mixtecan_cldf::CldfError;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("{}: missing required column `{column}`", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: duplicate row key `{key}`", path.display())]
    DuplicateKey { path: PathBuf, key: String },

    #[error("{}: no header line", .0.display())]
    EmptyWordlist(PathBuf),

    #[error("invalid dataset config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("csv error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Cldf(#[from] CldfError),
}
