use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CldfError>;

#[derive(Debug, thiserror::Error)]
pub enum CldfError {
    #[error("{}: no cldf dataset found", .0.display())]
    NoDataset(PathBuf),

    #[error("{}: no {component}", dir.display())]
    MissingTable { dir: PathBuf, component: String },

    #[error("{table}: no column for `{term}`")]
    MissingColumn { table: String, term: String },

    #[error("duplicate {table} id `{id}`")]
    DuplicateId { table: &'static str, id: String },

    #[error("unknown cognate coding `{0}` (expected `broad` or `fine`)")]
    UnknownCoding(String),

    #[error("invalid metadata {}: {source}", path.display())]
    Metadata {
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

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
