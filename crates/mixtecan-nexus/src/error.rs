use std::path::PathBuf;

use mixtecan_cldf::CldfError;

pub type Result<T> = std::result::Result<T, NexusError>;

#[derive(Debug, thiserror::Error)]
pub enum NexusError {
    #[error("Unknown Ascertainment type: {0}")]
    UnknownAscertainment(String),

    #[error("Unknown cognate coding: '{0}'. Must be 'broad', 'fine', or 'any'.")]
    UnknownCoding(String),

    #[error("CognateTable has no Cognate_Coding column; use cognate coding 'any'")]
    MissingCodingColumn,

    #[error("cognate judgment references unknown form `{0}`")]
    DanglingForm(String),

    #[error("form references unknown parameter `{0}`")]
    DanglingConcept(String),

    #[error("Cognate set ({concept}, {cognateset}) in two partitions: {first}, {second}")]
    TwoPartitions {
        concept: String,
        cognateset: String,
        first: String,
        second: String,
    },

    #[error("Cognate set ({concept}, {cognateset}) is not in any partition")]
    Unpartitioned { concept: String, cognateset: String },

    #[error("{}:{line}: {message}", path.display())]
    PartitionFile {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("no valid character state for {doculect} at {character}")]
    ImpossibleState { doculect: String, character: String },

    #[error("badly formatted partitions: character `{0}` precedes every correction column")]
    BadPartitions(String),

    #[error("csv error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Cldf(#[from] CldfError),
}
