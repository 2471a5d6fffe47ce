//! CLDF Wordlist support for the Mixtecan subgrouping dataset
//!
//! Only the parts of the Cross-Linguistic Data Formats the two pipelines
//! touch are covered here:
//! - the record types written by `makecldf` (languages, parameters, forms,
//!   cognate judgments),
//! - a table writer that emits CSV tables plus a CSVW JSON manifest,
//! - a reader that locates tables by component and columns by property term,
//!   which is what `makenexus` consumes.
//!
//! Schema validation, source parsing and the wider CLDF module zoo are out of
//! scope; the manifest we write is what `pycldf` expects of a Wordlist.

pub mod error;
pub mod io;
pub mod metadata;
pub mod model;
pub mod reader;
pub mod slug;
pub mod writer;

pub use error::{CldfError, Result};
pub use model::{CodingScheme, Cognate, Concept, Form, Language, NewForm, Segments};
pub use reader::{CldfDataset, Row};
pub use slug::slug;
pub use writer::{CldfWriter, DatasetInfo};

/// Namespace every CLDF property and component term lives in.
pub const TERMS_NS: &str = "http://cldf.clld.org/v1.0/terms.rdf#";

/// Builds the full IRI of a CLDF term (`id` → `...terms.rdf#id`).
pub fn term_url(term: &str) -> String {
    format!("{TERMS_NS}{term}")
}
