//! Wordlist-to-CLDF conversion for the Mixtecan subgrouping dataset
//!
//! Reads the raw lingpy wordlist under `raw/`, checks each row against the
//! curated concept and language lists under `etc/`, and emits a CLDF
//! Wordlist under `cldf/`:
//! - one form per row whose language and concept resolve,
//! - one cognate judgment per cognate-ID token (broad and/or fine coding),
//! - a sorted, deduplicated list of data-quality warnings.

pub mod config;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod normalize;
pub mod reference;
pub mod wordlist;

pub use config::{DatasetConfig, DatasetLayout};
pub use convert::{cognate_judgments, ConversionReport, Converter};
pub use dataset::Dataset;
pub use error::{IngestError, Result};
pub use normalize::canonical_language_name;
pub use reference::{ConceptList, LanguageRegistry};
pub use wordlist::{Wordlist, WordlistRow};
