//! The `makecldf` pipeline over a dataset directory.

use std::fs;
use std::path::{Path, PathBuf};

use mixtecan_cldf::CldfWriter;

use crate::config::{DatasetConfig, DatasetLayout};
use crate::convert::{ConversionReport, Converter};
use crate::error::{IngestError, Result};
use crate::reference::{ConceptList, LanguageRegistry};
use crate::wordlist::Wordlist;

#[derive(Debug, Clone)]
pub struct Dataset {
    pub layout: DatasetLayout,
    pub config: DatasetConfig,
}

impl Dataset {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let layout = DatasetLayout::new(root);
        let config = DatasetConfig::load(&layout.root)?;
        Ok(Self { layout, config })
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn wordlist_path(&self) -> PathBuf {
        self.layout.raw_dir().join(&self.config.wordlist)
    }

    /// Converts the raw wordlist into a CLDF dataset under `cldf/`.
    ///
    /// `wordlist` overrides the configured raw file.
    pub fn make_cldf(&self, wordlist: Option<&Path>) -> Result<ConversionReport> {
        let wordlist_path = wordlist
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.wordlist_path());
        let wl = Wordlist::read(&wordlist_path)?;
        let concepts = ConceptList::load(&self.layout.concepts())?;
        let languages = LanguageRegistry::load(&self.layout.languages())?;
        tracing::info!(
            wordlist = %wordlist_path.display(),
            rows = wl.len(),
            concepts = concepts.len(),
            languages = languages.len(),
            "loaded inputs"
        );
        if !wl.has_column("cogids_broad") && !wl.has_column("cogids_fine") {
            tracing::warn!(
                wordlist = %wordlist_path.display(),
                "no COGIDS_BROAD or COGIDS_FINE column, no cognate judgments will be written"
            );
        }

        let mut writer = CldfWriter::new();
        let sources = self.layout.sources();
        if sources.is_file() {
            let bib = fs::read_to_string(&sources).map_err(|source| IngestError::Read {
                path: sources.clone(),
                source,
            })?;
            writer.add_sources(bib);
        }
        for language in languages.languages() {
            writer.add_language(language.clone())?;
        }
        for concept in concepts.concepts() {
            writer.add_concept(concept.clone())?;
        }

        let report = Converter::new(&concepts, &languages).convert(wl.rows(), &mut writer)?;
        writer.write(&self.layout.cldf_dir(), &self.config.info())?;
        Ok(report)
    }
}
