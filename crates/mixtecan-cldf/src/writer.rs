//! Accumulates Wordlist records and writes them as a CLDF dataset.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CldfError, Result};
use crate::io::write_atomic;
use crate::metadata::{table_for, TableGroup, METADATA_FILE, WORDLIST_MODULE};
use crate::model::{Cognate, Concept, Form, Language, NewForm, TableRecord};

/// Dataset-level descriptive metadata carried into the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub id: String,
    pub title: Option<String>,
    pub license: Option<String>,
    pub citation: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Default)]
pub struct CldfWriter {
    languages: Vec<Language>,
    concepts: Vec<Concept>,
    forms: Vec<Form>,
    cognates: Vec<Cognate>,
    sources: Option<String>,
    ids: HashSet<(&'static str, String)>,
    form_counters: BTreeMap<(String, String), usize>,
}

impl CldfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_id<R: TableRecord>(&mut self, record: &R) -> Result<()> {
        if !self.ids.insert((R::COMPONENT, record.id().to_string())) {
            return Err(CldfError::DuplicateId {
                table: R::COMPONENT,
                id: record.id().to_string(),
            });
        }
        Ok(())
    }

    pub fn add_language(&mut self, language: Language) -> Result<()> {
        self.claim_id(&language)?;
        self.languages.push(language);
        Ok(())
    }

    pub fn add_concept(&mut self, concept: Concept) -> Result<()> {
        self.claim_id(&concept)?;
        self.concepts.push(concept);
        Ok(())
    }

    /// Adds a form, assigning it the ID `{Language_ID}-{Parameter_ID}-{n}`
    /// where `n` counts forms of the same language and concept from 1.
    pub fn add_form(&mut self, data: NewForm) -> Result<&Form> {
        let counter = self
            .form_counters
            .entry((data.language_id.clone(), data.parameter_id.clone()))
            .or_insert(0);
        *counter += 1;
        let form = Form {
            id: format!("{}-{}-{}", data.language_id, data.parameter_id, counter),
            data,
        };
        self.claim_id(&form)?;
        let index = self.forms.len();
        self.forms.push(form);
        Ok(&self.forms[index])
    }

    pub fn add_cognate(&mut self, cognate: Cognate) -> Result<()> {
        self.claim_id(&cognate)?;
        self.cognates.push(cognate);
        Ok(())
    }

    /// BibTeX content copied to `sources.bib`.
    pub fn add_sources(&mut self, bibtex: impl Into<String>) {
        self.sources = Some(bibtex.into());
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn cognates(&self) -> &[Cognate] {
        &self.cognates
    }

    /// Writes all tables and the manifest into `dir`.
    pub fn write(&self, dir: &Path, info: &DatasetInfo) -> Result<()> {
        write_table(dir, &self.languages)?;
        write_table(dir, &self.concepts)?;
        write_table(dir, &self.forms)?;
        write_table(dir, &self.cognates)?;
        if let Some(bib) = &self.sources {
            write_atomic(&dir.join("sources.bib"), bib.as_bytes())?;
        }

        let manifest = self.manifest(info);
        let json = serde_json::to_string_pretty(&manifest).map_err(|source| {
            CldfError::Metadata {
                path: dir.join(METADATA_FILE),
                source,
            }
        })?;
        write_atomic(&dir.join(METADATA_FILE), json.as_bytes())?;

        tracing::info!(
            dir = %dir.display(),
            languages = self.languages.len(),
            concepts = self.concepts.len(),
            forms = self.forms.len(),
            cognates = self.cognates.len(),
            "wrote CLDF dataset"
        );
        Ok(())
    }

    pub fn manifest(&self, info: &DatasetInfo) -> TableGroup {
        TableGroup {
            context: serde_json::json!(["http://www.w3.org/ns/csvw", {"@language": "en"}]),
            conforms_to: Some(WORDLIST_MODULE.to_string()),
            id: Some(info.id.clone()),
            identifier: info.url.clone(),
            title: info.title.clone(),
            license: info.license.clone(),
            citation: info.citation.clone(),
            tables: vec![
                table_for::<Language>(&[]),
                table_for::<Concept>(&[]),
                table_for::<Form>(&[
                    ("Language_ID", Language::URL),
                    ("Parameter_ID", Concept::URL),
                ]),
                table_for::<Cognate>(&[("Form_ID", Form::URL)]),
            ],
        }
    }
}

fn write_table<R: TableRecord>(dir: &Path, records: &[R]) -> Result<()> {
    let path = dir.join(R::URL);
    let csv_err = |source| CldfError::Csv {
        path: path.clone(),
        source,
    };

    let mut out = csv::Writer::from_writer(Vec::new());
    out.write_record(R::columns().iter().map(|c| c.name))
        .map_err(csv_err)?;
    for record in records {
        out.write_record(record.cells()).map_err(csv_err)?;
    }
    let bytes = out
        .into_inner()
        .map_err(|e| CldfError::Io(e.into_error()))?;
    write_atomic(&path, &bytes)?;
    Ok(())
}
