//! Reading a CLDF dataset back through its manifest.
//!
//! Tables are located by component (falling back to the default file name),
//! columns by property term (falling back to the conventional column name),
//! so datasets written by other CLDF tooling read the same way as ours.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CldfError, Result};
use crate::metadata::{Column, Table, TableGroup};

/// One table row keyed by the terms it was requested with.
pub type Row = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct CldfDataset {
    dir: PathBuf,
    metadata: TableGroup,
}

fn default_url(component: &str) -> Option<&'static str> {
    match component {
        "LanguageTable" => Some("languages.csv"),
        "ParameterTable" => Some("parameters.csv"),
        "FormTable" => Some("forms.csv"),
        "CognateTable" => Some("cognates.csv"),
        _ => None,
    }
}

fn default_column_name(term: &str) -> Option<&'static str> {
    match term {
        "id" => Some("ID"),
        "name" => Some("Name"),
        "languageReference" => Some("Language_ID"),
        "parameterReference" => Some("Parameter_ID"),
        "formReference" => Some("Form_ID"),
        "cognatesetReference" => Some("Cognateset_ID"),
        _ => None,
    }
}

impl CldfDataset {
    /// Opens the first `*-metadata.json` (in file-name order) inside `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let mut candidates: Vec<PathBuf> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.is_file()
                        && p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.ends_with("-metadata.json"))
                })
                .collect(),
            Err(_) => return Err(CldfError::NoDataset(dir.to_path_buf())),
        };
        candidates.sort();
        let metadata_path = candidates
            .into_iter()
            .next()
            .ok_or_else(|| CldfError::NoDataset(dir.to_path_buf()))?;
        Self::from_metadata(&metadata_path)
    }

    pub fn from_metadata(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let metadata: TableGroup =
            serde_json::from_str(&text).map_err(|source| CldfError::Metadata {
                path: path.to_path_buf(),
                source,
            })?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        tracing::debug!(
            path = %path.display(),
            tables = metadata.tables.len(),
            "loaded CLDF manifest"
        );
        Ok(Self { dir, metadata })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Dataset ID (`rdf:ID`) from the manifest, if one was recorded.
    pub fn id(&self) -> Option<&str> {
        self.metadata.id.as_deref()
    }

    pub fn table(&self, component: &str) -> Option<&Table> {
        self.metadata
            .tables
            .iter()
            .find(|t| t.component() == Some(component))
            .or_else(|| {
                let url = default_url(component)?;
                self.metadata.tables.iter().find(|t| t.url == url)
            })
    }

    pub fn has_table(&self, component: &str) -> bool {
        self.table(component).is_some()
    }

    fn require_table(&self, component: &str) -> Result<&Table> {
        self.table(component).ok_or_else(|| CldfError::MissingTable {
            dir: self.dir.clone(),
            component: component.to_string(),
        })
    }

    /// Column of `component` that holds `term`: by property URL first, then
    /// by conventional or literal column name.
    pub fn column(&self, component: &str, term: &str) -> Option<&Column> {
        let table = self.table(component)?;
        let columns = &table.table_schema.columns;
        columns
            .iter()
            .find(|c| c.term() == Some(term))
            .or_else(|| {
                let name = default_column_name(term)?;
                columns.iter().find(|c| c.name == name)
            })
            .or_else(|| columns.iter().find(|c| c.name.eq_ignore_ascii_case(term)))
    }

    pub fn has_column(&self, component: &str, term: &str) -> bool {
        self.column(component, term).is_some()
    }

    /// Separator of a list-valued column.
    pub fn separator(&self, component: &str, term: &str) -> Option<&str> {
        self.column(component, term)?.separator.as_deref()
    }

    /// Reads every row of `component`, keeping only the requested `terms`.
    /// A requested term the table has no column for is an error.
    pub fn rows(&self, component: &str, terms: &[&str]) -> Result<Vec<Row>> {
        let table = self.require_table(component)?;
        let path = self.dir.join(&table.url);

        let mut wanted: Vec<(String, String)> = Vec::with_capacity(terms.len());
        for term in terms {
            let column = self
                .column(component, term)
                .ok_or_else(|| CldfError::MissingColumn {
                    table: table.url.clone(),
                    term: term.to_string(),
                })?;
            wanted.push((term.to_string(), column.name.clone()));
        }

        let csv_err = |source| CldfError::Csv {
            path: path.clone(),
            source,
        };
        let mut reader = csv::Reader::from_path(&path).map_err(csv_err)?;
        let headers = reader.headers().map_err(csv_err)?.clone();

        let mut positions = Vec::with_capacity(wanted.len());
        for (term, name) in &wanted {
            let idx = headers
                .iter()
                .position(|h| h == name.as_str())
                .ok_or_else(|| CldfError::MissingColumn {
                    table: table.url.clone(),
                    term: term.clone(),
                })?;
            positions.push((term.clone(), idx));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let row: Row = positions
                .iter()
                .map(|(term, idx)| (term.clone(), record.get(*idx).unwrap_or("").to_string()))
                .collect();
            rows.push(row);
        }
        tracing::debug!(path = %path.display(), rows = rows.len(), "read CLDF table");
        Ok(rows)
    }
}
