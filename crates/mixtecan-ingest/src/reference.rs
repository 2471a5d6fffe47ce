//! Curated reference tables under `etc/`: the concept list and the
//! language list every wordlist row is checked against.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use mixtecan_cldf::{slug, Concept, Language};

use crate::error::{IngestError, Result};
use crate::normalize::canonical_language_name;

/// Reads a delimited table into rows keyed by lower-cased header name.
/// `.tsv` files are tab-separated, anything else comma-separated.
fn read_table(path: &Path) -> Result<Vec<HashMap<String, String>>> {
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    };
    let csv_err = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").trim().to_string()))
            .collect();
        rows.push(row);
    }
    tracing::debug!(path = %path.display(), rows = rows.len(), "read reference table");
    Ok(rows)
}

fn require(path: &Path, rows: &[HashMap<String, String>], columns: &[&str]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    for column in columns {
        if !first.contains_key(*column) {
            return Err(IngestError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_uppercase(),
            });
        }
    }
    Ok(())
}

fn non_empty(row: &HashMap<String, String>, key: &str) -> Option<String> {
    row.get(key).filter(|v| !v.is_empty()).cloned()
}

// ============================================================================
// Concepts
// ============================================================================

/// Concepts in list order, plus the English-gloss lookup the wordlist is
/// resolved through.
#[derive(Debug, Clone, Default)]
pub struct ConceptList {
    concepts: Vec<Concept>,
    by_gloss: HashMap<String, usize>,
}

impl ConceptList {
    /// Loads `NUMBER, ENGLISH, SPANISH, CONCEPTICON_ID, CONCEPTICON_GLOSS`.
    pub fn load(path: &Path) -> Result<Self> {
        let rows = read_table(path)?;
        require(path, &rows, &["number", "english"])?;

        let mut list = ConceptList::default();
        for row in &rows {
            let number = row.get("number").cloned().unwrap_or_default();
            let english = row.get("english").cloned().unwrap_or_default();
            list.insert(Concept {
                id: format!("{}_{}", number, slug(&english)),
                name: english,
                number,
                concepticon_id: non_empty(row, "concepticon_id"),
                concepticon_gloss: non_empty(row, "concepticon_gloss"),
                spanish_gloss: non_empty(row, "spanish"),
            });
        }
        Ok(list)
    }

    /// Adds a concept unless its ID or gloss is already taken; the first
    /// entry wins.
    pub fn insert(&mut self, concept: Concept) -> bool {
        if self.concepts.iter().any(|c| c.id == concept.id) {
            tracing::warn!(id = %concept.id, "duplicate concept id, skipping");
            return false;
        }
        if self.by_gloss.contains_key(&concept.name) {
            tracing::warn!(gloss = %concept.name, "duplicate concept gloss, skipping");
            return false;
        }
        self.by_gloss.insert(concept.name.clone(), self.concepts.len());
        self.concepts.push(concept);
        true
    }

    /// Concept ID for an English gloss.
    pub fn resolve(&self, gloss: &str) -> Option<&str> {
        self.by_gloss
            .get(gloss)
            .map(|&i| self.concepts[i].id.as_str())
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

// ============================================================================
// Languages
// ============================================================================

/// Language varieties keyed by canonical name. The first row for a
/// canonical name registers the variety; later rows reuse its identifier.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    by_canonical: BTreeMap<String, usize>,
}

impl LanguageRegistry {
    /// Loads `ID, Name, Glottocode, Latitude, Longitude, Location, SubGroup,
    /// Number` (only `Name` is required).
    pub fn load(path: &Path) -> Result<Self> {
        let rows = read_table(path)?;
        require(path, &rows, &["name"])?;

        let mut registry = LanguageRegistry::default();
        for row in &rows {
            let name = row.get("name").cloned().unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            registry.register(Language {
                id: row.get("id").cloned().unwrap_or_default(),
                name,
                glottocode: non_empty(row, "glottocode"),
                latitude: non_empty(row, "latitude"),
                longitude: non_empty(row, "longitude"),
                location: non_empty(row, "location"),
                subgroup: non_empty(row, "subgroup"),
                number: non_empty(row, "number"),
            });
        }
        Ok(registry)
    }

    /// Registers `language` under its canonical name and returns the ID the
    /// name resolves to. An empty ID defaults to the canonical name.
    pub fn register(&mut self, mut language: Language) -> &str {
        let canonical = canonical_language_name(&language.name);
        let index = match self.by_canonical.get(&canonical) {
            Some(&i) => i,
            None => {
                if language.id.is_empty() {
                    language.id = canonical.clone();
                }
                language.name = canonical.clone();
                self.languages.push(language);
                self.by_canonical.insert(canonical, self.languages.len() - 1);
                self.languages.len() - 1
            }
        };
        &self.languages[index].id
    }

    /// Language ID for a raw doculect name.
    pub fn resolve(&self, doculect: &str) -> Option<&str> {
        self.by_canonical
            .get(&canonical_language_name(doculect))
            .map(|&i| self.languages[i].id.as_str())
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
