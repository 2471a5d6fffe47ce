//! Reader for lingpy-style tab-separated wordlists.
//!
//! ```text
//! ID	DOCULECT	CONCEPT	VALUE	FORM	TOKENS	SOURCE	COGIDS_BROAD
//! # comment lines and @metadata lines are skipped
//! 1	Mixtec_A	hand	ndaʔa	ndaʔa	n d a ʔ a	Jos83	12
//! ```
//!
//! Header names are matched case-insensitively. A few historical column
//! names are accepted as aliases (see [`canonical_column`]).

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use mixtecan_cldf::Segments;

use crate::error::{IngestError, Result};

/// Maps a header name onto the name the converter reads it by.
pub fn canonical_column(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "language" | "taxon" | "taxa" => "doculect".to_string(),
        "gloss" => "concept".to_string(),
        "segments" => "tokens".to_string(),
        "ipa" => "form".to_string(),
        _ => lower,
    }
}

const REQUIRED: &[&str] = &["doculect", "concept"];

#[derive(Debug, Clone)]
pub struct Wordlist {
    index: HashMap<String, usize>,
    rows: Vec<(String, Vec<String>)>,
}

impl Wordlist {
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let wl = Self::parse(&text, path)?;
        tracing::debug!(path = %path.display(), rows = wl.len(), "read wordlist");
        Ok(wl)
    }

    /// Parses wordlist text; `path` is only used in error messages.
    ///
    /// Cells are kept as written. `@key: value` metadata lines are blanked
    /// out before parsing so reported line numbers match the file.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let parse_err = |line: u64, message: String| IngestError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };
        let csv_err = |source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let body: String = text
            .lines()
            .map(|l| if l.starts_with('@') { "" } else { l })
            .collect::<Vec<_>>()
            .join("\n");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(body.as_bytes());
        let header = reader.headers().map_err(csv_err)?.clone();
        if header.iter().all(|h| h.trim().is_empty()) {
            return Err(IngestError::EmptyWordlist(path.to_path_buf()));
        }
        let header_line = header.position().map_or(1, |p| p.line());

        let mut columns: Vec<String> = header.iter().map(canonical_column).collect();
        let keyed = columns.first().map(String::as_str) == Some("id");
        if keyed {
            columns.remove(0);
        }

        let mut index = HashMap::new();
        for (i, c) in columns.iter().enumerate() {
            if index.insert(c.clone(), i).is_some() {
                return Err(parse_err(header_line, format!("duplicate column `{c}`")));
            }
        }
        for required in REQUIRED {
            if !index.contains_key(*required) {
                return Err(IngestError::MissingColumn {
                    path: path.to_path_buf(),
                    column: required.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let line_no = record.position().map_or(0, |p| p.line());
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            let key = if keyed {
                cells.remove(0)
            } else {
                (rows.len() + 1).to_string()
            };
            if key.trim().is_empty() {
                return Err(parse_err(line_no, "empty row key".to_string()));
            }
            if cells.len() > columns.len() {
                return Err(parse_err(
                    line_no,
                    format!("{} cells for {} columns", cells.len(), columns.len()),
                ));
            }
            cells.resize(columns.len(), String::new());
            if !seen.insert(key.clone()) {
                return Err(IngestError::DuplicateKey {
                    path: path.to_path_buf(),
                    key,
                });
            }
            rows.push((key, cells));
        }

        Ok(Self { index, rows })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(&canonical_column(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in file order as fixed records.
    pub fn rows(&self) -> impl Iterator<Item = WordlistRow> + '_ {
        self.rows.iter().map(move |(key, cells)| {
            let raw = |name: &str| self.index.get(name).map(|&i| cells[i].clone());
            let cell = |name: &str| raw(name).filter(|v| !v.is_empty());
            WordlistRow {
                key: key.clone(),
                doculect: cell("doculect").unwrap_or_default(),
                concept: cell("concept").unwrap_or_default(),
                value: cell("value"),
                form: cell("form").unwrap_or_default(),
                tokens: cell("tokens")
                    .map(|t| Segments::parse(&t))
                    .unwrap_or_default(),
                source: cell("source"),
                // present-but-empty stays `Some("")` for the morpheme check
                cogids_broad: raw("cogids_broad"),
                cogids_fine: raw("cogids_fine"),
                floating_tone: cell("floating_tone"),
                loan: cell("loan"),
                loan_source: cell("loan_source"),
            }
        })
    }
}

/// One wordlist row with the fields the converter consumes. Columns the
/// file lacks, and empty cells, are `None`; the cognate-ID fields are the
/// exception and are `Some("")` for an empty cell in a present column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordlistRow {
    pub key: String,
    pub doculect: String,
    pub concept: String,
    pub value: Option<String>,
    pub form: String,
    pub tokens: Segments,
    pub source: Option<String>,
    pub cogids_broad: Option<String>,
    pub cogids_fine: Option<String>,
    pub floating_tone: Option<String>,
    pub loan: Option<String>,
    pub loan_source: Option<String>,
}
