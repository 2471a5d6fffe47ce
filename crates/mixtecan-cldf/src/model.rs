//! Record types for the four Wordlist tables.
//!
//! Optional source columns are plain `Option` members; the set of columns
//! each table carries is fixed in [`TableRecord::columns`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CldfError;

// ============================================================================
// Table schema description
// ============================================================================

/// Static description of one CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// CLDF property term, if the column carries one.
    pub property: Option<&'static str>,
    pub datatype: &'static str,
    /// List-valued columns store their items joined with this separator.
    pub separator: Option<&'static str>,
}

const fn col(name: &'static str, property: Option<&'static str>) -> ColumnSpec {
    ColumnSpec {
        name,
        property,
        datatype: "string",
        separator: None,
    }
}

/// A record that is written as one row of a CLDF component table.
pub trait TableRecord {
    /// Component name (`FormTable`, `CognateTable`, ...).
    const COMPONENT: &'static str;
    /// Default file name of the table inside the CLDF directory.
    const URL: &'static str;

    fn columns() -> &'static [ColumnSpec];

    /// Cell values, aligned with [`TableRecord::columns`].
    fn cells(&self) -> Vec<String>;

    fn id(&self) -> &str;
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ============================================================================
// Segments
// ============================================================================

/// Whitespace-separated phonological segmentation. The token `+` marks a
/// morpheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segments(Vec<String>);

pub const MORPHEME_BOUNDARY: &str = "+";

impl Segments {
    pub fn parse(raw: &str) -> Self {
        Self(raw.split_whitespace().map(str::to_string).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments grouped per morpheme. Empty groups produced by leading,
    /// trailing or doubled boundaries are kept, so the count stays faithful
    /// to what the annotator wrote.
    pub fn morphemes(&self) -> Vec<&[String]> {
        if self.0.is_empty() {
            return Vec::new();
        }
        self.0.split(|t| t == MORPHEME_BOUNDARY).collect()
    }

    pub fn morpheme_count(&self) -> usize {
        self.morphemes().len()
    }
}

impl fmt::Display for Segments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

// ============================================================================
// Coding scheme
// ============================================================================

/// Granularity of a cognate judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodingScheme {
    Broad,
    Fine,
}

impl CodingScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            CodingScheme::Broad => "broad",
            CodingScheme::Fine => "fine",
        }
    }
}

impl fmt::Display for CodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodingScheme {
    type Err = CldfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "broad" => Ok(CodingScheme::Broad),
            "fine" => Ok(CodingScheme::Fine),
            other => Err(CldfError::UnknownCoding(other.to_string())),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    pub glottocode: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub location: Option<String>,
    pub subgroup: Option<String>,
    pub number: Option<String>,
}

impl TableRecord for Language {
    const COMPONENT: &'static str = "LanguageTable";
    const URL: &'static str = "languages.csv";

    fn columns() -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            col("ID", Some("id")),
            col("Name", Some("name")),
            col("Glottocode", Some("glottocode")),
            ColumnSpec {
                datatype: "decimal",
                ..col("Latitude", Some("latitude"))
            },
            ColumnSpec {
                datatype: "decimal",
                ..col("Longitude", Some("longitude"))
            },
            col("Location", None),
            col("SubGroup", None),
            col("Number", None),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            opt(&self.glottocode),
            opt(&self.latitude),
            opt(&self.longitude),
            opt(&self.location),
            opt(&self.subgroup),
            opt(&self.number),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// A meaning slot (CLDF "parameter").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub number: String,
    pub concepticon_id: Option<String>,
    pub concepticon_gloss: Option<String>,
    pub spanish_gloss: Option<String>,
}

impl TableRecord for Concept {
    const COMPONENT: &'static str = "ParameterTable";
    const URL: &'static str = "parameters.csv";

    fn columns() -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            col("ID", Some("id")),
            col("Name", Some("name")),
            col("Number", None),
            col("Concepticon_ID", Some("concepticonReference")),
            col("Concepticon_Gloss", None),
            col("Spanish_Gloss", None),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.number.clone(),
            opt(&self.concepticon_id),
            opt(&self.concepticon_gloss),
            opt(&self.spanish_gloss),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Everything a form carries except its generated ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewForm {
    pub local_id: Option<String>,
    pub language_id: String,
    pub parameter_id: String,
    pub value: String,
    pub form: String,
    pub segments: Segments,
    pub source: Vec<String>,
    pub partial_cognacy: Option<String>,
    pub floating_tone: Option<String>,
    pub loan: Option<String>,
    pub loan_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    #[serde(flatten)]
    pub data: NewForm,
}

impl TableRecord for Form {
    const COMPONENT: &'static str = "FormTable";
    const URL: &'static str = "forms.csv";

    fn columns() -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            col("ID", Some("id")),
            col("Local_ID", None),
            col("Language_ID", Some("languageReference")),
            col("Parameter_ID", Some("parameterReference")),
            col("Value", Some("value")),
            col("Form", Some("form")),
            ColumnSpec {
                separator: Some(" "),
                ..col("Segments", Some("segments"))
            },
            ColumnSpec {
                separator: Some(";"),
                ..col("Source", Some("source"))
            },
            col("Partial_Cognacy", None),
            col("Floating_Tone", None),
            col("Loan", None),
            col("Loan_Source", None),
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        let d = &self.data;
        vec![
            self.id.clone(),
            opt(&d.local_id),
            d.language_id.clone(),
            d.parameter_id.clone(),
            d.value.clone(),
            d.form.clone(),
            d.segments.to_string(),
            d.source.join(";"),
            opt(&d.partial_cognacy),
            opt(&d.floating_tone),
            opt(&d.loan),
            opt(&d.loan_source),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Assertion that (a morpheme of) a form belongs to a cognate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cognate {
    pub id: String,
    pub form_id: String,
    pub cognateset_id: String,
    pub coding: Vec<CodingScheme>,
    /// Zero-based position of the cognate-ID token among the split tokens.
    pub morpheme_index: usize,
}

impl TableRecord for Cognate {
    const COMPONENT: &'static str = "CognateTable";
    const URL: &'static str = "cognates.csv";

    fn columns() -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            col("ID", Some("id")),
            col("Form_ID", Some("formReference")),
            col("Cognateset_ID", Some("cognatesetReference")),
            ColumnSpec {
                separator: Some(" "),
                ..col("Cognate_Coding", None)
            },
            ColumnSpec {
                datatype: "integer",
                ..col("Morpheme_Index", None)
            },
        ];
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.form_id.clone(),
            self.cognateset_id.clone(),
            self.coding
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            self.morpheme_index.to_string(),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }
}
