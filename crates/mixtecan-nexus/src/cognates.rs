//! Cognate-set grouping over a CLDF dataset.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use mixtecan_cldf::{CldfDataset, CodingScheme};

use crate::error::{NexusError, Result};

/// Which judgments take part in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodingFilter {
    #[default]
    Broad,
    Fine,
    Any,
}

impl CodingFilter {
    pub fn scheme(self) -> Option<CodingScheme> {
        match self {
            CodingFilter::Broad => Some(CodingScheme::Broad),
            CodingFilter::Fine => Some(CodingScheme::Fine),
            CodingFilter::Any => None,
        }
    }
}

impl FromStr for CodingFilter {
    type Err = NexusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "broad" => Ok(CodingFilter::Broad),
            "fine" => Ok(CodingFilter::Fine),
            "any" => Ok(CodingFilter::Any),
            other => Err(NexusError::UnknownCoding(other.to_string())),
        }
    }
}

impl fmt::Display for CodingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme() {
            Some(scheme) => write!(f, "{scheme}"),
            None => f.write_str("any"),
        }
    }
}

/// A (concept, cognate set) pair. Ordered by concept label, then cognate-set
/// label, which is the character order of the matrix.
pub type CognateSetKey = (String, String);

/// Language varieties grouped by concept and by cognate set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CognateSets {
    /// Every variety with at least one retained judgment.
    pub doculects: BTreeSet<String>,
    /// concept → varieties attesting it.
    pub words: BTreeMap<String, BTreeSet<String>>,
    /// (concept, cognate set) → varieties whose form carries that set.
    pub cognates: BTreeMap<CognateSetKey, BTreeSet<String>>,
}

impl CognateSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one judgment of `doculect`'s form for `concept`.
    pub fn add(&mut self, doculect: &str, concept: &str, cognateset: &str) {
        self.doculects.insert(doculect.to_string());
        self.words
            .entry(concept.to_string())
            .or_default()
            .insert(doculect.to_string());
        self.cognates
            .entry((concept.to_string(), cognateset.to_string()))
            .or_default()
            .insert(doculect.to_string());
    }

    /// Groups the dataset's cognate judgments, keeping only those whose coding
    /// includes the filter's scheme.
    pub fn from_dataset(dataset: &CldfDataset, filter: CodingFilter) -> Result<Self> {
        let concepts: HashMap<String, String> = dataset
            .rows("ParameterTable", &["id", "name"])?
            .into_iter()
            .map(|mut row| {
                let id = row.remove("id").unwrap_or_default();
                (id, row.remove("name").unwrap_or_default())
            })
            .collect();
        let forms: HashMap<String, (String, String)> = dataset
            .rows("FormTable", &["id", "languageReference", "parameterReference"])?
            .into_iter()
            .map(|mut row| {
                (
                    row.remove("id").unwrap_or_default(),
                    (
                        row.remove("languageReference").unwrap_or_default(),
                        row.remove("parameterReference").unwrap_or_default(),
                    ),
                )
            })
            .collect();

        let scheme = filter.scheme();
        let mut terms = vec!["formReference", "cognatesetReference"];
        if scheme.is_some() {
            if !dataset.has_column("CognateTable", "Cognate_Coding") {
                return Err(NexusError::MissingCodingColumn);
            }
            terms.push("Cognate_Coding");
        }
        let separator = dataset.separator("CognateTable", "Cognate_Coding");

        let mut sets = CognateSets::new();
        let mut skipped = 0usize;
        for row in dataset.rows("CognateTable", &terms)? {
            if let Some(scheme) = scheme {
                let coding = row.get("Cognate_Coding").map(String::as_str).unwrap_or("");
                if !coding_includes(coding, separator, scheme) {
                    skipped += 1;
                    continue;
                }
            }
            let form_id = &row["formReference"];
            let (language, parameter) = forms
                .get(form_id)
                .ok_or_else(|| NexusError::DanglingForm(form_id.clone()))?;
            let concept = concepts
                .get(parameter)
                .ok_or_else(|| NexusError::DanglingConcept(parameter.clone()))?;
            sets.add(language, concept, &row["cognatesetReference"]);
        }

        tracing::info!(
            filter = %filter,
            doculects = sets.doculects.len(),
            concepts = sets.words.len(),
            cognate_sets = sets.cognates.len(),
            skipped,
            "grouped cognate judgments"
        );
        Ok(sets)
    }
}

/// Whether a `Cognate_Coding` cell lists `scheme`. Cells are split on the
/// column's separator, or on whitespace and commas when it has none.
fn coding_includes(cell: &str, separator: Option<&str>, scheme: CodingScheme) -> bool {
    let matches = |token: &str| token.parse::<CodingScheme>().is_ok_and(|s| s == scheme);
    match separator {
        Some(sep) if !sep.trim().is_empty() => cell.split(sep).any(matches),
        _ => cell.split(|c: char| c.is_whitespace() || c == ',').any(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coding_filter_parses_exact_names() {
        assert_eq!("broad".parse::<CodingFilter>().unwrap(), CodingFilter::Broad);
        assert_eq!("any".parse::<CodingFilter>().unwrap(), CodingFilter::Any);
        let err = "Broad ".parse::<CodingFilter>().unwrap_err();
        assert!(err.to_string().contains("Must be 'broad', 'fine', or 'any'"));
    }

    #[test]
    fn coding_cells_are_tokenised() {
        assert!(coding_includes("broad fine", Some(" "), CodingScheme::Fine));
        assert!(coding_includes("broad,fine", None, CodingScheme::Broad));
        assert!(coding_includes("broad;fine", Some(";"), CodingScheme::Fine));
        assert!(!coding_includes("broad", Some(" "), CodingScheme::Fine));
        assert!(!coding_includes("", None, CodingScheme::Broad));
        assert!(coding_includes("Broad , FINE", None, CodingScheme::Fine));
        assert!(coding_includes(" fine ; broad", Some(";"), CodingScheme::Fine));
        assert!(!coding_includes("broadish", None, CodingScheme::Broad));
    }

    #[test]
    fn add_groups_by_concept_and_set() {
        let mut sets = CognateSets::new();
        sets.add("Mixtec", "hand", "12");
        sets.add("Trique", "hand", "13");
        sets.add("Trique", "hand", "12");

        assert_eq!(sets.doculects.len(), 2);
        assert_eq!(sets.words["hand"].len(), 2);
        let keys: Vec<_> = sets.cognates.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                ("hand".to_string(), "12".to_string()),
                ("hand".to_string(), "13".to_string()),
            ]
        );
    }
}
