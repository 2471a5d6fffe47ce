//! Row validator / mapper: wordlist rows → CLDF forms and cognate judgments.
//!
//! Data-quality problems (unknown language, unknown concept, cognate IDs
//! that do not line up with the morpheme segmentation) are collected into a
//! deduplicated warning set and never abort the run. Structural problems
//! (duplicate IDs in the output) are returned as errors.

use std::collections::{BTreeSet, HashSet};

use mixtecan_cldf::{CldfWriter, CodingScheme, Cognate, NewForm};

use crate::error::Result;
use crate::reference::{ConceptList, LanguageRegistry};
use crate::wordlist::WordlistRow;

/// Outcome of one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub rows: usize,
    pub forms: usize,
    pub cognates: usize,
    /// Rows that resolved but carried no form.
    pub empty_forms: usize,
    pub warnings: BTreeSet<String>,
}

impl ConversionReport {
    fn warn(&mut self, message: String) {
        self.warnings.insert(message);
    }

    /// Warnings sorted and numbered from 1, one per line: `   1 concept missing x`.
    pub fn numbered(&self) -> Vec<String> {
        self.warnings
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{:4} {}", i + 1, w))
            .collect()
    }
}

pub struct Converter<'a> {
    concepts: &'a ConceptList,
    languages: &'a LanguageRegistry,
}

impl<'a> Converter<'a> {
    pub fn new(concepts: &'a ConceptList, languages: &'a LanguageRegistry) -> Self {
        Self {
            concepts,
            languages,
        }
    }

    pub fn convert<I>(&self, rows: I, writer: &mut CldfWriter) -> Result<ConversionReport>
    where
        I: IntoIterator<Item = WordlistRow>,
    {
        let mut report = ConversionReport::default();
        for row in rows {
            self.convert_row(&row, writer, &mut report)?;
        }
        tracing::info!(
            rows = report.rows,
            forms = report.forms,
            cognates = report.cognates,
            warnings = report.warnings.len(),
            "converted wordlist"
        );
        Ok(report)
    }

    pub fn convert_row(
        &self,
        row: &WordlistRow,
        writer: &mut CldfWriter,
        report: &mut ConversionReport,
    ) -> Result<()> {
        report.rows += 1;

        let Some(concept_id) = self.concepts.resolve(&row.concept) else {
            report.warn(format!("concept missing {}", row.concept));
            return Ok(());
        };
        let Some(language_id) = self.languages.resolve(&row.doculect) else {
            report.warn(format!("language missing {}", row.doculect));
            return Ok(());
        };
        if row.form.is_empty() {
            report.empty_forms += 1;
            return Ok(());
        }

        for raw in [&row.cogids_broad, &row.cogids_fine].into_iter().flatten() {
            let ids = raw.split_whitespace().count();
            if ids != row.tokens.morpheme_count() {
                report.warn(format!(
                    "partial cognates: {} / {} / {}",
                    row.key, row.tokens, raw
                ));
            }
        }

        let form_id = writer
            .add_form(map_row(row, language_id, concept_id))?
            .id
            .clone();
        report.forms += 1;

        for cognate in cognate_judgments(
            &form_id,
            row.cogids_broad.as_deref(),
            row.cogids_fine.as_deref(),
        ) {
            writer.add_cognate(cognate)?;
            report.cognates += 1;
        }
        Ok(())
    }
}

/// Fixed column mapping from a wordlist row onto the FormTable.
pub fn map_row(row: &WordlistRow, language_id: &str, concept_id: &str) -> NewForm {
    NewForm {
        local_id: Some(row.key.clone()),
        language_id: language_id.to_string(),
        parameter_id: concept_id.to_string(),
        value: row.value.clone().unwrap_or_else(|| row.form.clone()),
        form: row.form.clone(),
        segments: row.tokens.clone(),
        source: split_sources(row.source.as_deref()),
        partial_cognacy: row.cogids_broad.clone().filter(|c| !c.is_empty()),
        floating_tone: row.floating_tone.clone(),
        loan: row.loan.clone(),
        loan_source: row.loan_source.clone(),
    }
}

fn split_sources(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split([',', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Cognate judgments for one form.
///
/// Every broad token yields a judgment at its position, tagged `fine` as
/// well when the same ID also occurs in the fine coding. Fine IDs that do not
/// occur in the broad coding yield additional fine-only judgments.
pub fn cognate_judgments(form_id: &str, broad: Option<&str>, fine: Option<&str>) -> Vec<Cognate> {
    let broad: Vec<&str> = broad.map(|s| s.split_whitespace().collect()).unwrap_or_default();
    let fine: Vec<&str> = fine.map(|s| s.split_whitespace().collect()).unwrap_or_default();
    let broad_set: HashSet<&str> = broad.iter().copied().collect();
    let fine_set: HashSet<&str> = fine.iter().copied().collect();

    let mut out = Vec::with_capacity(broad.len() + fine.len());
    for (i, id) in broad.iter().enumerate() {
        let mut coding = vec![CodingScheme::Broad];
        if fine_set.contains(id) {
            coding.push(CodingScheme::Fine);
        }
        out.push(Cognate {
            id: format!("{}-{}", form_id, i + 1),
            form_id: form_id.to_string(),
            cognateset_id: id.to_string(),
            coding,
            morpheme_index: i,
        });
    }
    for (i, id) in fine.iter().enumerate() {
        if broad_set.contains(id) {
            continue;
        }
        out.push(Cognate {
            id: format!("{}-{}-fine", form_id, i + 1),
            form_id: form_id.to_string(),
            cognateset_id: id.to_string(),
            coding: vec![CodingScheme::Fine],
            morpheme_index: i,
        });
    }
    out
}
