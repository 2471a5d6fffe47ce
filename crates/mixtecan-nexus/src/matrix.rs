//! Presence/absence character matrix.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::ascertainment::{Ascertainment, ASCERTAINMENT_SUFFIX};
use crate::cognates::CognateSets;
use crate::error::{NexusError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterState {
    /// `1`: the variety's form carries the cognate set.
    Present,
    /// `0`: the variety attests the concept with another cognate set.
    Absent,
    /// `?`: the variety has no form for the concept.
    Missing,
}

impl CharacterState {
    pub fn symbol(self) -> char {
        match self {
            CharacterState::Present => '1',
            CharacterState::Absent => '0',
            CharacterState::Missing => '?',
        }
    }
}

impl fmt::Display for CharacterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// State of `doculect` for one cognate-set character.
///
/// Membership in the cognate set without attesting the concept cannot come
/// out of [`CognateSets`] and is reported as an error.
pub fn assign_state(
    doculect: &str,
    members: &BTreeSet<String>,
    attesting: &BTreeSet<String>,
) -> Option<CharacterState> {
    match (members.contains(doculect), attesting.contains(doculect)) {
        (true, true) => Some(CharacterState::Present),
        (false, true) => Some(CharacterState::Absent),
        (false, false) => Some(CharacterState::Missing),
        (true, false) => None,
    }
}

/// Taxa × characters, both kept in sorted label order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NexusMatrix {
    taxa: BTreeSet<String>,
    characters: BTreeMap<String, BTreeMap<String, CharacterState>>,
}

impl NexusMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, taxon: &str, character: &str, state: CharacterState) {
        self.taxa.insert(taxon.to_string());
        self.characters
            .entry(character.to_string())
            .or_default()
            .insert(taxon.to_string(), state);
    }

    pub fn taxa(&self) -> impl Iterator<Item = &str> {
        self.taxa.iter().map(String::as_str)
    }

    /// Character labels in column order.
    pub fn characters(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    pub fn ntax(&self) -> usize {
        self.taxa.len()
    }

    pub fn nchar(&self) -> usize {
        self.characters.len()
    }

    /// Cell value; unset cells read as missing.
    pub fn state(&self, taxon: &str, character: &str) -> CharacterState {
        self.characters
            .get(character)
            .and_then(|column| column.get(taxon))
            .copied()
            .unwrap_or(CharacterState::Missing)
    }

    /// One row per taxon: the taxon and its states in column order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.taxa().map(move |taxon| {
            let states = self
                .characters()
                .map(|c| self.state(taxon, c).symbol())
                .collect();
            (taxon, states)
        })
    }
}

/// Builds the character matrix, correction columns included.
pub fn make_matrix(sets: &CognateSets, ascertainment: &Ascertainment) -> Result<NexusMatrix> {
    let mut nex = NexusMatrix::new();
    let no_forms = BTreeSet::new();

    match ascertainment {
        Ascertainment::None => {}
        Ascertainment::Overall => {
            for d in &sets.doculects {
                nex.add(d, ASCERTAINMENT_SUFFIX, CharacterState::Absent);
            }
        }
        Ascertainment::Word => {
            for (word, attesting) in &sets.words {
                let label = format!("{word}_{ASCERTAINMENT_SUFFIX}");
                for d in &sets.doculects {
                    let state = if attesting.contains(d) {
                        CharacterState::Absent
                    } else {
                        CharacterState::Missing
                    };
                    nex.add(d, &label, state);
                }
            }
        }
        Ascertainment::Partitions(map) => {
            for partition in map.names() {
                let label = format!("{partition}_{ASCERTAINMENT_SUFFIX}");
                for d in &sets.doculects {
                    nex.add(d, &label, CharacterState::Absent);
                }
            }
        }
    }

    for (key, members) in &sets.cognates {
        let (concept, cognateset) = key;
        let label = match ascertainment {
            Ascertainment::Partitions(map) => {
                let partition = map.partition_of(key).ok_or_else(|| NexusError::Unpartitioned {
                    concept: concept.clone(),
                    cognateset: cognateset.clone(),
                })?;
                format!("{partition}_{concept}_{cognateset}")
            }
            _ => format!("{concept}_{cognateset}"),
        };
        let attesting = sets.words.get(concept).unwrap_or(&no_forms);
        for d in &sets.doculects {
            let state = assign_state(d, members, attesting).ok_or_else(|| {
                NexusError::ImpossibleState {
                    doculect: d.clone(),
                    character: label.clone(),
                }
            })?;
            nex.add(d, &label, state);
        }
    }

    tracing::info!(ntax = nex.ntax(), nchar = nex.nchar(), "built character matrix");
    Ok(nex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascertainment::PartitionMap;

    fn sample() -> CognateSets {
        let mut sets = CognateSets::new();
        sets.add("Mixtec", "hand", "12");
        sets.add("Trique", "hand", "13");
        sets.add("Trique", "water", "3");
        sets
    }

    fn column(nex: &NexusMatrix, character: &str) -> String {
        nex.taxa().map(|t| nex.state(t, character).symbol()).collect()
    }

    #[test]
    fn states_follow_membership_and_attestation() {
        let nex = make_matrix(&sample(), &Ascertainment::None).unwrap();
        assert_eq!(
            nex.characters().collect::<Vec<_>>(),
            vec!["hand_12", "hand_13", "water_3"]
        );
        assert_eq!(column(&nex, "hand_12"), "10");
        assert_eq!(column(&nex, "hand_13"), "01");
        assert_eq!(column(&nex, "water_3"), "?1");
    }

    #[test]
    fn overall_adds_one_constant_column() {
        let nex = make_matrix(&sample(), &Ascertainment::Overall).unwrap();
        assert_eq!(nex.nchar(), 4);
        assert_eq!(nex.characters().next(), Some("0ascertainment"));
        assert_eq!(column(&nex, "0ascertainment"), "00");
    }

    #[test]
    fn word_correction_marks_unattested_concepts_missing() {
        let nex = make_matrix(&sample(), &Ascertainment::Word).unwrap();
        assert_eq!(column(&nex, "hand_0ascertainment"), "00");
        assert_eq!(column(&nex, "water_0ascertainment"), "?0");
    }

    #[test]
    fn partitions_prefix_labels() {
        let mut map = PartitionMap::new();
        map.assign("body", "hand", "12").unwrap();
        map.assign("body", "hand", "13").unwrap();
        map.assign("nature", "water", "3").unwrap();
        let nex = make_matrix(&sample(), &Ascertainment::Partitions(map)).unwrap();
        assert_eq!(
            nex.characters().collect::<Vec<_>>(),
            vec![
                "body_0ascertainment",
                "body_hand_12",
                "body_hand_13",
                "nature_0ascertainment",
                "nature_water_3",
            ]
        );
        assert_eq!(column(&nex, "nature_0ascertainment"), "00");
    }

    #[test]
    fn unpartitioned_cognate_set_is_fatal() {
        let mut map = PartitionMap::new();
        map.assign("body", "hand", "12").unwrap();
        let err = make_matrix(&sample(), &Ascertainment::Partitions(map)).unwrap_err();
        assert!(matches!(err, NexusError::Unpartitioned { .. }));
    }

    #[test]
    fn member_without_attestation_has_no_state() {
        let members: BTreeSet<String> = ["Mixtec".to_string()].into();
        let attesting = BTreeSet::new();
        assert_eq!(assign_state("Mixtec", &members, &attesting), None);

        let mut sets = sample();
        sets.words.remove("hand");
        let err = make_matrix(&sets, &Ascertainment::None).unwrap_err();
        assert!(matches!(err, NexusError::ImpossibleState { .. }));
    }
}
