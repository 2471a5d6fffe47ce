//! NEXUS character matrices from CLDF cognate judgments
//!
//! For every (concept, cognate set) pair the matrix holds one binary
//! character: `1` where a variety's form carries the set, `0` where the
//! variety attests the concept with another set, `?` where it has no form
//! for the concept. Optional ascertainment-correction columns are added per
//! [`Ascertainment`], and with two or more of them a `sets` block lists the
//! character indices of each partition.
//!
//! The whole file is rendered in memory; nothing is written until every
//! check has passed.

pub mod ascertainment;
pub mod cognates;
pub mod error;
pub mod matrix;
pub mod partitions;
pub mod render;

pub use ascertainment::{Ascertainment, PartitionMap};
pub use cognates::{CodingFilter, CognateSets};
pub use error::{NexusError, Result};
pub use matrix::{assign_state, make_matrix, CharacterState, NexusMatrix};
pub use partitions::{derive_partitions, Partition};

use mixtecan_cldf::CldfDataset;

/// A finished NEXUS document.
#[derive(Debug, Clone)]
pub struct NexusDocument {
    pub matrix: NexusMatrix,
    pub partitions: Vec<Partition>,
}

impl NexusDocument {
    pub fn build(sets: &CognateSets, ascertainment: &Ascertainment) -> Result<Self> {
        let matrix = make_matrix(sets, ascertainment)?;
        let partitions = derive_partitions(&matrix)?;
        Ok(Self { matrix, partitions })
    }

    pub fn from_dataset(
        dataset: &CldfDataset,
        filter: CodingFilter,
        ascertainment: &Ascertainment,
    ) -> Result<Self> {
        for component in ["CognateTable", "FormTable", "ParameterTable"] {
            if !dataset.has_table(component) {
                return Err(mixtecan_cldf::CldfError::MissingTable {
                    dir: dataset.dir().to_path_buf(),
                    component: component.to_string(),
                }
                .into());
            }
        }
        let sets = CognateSets::from_dataset(dataset, filter)?;
        Self::build(&sets, ascertainment)
    }

    pub fn render(&self) -> String {
        let mut text = render::render_matrix(&self.matrix);
        if !self.partitions.is_empty() {
            text.push_str(&render::render_sets(&self.partitions));
        }
        text
    }
}
