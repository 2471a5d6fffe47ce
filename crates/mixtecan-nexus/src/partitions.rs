//! Character-set partitions recovered from the emitted column labels.
//!
//! Deriving them from the finished matrix, instead of from the partition
//! map, keeps the `charset` indices in step with the written columns.

use crate::ascertainment::ASCERTAINMENT_SUFFIX;
use crate::error::{NexusError, Result};
use crate::matrix::NexusMatrix;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub name: String,
    /// 1-based character indices.
    pub characters: Vec<usize>,
}

/// Walks the columns in order: a correction column `<name>_0ascertainment`
/// opens partition `<name>`, every following column joins it. Fewer than two
/// correction columns means no partitioning and yields an empty list.
pub fn derive_partitions(nex: &NexusMatrix) -> Result<Vec<Partition>> {
    let corrections = nex
        .characters()
        .filter(|c| c.ends_with(ASCERTAINMENT_SUFFIX))
        .count();
    if corrections < 2 {
        return Ok(Vec::new());
    }

    let mut partitions: Vec<Partition> = Vec::new();
    let mut current: Option<usize> = None;
    for (i, label) in nex.characters().enumerate() {
        if label.ends_with(ASCERTAINMENT_SUFFIX) {
            let name = label.rsplit_once('_').map_or(label, |(head, _)| head);
            let idx = match partitions.iter().position(|p| p.name == name) {
                Some(idx) => idx,
                None => {
                    partitions.push(Partition {
                        name: name.to_string(),
                        characters: Vec::new(),
                    });
                    partitions.len() - 1
                }
            };
            current = Some(idx);
        }
        let Some(idx) = current else {
            return Err(NexusError::BadPartitions(label.to_string()));
        };
        partitions[idx].characters.push(i + 1);
    }
    Ok(partitions)
}
