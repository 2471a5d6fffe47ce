//! Ascertainment-correction modes and partition files.

use std::collections::BTreeMap;
use std::path::Path;

use crate::cognates::CognateSetKey;
use crate::error::{NexusError, Result};

const UNKNOWN_COGIDS: &str = "Unknown COGIDS column, expecting either COGIDS_BROAD or COGIDS_FINE";

/// Label suffix shared by every correction column.
pub const ASCERTAINMENT_SUFFIX: &str = "0ascertainment";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Ascertainment {
    #[default]
    None,
    /// One constant-`0` column.
    Overall,
    /// One column per concept: `0` where attested, `?` elsewhere.
    Word,
    /// One constant-`0` column per partition; characters are labelled with
    /// their partition.
    Partitions(PartitionMap),
}

impl Ascertainment {
    /// `none`, `overall` or `word` (any case), or else a path to a
    /// partition file.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "none" => return Ok(Ascertainment::None),
            "overall" => return Ok(Ascertainment::Overall),
            "word" => return Ok(Ascertainment::Word),
            _ => {}
        }
        let path = Path::new(value);
        if path.is_file() {
            return Ok(Ascertainment::Partitions(PartitionMap::read(path)?));
        }
        Err(NexusError::UnknownAscertainment(value.to_string()))
    }
}

/// Partition name per cognate set. Building the map fails when a cognate
/// set is claimed by two partitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionMap {
    partitions: BTreeMap<String, Vec<CognateSetKey>>,
    lookup: BTreeMap<CognateSetKey, String>,
}

impl PartitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `(concept, cognateset)` to `partition`. Repeating the same
    /// assignment is harmless; a different partition is an error.
    pub fn assign(&mut self, partition: &str, concept: &str, cognateset: &str) -> Result<()> {
        let key = (concept.to_string(), cognateset.to_string());
        match self.lookup.get(&key) {
            Some(existing) if existing == partition => return Ok(()),
            Some(existing) => {
                return Err(NexusError::TwoPartitions {
                    concept: key.0,
                    cognateset: key.1,
                    first: existing.clone(),
                    second: partition.to_string(),
                })
            }
            None => {}
        }
        self.partitions
            .entry(partition.to_string())
            .or_default()
            .push(key.clone());
        self.lookup.insert(key, partition.to_string());
        Ok(())
    }

    /// Reads a tab-separated file with `PARTITION`, `CONCEPT` and either
    /// `COGIDS_BROAD` or `COGIDS_FINE` columns.
    pub fn read(path: &Path) -> Result<Self> {
        let csv_err = |source| NexusError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;
        let headers = reader.headers().map_err(csv_err)?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);
        let (Some(partition_col), Some(concept_col)) = (column("PARTITION"), column("CONCEPT"))
        else {
            return Err(NexusError::PartitionFile {
                path: path.to_path_buf(),
                line: 1,
                message: "expecting PARTITION and CONCEPT columns".to_string(),
            });
        };
        let broad_col = column("COGIDS_BROAD");
        let fine_col = column("COGIDS_FINE");

        let mut map = PartitionMap::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let cell = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
            };
            let Some(cogid) = cell(broad_col).or_else(|| cell(fine_col)) else {
                return Err(NexusError::PartitionFile {
                    path: path.to_path_buf(),
                    line,
                    message: UNKNOWN_COGIDS.to_string(),
                });
            };
            let partition = cell(Some(partition_col)).unwrap_or("");
            let concept = cell(Some(concept_col)).unwrap_or("");
            map.assign(partition, concept, cogid)?;
        }
        tracing::debug!(
            path = %path.display(),
            partitions = map.partitions.len(),
            cognate_sets = map.lookup.len(),
            "read partition file"
        );
        Ok(map)
    }

    /// Partition names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.partitions.keys().map(String::as_str)
    }

    pub fn partition_of(&self, key: &CognateSetKey) -> Option<&str> {
        self.lookup.get(key).map(String::as_str)
    }
}
