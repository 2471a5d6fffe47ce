//! Dataset configuration (`metadata.json` at the dataset root).

use std::fs;
use std::path::{Path, PathBuf};

use mixtecan_cldf::DatasetInfo;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

pub const CONFIG_FILE: &str = "metadata.json";
pub const DEFAULT_ID: &str = "mixtecansubgrouping";
pub const DEFAULT_WORDLIST: &str = "sm3_mixtecan_cognates.tsv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub id: String,
    pub title: Option<String>,
    pub license: Option<String>,
    pub citation: Option<String>,
    pub url: Option<String>,
    /// File name of the raw wordlist inside `raw/`.
    pub wordlist: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID.to_string(),
            title: None,
            license: None,
            citation: None,
            url: None,
            wordlist: DEFAULT_WORDLIST.to_string(),
        }
    }
}

impl DatasetConfig {
    /// Reads `<dir>/metadata.json`; a missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no dataset config, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|source| IngestError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| IngestError::Config { path, source })
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id.clone(),
            title: self.title.clone(),
            license: self.license.clone(),
            citation: self.citation.clone(),
            url: self.url.clone(),
        }
    }
}

/// Where a dataset keeps its inputs and outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    pub fn etc_dir(&self) -> PathBuf {
        self.root.join("etc")
    }

    pub fn cldf_dir(&self) -> PathBuf {
        self.root.join("cldf")
    }

    pub fn concepts(&self) -> PathBuf {
        self.etc_dir().join("concepts.tsv")
    }

    /// `etc/languages.csv`, or `etc/languages.tsv` when only that exists.
    pub fn languages(&self) -> PathBuf {
        let csv = self.etc_dir().join("languages.csv");
        let tsv = self.etc_dir().join("languages.tsv");
        if !csv.exists() && tsv.exists() {
            tsv
        } else {
            csv
        }
    }

    pub fn sources(&self) -> PathBuf {
        self.raw_dir().join("sources.bib")
    }
}
