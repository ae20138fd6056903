use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Traversal mode of the harvest pipeline.
///
/// `Simple` expects candidate files directly inside each month directory and
/// applies no region filter. `Full` filters by configured region codes,
/// descends into business-unit folders, prefers the assessment subfolder
/// when one exists, and pre-checks that the target worksheet is present
/// before reading a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Simple,
    #[default]
    Full,
}

/// Everything the pipeline needs to run, gathered in one place instead of
/// scattered constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Root of the source tree (`root/<region>/<month>/...`).
    pub source_root: PathBuf,
    /// Root of the output tree (`out/<month>/<file>`).
    pub output_root: PathBuf,
    /// Region codes to harvest. Ignored in simple mode, where every
    /// subdirectory of the source root is visited.
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub mode: Mode,
    /// Worksheet extracted from every candidate workbook.
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// File-name prefix identifying candidate files.
    #[serde(default = "default_prefix")]
    pub file_prefix: String,
    /// Extension allow-list, compared case-insensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Name of the intermediate folder that, when present inside a unit,
    /// is the authoritative location of that unit's candidate files.
    #[serde(default = "default_assessment_folder")]
    pub assessment_folder: String,
}

impl HarvestConfig {
    /// Creates a configuration with the conventional defaults for
    /// everything except the two roots.
    pub fn new(source_root: PathBuf, output_root: PathBuf) -> Self {
        Self {
            source_root,
            output_root,
            regions: Vec::new(),
            mode: Mode::default(),
            worksheet: default_worksheet(),
            file_prefix: default_prefix(),
            extensions: default_extensions(),
            assessment_folder: default_assessment_folder(),
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

fn default_worksheet() -> String {
    "ENTR E SAIDAS MASTER".to_string()
}

fn default_prefix() -> String {
    "19.".to_string()
}

fn default_extensions() -> Vec<String> {
    ["xlsx", "xls", "csv", "xlsb"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_assessment_folder() -> String {
    "APURAÇÃO ICMS_ICMS ST_IPI".to_string()
}
