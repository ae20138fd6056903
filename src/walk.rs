use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{HarvestConfig, Mode};
use crate::error::Result;
use crate::matcher;
use crate::model::SourceLocation;

/// Scans one region directory and returns every candidate file beneath it,
/// tagged with the month (and unit, in full mode) it was found under.
///
/// The month level is always a directory listing of the region directory.
/// Below that the two modes diverge: simple mode expects candidate files
/// directly inside each month directory, while full mode descends into
/// business-unit folders and, within each unit, prefers the assessment
/// subfolder when one exists and falls back to the unit directory itself
/// otherwise. A unit's files are scanned exactly once either way.
///
/// Entries are visited in name order at every level, so the sequence is
/// deterministic, and with it the winner when two files map to the same
/// output path.
pub fn scan_region(
    region_dir: &Path,
    region: &str,
    config: &HarvestConfig,
) -> Result<Vec<SourceLocation>> {
    let mut found = Vec::new();

    for month_dir in subdirectories(region_dir)? {
        let month = dir_label(&month_dir);
        debug!(region, month = %month, "scanning month directory");

        match config.mode {
            Mode::Simple => {
                scan_leaf(&month_dir, region, &month, None, config, &mut found)?;
            }
            Mode::Full => {
                for unit_dir in subdirectories(&month_dir)? {
                    let unit = dir_label(&unit_dir);
                    let assessment_dir = unit_dir.join(&config.assessment_folder);
                    let leaf = if assessment_dir.is_dir() {
                        debug!(region, month = %month, unit = %unit, "using assessment folder");
                        assessment_dir
                    } else {
                        debug!(region, month = %month, unit = %unit, "no assessment folder, scanning unit");
                        unit_dir
                    };
                    scan_leaf(&leaf, region, &month, Some(unit), config, &mut found)?;
                }
            }
        }
    }

    Ok(found)
}

fn scan_leaf(
    dir: &Path,
    region: &str,
    month: &str,
    unit: Option<String>,
    config: &HarvestConfig,
    found: &mut Vec<SourceLocation>,
) -> Result<()> {
    for path in sorted_entries(dir)? {
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if matcher::is_candidate(name, &config.file_prefix, &config.extensions) {
            debug!(file = %path.display(), "candidate found");
            found.push(SourceLocation {
                path: path.clone(),
                region: region.to_string(),
                month: month.to_string(),
                unit: unit.clone(),
            });
        }
    }

    Ok(())
}

/// Lists the subdirectories of `dir`, sorted by name.
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

/// Final path component as a displayable label.
pub fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
