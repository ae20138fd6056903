use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::config::{HarvestConfig, Mode};
use crate::error::{HarvestError, Result};
use crate::io::sheet_read::{self, SheetFormat, Spreadsheet};
use crate::io::sheet_write;
use crate::model::{OutputTarget, SourceLocation, Table};
use crate::walk;

/// What happened to one discovered source file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// The worksheet was extracted and written to `output`.
    Harvested { source: PathBuf, output: PathBuf },
    /// The file was skipped; the batch carried on.
    Skipped { source: PathBuf, reason: String },
}

/// Per-file outcomes of one pipeline run.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub outcomes: Vec<FileOutcome>,
}

impl HarvestReport {
    pub fn harvested(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, FileOutcome::Harvested { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.harvested()
    }
}

/// Drives the whole pipeline: region iteration, directory walking, per-file
/// extraction, and output writing. One failing file never aborts the batch;
/// its error is recorded as a [`FileOutcome::Skipped`] and processing moves
/// to the next file.
pub struct Harvester {
    config: HarvestConfig,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline over every configured region. The only fatal error
    /// is a missing source root; everything below region level is recovered
    /// and reported.
    #[instrument(
        level = "info",
        skip_all,
        fields(
            source = %self.config.source_root.display(),
            output = %self.config.output_root.display(),
        )
    )]
    pub fn run(&self) -> Result<HarvestReport> {
        if !self.config.source_root.is_dir() {
            return Err(HarvestError::MissingSourceRoot(
                self.config.source_root.clone(),
            ));
        }

        let mut report = HarvestReport::default();
        for region in self.regions()? {
            info!(region = %region, "processing region");
            let region_dir = self.config.source_root.join(&region);
            if !region_dir.is_dir() {
                warn!(region = %region, "region directory not found, skipping");
                continue;
            }

            let sources = match walk::scan_region(&region_dir, &region, &self.config) {
                Ok(sources) => sources,
                Err(error) => {
                    warn!(region = %region, %error, "region scan failed, skipping");
                    continue;
                }
            };
            if sources.is_empty() {
                info!(region = %region, "no candidate files found");
                continue;
            }

            for source in sources {
                match self.process_file(&source) {
                    Ok(output) => {
                        info!(file = %source.path.display(), output = %output.display(), "harvested");
                        report.outcomes.push(FileOutcome::Harvested {
                            source: source.path,
                            output,
                        });
                    }
                    Err(error) => {
                        warn!(file = %source.path.display(), %error, "file skipped");
                        report.outcomes.push(FileOutcome::Skipped {
                            source: source.path,
                            reason: error.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            harvested = report.harvested(),
            skipped = report.skipped(),
            "harvest finished"
        );
        Ok(report)
    }

    /// Extracts the configured worksheet from one source file and writes it
    /// to the month-keyed destination. Every failure mode surfaces here as
    /// an error for the caller to record.
    #[instrument(
        level = "debug",
        skip_all,
        fields(file = %source.path.display(), region = %source.region)
    )]
    fn process_file(&self, source: &SourceLocation) -> Result<PathBuf> {
        let table = self.read_source(source)?;
        let target = OutputTarget::resolve(&self.config.output_root, source);
        sheet_write::write_table(&target, &table, &self.config.worksheet)
    }

    fn read_source(&self, source: &SourceLocation) -> Result<Table> {
        let format = SheetFormat::from_path(&source.path)?;
        if format.is_sheetless() {
            return sheet_read::read_csv(&source.path);
        }

        let mut book = Spreadsheet::open(&source.path)?;
        if self.config.mode == Mode::Full {
            let names = book.worksheet_names();
            if !names.iter().any(|name| name == &self.config.worksheet) {
                return Err(HarvestError::MissingWorksheet {
                    path: source.path.clone(),
                    worksheet: self.config.worksheet.clone(),
                    available: names,
                });
            }
        }
        book.read_table(&self.config.worksheet)
    }

    /// Regions to visit: the configured codes in full mode, every
    /// subdirectory of the source root in simple mode.
    fn regions(&self) -> Result<Vec<String>> {
        match self.config.mode {
            Mode::Full => {
                if self.config.regions.is_empty() {
                    warn!("no regions configured, nothing to do");
                }
                Ok(self.config.regions.clone())
            }
            Mode::Simple => Ok(walk::subdirectories(&self.config.source_root)?
                .iter()
                .map(|dir| walk::dir_label(dir))
                .collect()),
        }
    }
}
