use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sheet_harvester::config::{HarvestConfig, Mode};
use sheet_harvester::harvest::{FileOutcome, Harvester};
use sheet_harvester::io::sheet_read::Spreadsheet;
use sheet_harvester::{HarvestError, Result};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;
    match cli.command {
        Command::Harvest(args) => execute_harvest(args),
        Command::Sheets(args) => execute_sheets(args),
    }
}

fn execute_harvest(args: HarvestArgs) -> Result<()> {
    let config = args.into_config()?;
    let report = Harvester::new(config).run()?;

    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Harvested { source, output } => {
                println!("harvested {} -> {}", source.display(), output.display());
            }
            FileOutcome::Skipped { source, reason } => {
                println!("skipped {}: {reason}", source.display());
            }
        }
    }
    println!(
        "{} harvested, {} skipped",
        report.harvested(),
        report.skipped()
    );
    Ok(())
}

fn execute_sheets(args: SheetsArgs) -> Result<()> {
    if !args.file.exists() {
        return Err(HarvestError::MissingInput(args.file));
    }

    let book = Spreadsheet::open(&args.file)?;
    for name in book.worksheet_names() {
        println!("{name}");
    }
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| HarvestError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate one worksheet from spreadsheets scattered across a region/month tree."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the source tree and collect the target worksheet per month.
    Harvest(HarvestArgs),
    /// List the worksheets available in a single spreadsheet file.
    Sheets(SheetsArgs),
}

#[derive(clap::Args)]
struct HarvestArgs {
    /// JSON file holding the full harvest configuration; replaces the
    /// individual flags below.
    #[arg(long, conflicts_with_all = ["source", "output"])]
    config: Option<PathBuf>,

    /// Root directory of the source tree.
    #[arg(long, required_unless_present = "config")]
    source: Option<PathBuf>,

    /// Root directory receiving the per-month output tree.
    #[arg(long, required_unless_present = "config")]
    output: Option<PathBuf>,

    /// Region code to harvest; repeat for several. Full mode only.
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Traversal mode.
    #[arg(long, value_enum, default_value_t = ModeArg::Full)]
    mode: ModeArg,

    /// Worksheet extracted from every candidate file.
    #[arg(long, default_value = "ENTR E SAIDAS MASTER")]
    worksheet: String,

    /// File-name prefix identifying candidate files.
    #[arg(long, default_value = "19.")]
    prefix: String,

    /// Name of the intermediate folder that, when present, holds a unit's
    /// candidate files.
    #[arg(long, default_value = "APURAÇÃO ICMS_ICMS ST_IPI")]
    assessment_folder: String,
}

#[derive(clap::Args)]
struct SheetsArgs {
    /// Spreadsheet file to inspect.
    file: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Simple,
    Full,
}

impl std::fmt::Display for ModeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeArg::Simple => write!(f, "simple"),
            ModeArg::Full => write!(f, "full"),
        }
    }
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => Mode::Simple,
            ModeArg::Full => Mode::Full,
        }
    }
}

impl HarvestArgs {
    fn into_config(self) -> Result<HarvestConfig> {
        if let Some(path) = self.config {
            return HarvestConfig::load(&path);
        }

        let (Some(source), Some(output)) = (self.source, self.output) else {
            return Err(HarvestError::Config(
                "--source and --output are required without --config".to_string(),
            ));
        };

        Ok(HarvestConfig {
            regions: self.regions,
            mode: self.mode.into(),
            worksheet: self.worksheet,
            file_prefix: self.prefix,
            assessment_folder: self.assessment_folder,
            ..HarvestConfig::new(source, output)
        })
    }
}
