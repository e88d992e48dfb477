// paradiff CLI - compare two versions of parallel-text spreadsheets

mod exit_codes;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use paradiff_align::{build_report, Workbook};
use paradiff_cli::config::{ConfigError, ResolvedRun, RunConfig, RunOverrides};
use paradiff_cli::output::{self, FileReport, OutputError};
use paradiff_io::{pair_directories, read_workbook, FilePair, IoError};

use exit_codes::{EXIT_CONFIG, EXIT_DIFFERENCES, EXIT_INPUT, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "paradiff")]
#[command(about = "Compare two versions of parallel-text spreadsheets row by row")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Rows are matched on the source column; the target column is what gets compared.
A modified row whose source is not at the same position is searched for up to
--realign rows above and below. Exit code 1 means differences were found.

Examples:
  paradiff --original v1.xlsx --modified v2.xlsx --source A --target B
  paradiff --original v1.xlsx --modified v2.xlsx --source B --target C --row-offset 1 --realign 5
  paradiff --original old/ --modified new/ --dir --source A --target B --out summary
  paradiff --original v1.xlsx --modified v2.xlsx --config run.toml --out csv --output diff.csv")]
struct Cli {
    /// Original workbook (a directory with --dir)
    #[arg(long)]
    original: PathBuf,

    /// Modified workbook (a directory with --dir)
    #[arg(long)]
    modified: PathBuf,

    /// Source text column letter (e.g. A)
    #[arg(long, value_name = "COLUMN")]
    source: Option<String>,

    /// Target text column letter (e.g. B)
    #[arg(long, value_name = "COLUMN")]
    target: Option<String>,

    /// Extra column carried into the report (e.g. a string key)
    #[arg(long, value_name = "COLUMN")]
    extra_column: Option<String>,

    /// Header rows to skip at the top of every sheet
    #[arg(long, value_name = "ROWS")]
    row_offset: Option<usize>,

    /// Rows above and below to search for a moved source (max 15 without --nocap)
    #[arg(long, value_name = "ROWS", allow_negative_numbers = true)]
    realign: Option<i64>,

    /// Accepted source edit distance in percent (max 35 without --nocap)
    #[arg(long, value_name = "PERCENT", allow_negative_numbers = true)]
    tolerate: Option<i64>,

    /// Lift the --realign and --tolerate caps
    #[arg(long)]
    nocap: bool,

    /// Do not report rows whose target is identical (source edits and pure moves)
    #[arg(long)]
    omit_identical: bool,

    /// Only compare worksheets whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    wspattern: Option<String>,

    /// Compare every spreadsheet in two directory trees, paired by file name
    #[arg(long)]
    dir: bool,

    /// TOML run file ([columns], [alignment], [worksheets])
    #[arg(long, env = "PARADIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, alias = "format", default_value = "json")]
    out: OutputFormat,

    /// Output file (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Include unchanged rows in json/csv output
    #[arg(long)]
    show_unchanged: bool,

    /// Quiet mode - suppress stderr summary and warnings
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Summary,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nengine:  paradiff-align ",
        env!("CARGO_PKG_VERSION"),
        "\ncontract_version(json): 1",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cmd_diff(cli) {
        Ok(code) => ExitCode::from(code),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingColumn(which) => CliError::usage(err.to_string())
                .with_hint(format!("pass --{which} or set `{which}` under [columns] in the config file")),
            ConfigError::Policy(_) => CliError::config(err.to_string())
                .with_hint("--realign and --tolerate take non-negative integers"),
            _ => CliError::config(err.to_string()),
        }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::InvalidColumn(_) => CliError::config(err.to_string()),
            IoError::UnsupportedFormat(_) => CliError::input(err.to_string())
                .with_hint("supported: xlsx, xlsm, xls, xlsb, ods, csv, tsv"),
            _ => CliError::input(err.to_string()),
        }
    }
}

impl From<OutputError> for CliError {
    fn from(err: OutputError) -> Self {
        CliError::output(err.to_string())
    }
}

// ============================================================================
// diff
// ============================================================================

fn cmd_diff(cli: Cli) -> Result<u8, CliError> {
    let config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let overrides = RunOverrides {
        source: cli.source.clone(),
        target: cli.target.clone(),
        extra: cli.extra_column.clone(),
        row_offset: cli.row_offset,
        realign_window: cli.realign,
        tolerate_percent: cli.tolerate,
        nocap: cli.nocap,
        omit_identical: cli.omit_identical,
        worksheet_pattern: cli.wspattern.clone(),
    };
    let run = config.resolve(&overrides)?;

    let pairs = if cli.dir {
        directory_pairs(&cli.original, &cli.modified)?
    } else {
        vec![file_pair(&cli.original, &cli.modified)?]
    };

    let mut files = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let mut report = compare_pair(&pair, &run)?;
        if !cli.show_unchanged {
            output::hide_unchanged(&mut report);
        }
        files.push(FileReport { key: pair.name, report });
    }

    let has_changes = files.iter().any(|f| f.report.has_changes());

    let bytes = match cli.out {
        OutputFormat::Json => output::format_json(&files)?,
        OutputFormat::Csv => output::format_csv(&files)?,
        OutputFormat::Summary => output::format_summary(&files).into_bytes(),
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &bytes).map_err(|e| CliError::output(format!("{}: {}", path.display(), e)))?;
        }
        None => {
            io::stdout().write_all(&bytes).map_err(|e| CliError::output(e.to_string()))?;
        }
    }

    // The summary format already is the summary
    if !cli.quiet && cli.out != OutputFormat::Summary {
        let total = output::RunSummary::collect(&files);
        eprintln!("files: {}", total.files);
        eprintln!("sheets: {}", total.sheets);
        eprintln!("changed rows: {}", total.changes);
        if total.warnings > 0 {
            eprintln!("warnings: {}", total.warnings);
        }
    }

    Ok(if has_changes { EXIT_DIFFERENCES } else { EXIT_SUCCESS })
}

/// Single-file mode: both paths must be files. The report key is the file
/// name, or `original/modified` when the names differ.
fn file_pair(original: &Path, modified: &Path) -> Result<FilePair, CliError> {
    for (flag, path) in [("--original", original), ("--modified", modified)] {
        if !path.is_file() {
            let err = CliError::usage(format!("{flag}: {} is not a file", path.display()));
            return Err(if path.is_dir() { err.with_hint("use --dir to compare directories") } else { err });
        }
    }
    let name = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let (a, b) = (name(original), name(modified));
    let key = if a == b { a } else { format!("{a}/{b}") };
    Ok(FilePair { name: key, original: Some(original.to_path_buf()), modified: Some(modified.to_path_buf()) })
}

fn directory_pairs(original: &Path, modified: &Path) -> Result<Vec<FilePair>, CliError> {
    for (flag, path) in [("--original", original), ("--modified", modified)] {
        if !path.is_dir() {
            return Err(CliError::usage(format!("{flag}: {} is not a directory", path.display())));
        }
    }
    let pairs = pair_directories(original, modified)?;
    if pairs.is_empty() {
        log::warn!("no spreadsheets found under {} or {}", original.display(), modified.display());
    }
    Ok(pairs)
}

/// Read both sides and build the report. A side missing from a directory
/// pair reads as an empty workbook, so every sheet is one-sided.
fn compare_pair(pair: &FilePair, run: &ResolvedRun) -> Result<paradiff_align::DiffReport, CliError> {
    let read = |path: Option<&PathBuf>| -> Result<Workbook, CliError> {
        match path {
            Some(p) => Ok(read_workbook(p, &run.columns)?),
            None => {
                log::warn!("{}: only present on one side", pair.name);
                Ok(Workbook::new())
            }
        }
    };
    let original = read(pair.original.as_ref())?;
    let modified = read(pair.modified.as_ref())?;

    log::info!("comparing {}", pair.name);
    Ok(build_report(&original, &modified, run.worksheet_pattern.as_ref(), &run.columns, &run.policy))
}
