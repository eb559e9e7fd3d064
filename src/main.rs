//! inline-diff-json command-line interface.
//!
//! Reads two text revisions, compares them, and prints the inline diff as
//! JSON records or as human-readable text.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use inline_diff_json::{
    has_differences, try_compare_with_format, DiffConfig, InputError, OutputFormat,
    SectionTitlePolicy,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing::Level;

/// inline-diff-json - inline diff of two text revisions
///
/// Prints one JSON record per rendered line, with byte ranges of added and
/// deleted words and link anchors for paragraphs that moved.
#[derive(Parser)]
#[command(name = "inline-diff-json")]
#[command(version)]
#[command(about = "Inline JSON diff of two text revisions", long_about = None)]
struct Cli {
    /// Old revision
    #[arg(value_name = "OLD")]
    old: PathBuf,

    /// New revision
    #[arg(value_name = "NEW")]
    new: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "json")]
    format: OutputFormatArg,

    /// Unchanged lines shown around each change
    #[arg(short = 'C', long)]
    context: Option<usize>,

    /// TOML file with comparison settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Embed section titles without escaping them
    #[arg(long)]
    raw_section_titles: bool,

    /// Verbose output (log comparison progress to stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress the summary of text output)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Inline diff JSON document
    Json,
    /// Colored terminal output
    Terminal,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn read_revision(path: &Path) -> Result<String, InputError> {
    if !path.exists() {
        return Err(InputError::file_not_found(path.display().to_string()));
    }
    std::fs::read_to_string(path).map_err(|e| InputError::read_error(path.display().to_string(), e))
}

fn build_config(cli: &Cli) -> Result<DiffConfig> {
    let mut config = match &cli.config {
        Some(path) => DiffConfig::load(path)?,
        None => DiffConfig::default(),
    };
    if let Some(context) = cli.context {
        config.context_lines = context;
    }
    if cli.raw_section_titles {
        config.section_titles = SectionTitlePolicy::Raw;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<i32> {
    let config = build_config(&cli).context("Failed to load configuration")?;

    tracing::debug!(path = %cli.old.display(), "reading old revision");
    let old = read_revision(&cli.old)
        .with_context(|| format!("Failed to read old revision: {}", cli.old.display()))?;

    tracing::debug!(path = %cli.new.display(), "reading new revision");
    let new = read_revision(&cli.new)
        .with_context(|| format!("Failed to read new revision: {}", cli.new.display()))?;

    let format: OutputFormat = cli.format.into();
    let output =
        try_compare_with_format(&old, &new, &config, format).context("Failed to compare revisions")?;

    if cli.quiet && format != OutputFormat::Json {
        for line in output.lines() {
            if !line.starts_with("Summary:") && !line.trim().is_empty() {
                println!("{}", line);
            }
        }
    } else {
        println!("{}", output);
    }

    if has_differences(&old, &new) {
        Ok(1)
    } else {
        Ok(0)
    }
}
