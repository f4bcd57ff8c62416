use crate::analyzers::PhpExtractor;
use crate::builders::{run_scan, ScanInput, ScanOptions, ScanResults};
use crate::cli::{self, ColorChoice};
use crate::config::{self, SigmapConfig};
use crate::io::output::{create_writer, OutputFormat};
use crate::progress::{ProgressConfig, ProgressManager};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Everything the `scan` command was invoked with.
#[derive(Debug, Clone)]
pub struct ScanCommandConfig {
    pub path: PathBuf,
    pub format: Option<cli::OutputFormat>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub input_json: bool,
    pub strict: bool,
    pub ignore: Vec<String>,
    pub no_parallel: bool,
    pub color: ColorChoice,
    pub quiet: bool,
}

/// Result of a scan as seen by the process: how many discrepancies were
/// reported and whether that should fail the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub discrepancies: usize,
    pub failed: bool,
}

pub fn handle_scan(command: ScanCommandConfig) -> Result<ScanOutcome> {
    let settings = load_settings(command.config.as_ref())?;
    let format = resolve_format(command.format, &settings)?;
    apply_color_choice(command.color, &settings, command.output.is_some());

    let options = build_scan_options(&command, &settings);
    let input = if command.input_json {
        ScanInput::ClassRecords(command.path.clone())
    } else {
        ScanInput::Sources(command.path.clone())
    };

    let progress = ProgressManager::new(ProgressConfig::from_env(command.quiet));
    let results = run_scan(&input, &options, &PhpExtractor::new(), &progress)
        .with_context(|| format!("Failed to scan {}", command.path.display()))?;
    progress
        .clear()
        .context("Failed to clear progress output")?;

    write_results(&results, format, command.output.as_ref())?;

    let strict = command.strict || settings.analysis.fail_on_discrepancy;
    let outcome = ScanOutcome {
        discrepancies: results.reports.len(),
        failed: strict && results.has_discrepancies(),
    };
    info!(
        discrepancies = outcome.discrepancies,
        strict = strict,
        "Scan finished"
    );
    Ok(outcome)
}

fn load_settings(explicit: Option<&PathBuf>) -> Result<SigmapConfig> {
    match explicit {
        Some(path) => config::load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::load_config()),
    }
}

/// CLI flag first, then the config default, then terminal.
fn resolve_format(
    flag: Option<cli::OutputFormat>,
    settings: &SigmapConfig,
) -> Result<OutputFormat> {
    if let Some(format) = flag {
        return Ok(format.into());
    }
    match &settings.output.default_format {
        Some(name) => name.parse::<OutputFormat>().map_err(anyhow::Error::msg),
        None => Ok(OutputFormat::Terminal),
    }
}

fn apply_color_choice(choice: ColorChoice, settings: &SigmapConfig, to_file: bool) {
    match choice {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto if to_file => colored::control::set_override(false),
        ColorChoice::Auto => {
            if let Some(use_color) = settings.output.use_color {
                colored::control::set_override(use_color);
            }
        }
    }
}

fn build_scan_options(command: &ScanCommandConfig, settings: &SigmapConfig) -> ScanOptions {
    let mut ignore_patterns = settings.scan.ignore.clone();
    ignore_patterns.extend(command.ignore.iter().cloned());

    ScanOptions {
        extensions: settings.scan.extensions.clone(),
        ignore_patterns,
        ignore_kinds: settings.analysis.ignore_kinds.clone(),
        parallel: settings.analysis.parallel && !command.no_parallel,
    }
}

fn write_results(
    results: &ScanResults,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut writer = create_writer(format, sink);
    writer.write_results(results)
}
