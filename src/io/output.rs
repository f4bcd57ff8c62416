use crate::analysis::{DiscrepancyReport, ParameterPair};
use crate::builders::ScanResults;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::io::Write;
use std::str::FromStr;

/// Marker shown where one signature has no parameter at a position.
pub const ABSENT_PARAMETER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "terminal" => Ok(Self::Terminal),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

pub trait OutputWriter {
    fn write_results(&mut self, results: &ScanResults) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_results(&mut self, results: &ScanResults) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_results(&mut self, results: &ScanResults) -> anyhow::Result<()> {
        writeln!(self.writer, "# Signature Compatibility Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Scanned: `{}`", results.project_path.display())?;
        writeln!(self.writer)?;

        let summary = &results.summary;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Files | {} |", summary.files)?;
        writeln!(self.writer, "| Unparsable files | {} |", summary.failed_files)?;
        writeln!(self.writer, "| Classes | {} |", summary.classes)?;
        writeln!(self.writer, "| Hierarchy roots | {} |", summary.roots)?;
        writeln!(self.writer, "| Orphans | {} |", summary.orphans)?;
        writeln!(self.writer, "| Discrepancies | {} |", summary.reports)?;
        writeln!(self.writer)?;

        for report in &results.reports {
            self.write_report(report)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_report(&mut self, report: &DiscrepancyReport) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "## `{}` vs `{}`",
            report.ancestor_id(),
            report.descendant_id()
        )?;
        writeln!(self.writer)?;
        if let Some(location) = &report.location {
            writeln!(self.writer, "Location: `{}`", location)?;
            writeln!(self.writer)?;
        }
        writeln!(
            self.writer,
            "| {} | {} |",
            report.ancestor_id(),
            report.descendant_id()
        )?;
        writeln!(self.writer, "|---|---|")?;
        for pair in &report.parameter_pairs {
            let (ancestor, descendant) = pair_cells(pair);
            writeln!(self.writer, "| {} | {} |", ancestor, descendant)?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "Result: {}", report.kind)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_results(&mut self, results: &ScanResults) -> anyhow::Result<()> {
        for report in &results.reports {
            self.write_report(report)?;
        }
        self.write_failures(results)?;
        self.write_summary(results)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_report(&mut self, report: &DiscrepancyReport) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} {} and {}",
            "Signature mismatch between".red().bold(),
            report.ancestor_id().yellow(),
            report.descendant_id().yellow()
        )?;
        if let Some(location) = &report.location {
            writeln!(self.writer, "  at {}", location.to_string().dimmed())?;
        }
        writeln!(self.writer, "{}", parameter_table(report))?;
        writeln!(self.writer, "Result: {}", report.kind)?;
        Ok(())
    }

    fn write_failures(&mut self, results: &ScanResults) -> anyhow::Result<()> {
        if results.failures.is_empty() {
            return Ok(());
        }
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} ({}):",
            "Skipped files".yellow().bold(),
            results.failures.len()
        )?;
        for failure in &results.failures {
            writeln!(self.writer, "  - {}", failure.message)?;
        }
        Ok(())
    }

    fn write_summary(&mut self, results: &ScanResults) -> anyhow::Result<()> {
        let summary = &results.summary;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Summary:".bold())?;
        writeln!(self.writer, "  Files scanned: {}", summary.files)?;
        writeln!(self.writer, "  Classes: {}", summary.classes)?;
        writeln!(
            self.writer,
            "  Hierarchy roots: {} ({} orphans)",
            summary.roots, summary.orphans
        )?;
        writeln!(self.writer, "  Deepest chain: {}", summary.max_depth)?;

        let count = summary.reports.to_string();
        let count = if summary.reports == 0 {
            count.green()
        } else {
            count.red()
        };
        writeln!(self.writer, "  Discrepancies: {}", count)?;
        Ok(())
    }
}

/// Two-column table of positional parameter names, one row per pair.
pub fn parameter_table(report: &DiscrepancyReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![report.ancestor_id(), report.descendant_id()]);
    for pair in &report.parameter_pairs {
        let (ancestor, descendant) = pair_cells(pair);
        table.add_row(vec![ancestor, descendant]);
    }
    table
}

fn pair_cells(pair: &ParameterPair) -> (&str, &str) {
    (
        pair.ancestor.as_deref().unwrap_or(ABSENT_PARAMETER),
        pair.descendant.as_deref().unwrap_or(ABSENT_PARAMETER),
    )
}

pub fn create_writer<'a>(format: OutputFormat, writer: Box<dyn Write + 'a>) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}
