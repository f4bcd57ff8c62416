use crate::analysis::{DiscrepancyKind, DiscrepancyReport, HierarchyAnalyzer};
use crate::analyzers::{self, ClassExtractor};
use crate::core::errors::Result;
use crate::core::ClassDeclaration;
use crate::hierarchy::{Forest, HierarchyBuilder};
use crate::io::walker::FileWalker;
use crate::progress::{ProgressManager, ScanPhase};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

/// What to scan.
#[derive(Debug, Clone)]
pub enum ScanInput {
    /// A directory (or single file) of PHP sources
    Sources(PathBuf),
    /// A JSON array of already-extracted class records
    ClassRecords(PathBuf),
}

impl ScanInput {
    pub fn path(&self) -> &Path {
        match self {
            Self::Sources(path) | Self::ClassRecords(path) => path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub ignore_kinds: Vec<DiscrepancyKind>,
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: crate::config::default_extensions(),
            ignore_patterns: Vec::new(),
            ignore_kinds: Vec::new(),
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files: usize,
    pub failed_files: usize,
    pub classes: usize,
    pub roots: usize,
    pub orphans: usize,
    pub max_depth: usize,
    pub reports: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResults {
    pub project_path: PathBuf,
    pub summary: ScanSummary,
    pub reports: Vec<DiscrepancyReport>,
    pub failures: Vec<FailedFile>,
}

impl ScanResults {
    pub fn has_discrepancies(&self) -> bool {
        !self.reports.is_empty()
    }
}

/// Build the forest from records in encounter order, then check it.
pub fn analyze_declarations(
    declarations: Vec<ClassDeclaration>,
    parallel: bool,
    progress: &ProgressManager,
) -> (Forest, Vec<DiscrepancyReport>) {
    let forest = {
        let _span = info_span!("build_hierarchy", classes = declarations.len()).entered();
        let spinner = progress.phase_spinner(ScanPhase::Build);
        let forest = HierarchyBuilder::build(declarations);
        spinner.finish_and_clear();
        let stats = forest.stats();
        info!(
            classes = stats.classes,
            roots = stats.roots,
            orphans = stats.orphans,
            max_depth = stats.max_depth,
            "Hierarchy built"
        );
        forest
    };

    let reports = {
        let _span = info_span!("analyze_signatures", parallel = parallel).entered();
        let spinner = progress.phase_spinner(ScanPhase::Analyze);
        let analyzer = HierarchyAnalyzer::new(&forest);
        let reports = if parallel {
            analyzer.analyze_parallel()
        } else {
            analyzer.analyze()
        };
        spinner.finish_and_clear();
        info!(reports = reports.len(), "Signature analysis complete");
        reports
    };

    (forest, reports)
}

/// Run a full scan.
pub fn run_scan(
    input: &ScanInput,
    options: &ScanOptions,
    extractor: &dyn ClassExtractor,
    progress: &ProgressManager,
) -> Result<ScanResults> {
    let span = info_span!("scan", path = %input.path().display());
    let _guard = span.enter();

    let mut summary = ScanSummary::default();
    let mut failures = Vec::new();

    let declarations = match input {
        ScanInput::ClassRecords(path) => analyzers::load_declarations(path)?,
        ScanInput::Sources(root) => {
            let files = {
                let _span = info_span!("discover_files").entered();
                let files = FileWalker::new(root.clone())
                    .with_extensions(options.extensions.clone())
                    .with_ignore_patterns(&options.ignore_patterns)?
                    .walk()?;
                info!(files = files.len(), "Discovered source files");
                files
            };

            let _span = info_span!("extract_classes").entered();
            let bar = progress.file_bar(files.len() as u64);
            let extraction = analyzers::extract_all(&files, extractor, options.parallel, &bar);
            bar.finish_and_clear();

            summary.files = files.len();
            summary.failed_files = extraction.failures.len();
            failures = extraction
                .failures
                .into_iter()
                .map(|(path, e)| FailedFile {
                    path,
                    message: e.to_string(),
                })
                .collect();
            extraction.classes
        }
    };

    let (forest, reports) = analyze_declarations(declarations, options.parallel, progress);
    let stats = forest.stats();

    let total = reports.len();
    let reports: Vec<DiscrepancyReport> = reports
        .into_iter()
        .filter(|report| !options.ignore_kinds.contains(&report.kind))
        .collect();
    if reports.len() != total {
        debug!(
            filtered = total - reports.len(),
            "Dropped reports of ignored kinds"
        );
    }

    summary.classes = stats.classes;
    summary.roots = stats.roots;
    summary.orphans = stats.orphans;
    summary.max_depth = stats.max_depth;
    summary.reports = reports.len();

    Ok(ScanResults {
        project_path: input.path().to_path_buf(),
        summary,
        reports,
        failures,
    })
}
