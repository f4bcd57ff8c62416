//! Progress feedback for scans.
//!
//! A scan reports on stderr in two stages: a bar while source files are
//! parsed, then a spinner per in-memory phase. Nothing is drawn unless
//! stderr is a terminal, and `--quiet` or `SIGMAP_QUIET` turns it off.
//!
//! ```rust,no_run
//! use sigmap::progress::{ProgressConfig, ProgressManager, ScanPhase};
//!
//! let manager = ProgressManager::new(ProgressConfig::from_env(false));
//! let bar = manager.file_bar(42);
//! bar.inc(42);
//! bar.finish_and_clear();
//!
//! let spinner = manager.phase_spinner(ScanPhase::Analyze);
//! spinner.finish_and_clear();
//! ```

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fmt;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

pub const TEMPLATE_FILE_PARSING: &str = "{msg} [{bar:30}] {pos}/{len} files ({eta})";
pub const TEMPLATE_SPINNER: &str = "{spinner} {msg} ({elapsed})";

/// Environment variable that silences progress output when set.
pub const QUIET_ENV: &str = "SIGMAP_QUIET";

/// The in-memory stages of a scan that get a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Parse,
    Build,
    Analyze,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Parse => "Parsing files",
            Self::Build => "Building class hierarchy",
            Self::Analyze => "Checking overrides",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressConfig {
    pub quiet: bool,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool) -> Self {
        Self {
            quiet: quiet || std::env::var_os(QUIET_ENV).is_some(),
        }
    }

    pub fn enabled(&self) -> bool {
        !self.quiet && std::io::stderr().is_terminal()
    }
}

/// Hands out bars that share one stderr region.
#[derive(Clone)]
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    config: ProgressConfig,
}

impl ProgressManager {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            multi: Arc::new(MultiProgress::new()),
            config,
        }
    }

    /// A manager whose bars are never drawn.
    pub fn hidden() -> Self {
        Self::new(ProgressConfig { quiet: true })
    }

    /// Bar counting parsed files.
    pub fn file_bar(&self, files: u64) -> ProgressBar {
        if !self.config.enabled() {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template(TEMPLATE_FILE_PARSING)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bar = self.multi.add(ProgressBar::new(files).with_style(style));
        bar.set_message(ScanPhase::Parse.to_string());
        bar
    }

    /// Ticking spinner labelled with `phase`.
    pub fn phase_spinner(&self, phase: ScanPhase) -> ProgressBar {
        if !self.config.enabled() {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template(TEMPLATE_SPINNER)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = self.multi.add(ProgressBar::new_spinner().with_style(style));
        spinner.set_message(phase.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Remove anything still drawn before the report is printed.
    pub fn clear(&self) -> std::io::Result<()> {
        self.multi.clear()
    }
}
