use crate::analysis::DiscrepancyKind;
use serde::{Deserialize, Serialize};

/// Root configuration structure for sigmap
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SigmapConfig {
    /// Source discovery
    #[serde(default)]
    pub scan: ScanConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Analysis and report filtering
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// File extensions treated as PHP sources
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Glob patterns of paths to skip
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore: Vec::new(),
        }
    }
}

pub fn default_extensions() -> Vec<String> {
    vec!["php".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// `terminal`, `markdown` or `json`
    #[serde(default)]
    pub default_format: Option<String>,
    /// Enable colored output (default: auto-detect based on TTY)
    #[serde(default)]
    pub use_color: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSettings {
    /// Discrepancy kinds left out of the report
    #[serde(default)]
    pub ignore_kinds: Vec<DiscrepancyKind>,
    /// Exit with a failure status when any discrepancy is reported
    #[serde(default)]
    pub fail_on_discrepancy: bool,
    /// Parse files and check trees on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            ignore_kinds: Vec::new(),
            fail_on_discrepancy: false,
            parallel: default_parallel(),
        }
    }
}

fn default_parallel() -> bool {
    true
}
