//! End-to-end scan pipeline: discovery, extraction, hierarchy, analysis.

pub mod scan_analysis;

pub use scan_analysis::{
    analyze_declarations, run_scan, FailedFile, ScanInput, ScanOptions, ScanResults, ScanSummary,
};
