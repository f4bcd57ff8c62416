// Export modules for library usage
pub mod analysis;
pub mod analyzers;
pub mod builders;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod hierarchy;
pub mod io;
pub mod progress;

// Re-export commonly used types
pub use crate::core::{
    ClassDeclaration, MethodSignature, ParameterSignature, SourceLocation, TypeRef,
    CONSTRUCTOR_NAME,
};

pub use crate::hierarchy::{Forest, HierarchyBuilder, HierarchyStats, NodeId, TreeNode};

pub use crate::analysis::{
    analyze, compare, pair_parameters, DiscrepancyKind, DiscrepancyReport, HierarchyAnalyzer,
    ParameterPair,
};

pub use crate::analyzers::{extract_file, ClassExtractor, PhpExtractor};

pub use crate::builders::{run_scan, ScanInput, ScanOptions, ScanResults, ScanSummary};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
