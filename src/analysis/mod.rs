//! Override compatibility analysis over an inheritance forest.

pub mod analyzer;
pub mod comparator;

pub use analyzer::{analyze, pair_parameters, DiscrepancyReport, HierarchyAnalyzer, ParameterPair};
pub use comparator::{compare, DiscrepancyKind};
