//! Class record sources.
//!
//! An extractor turns one source file into the class declarations it
//! contains, in source order. Files are parsed independently and in
//! parallel, then reassembled in file order so the hierarchy builder sees a
//! deterministic encounter order.

pub mod php;

pub use php::PhpExtractor;

use crate::core::errors::{Error, Result, ResultExt};
use crate::core::ClassDeclaration;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Turns the raw bytes of one source file into class records.
///
/// Sources are not required to be UTF-8; legacy encodings in comments or
/// string literals must not cost a file its classes.
pub trait ClassExtractor: Send + Sync {
    fn extract(&self, source: &[u8], path: &Path) -> Result<Vec<ClassDeclaration>>;
}

/// Cheap pre-filter: a file that never mentions `class` cannot declare one.
pub fn may_declare_class(source: &[u8]) -> bool {
    source
        .windows(b"class".len())
        .any(|window| window.eq_ignore_ascii_case(b"class"))
}

/// Read and extract a single file. Files without the `class` keyword yield
/// no records without being parsed.
pub fn extract_file(path: &Path, extractor: &dyn ClassExtractor) -> Result<Vec<ClassDeclaration>> {
    let source = std::fs::read(path)
        .map_err(|e| Error::file_system("Failed to read source file", path, e))?;
    if !may_declare_class(&source) {
        return Ok(Vec::new());
    }
    extractor.extract(&source, path)
}

/// Outcome of extracting a batch of files.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Class records in file order, then source order within each file.
    pub classes: Vec<ClassDeclaration>,
    /// Files that could not be read or parsed; their classes are absent.
    pub failures: Vec<(PathBuf, Error)>,
}

/// Extract every file, reporting progress on `progress`. Failed files are
/// logged and left out; they never stop the batch.
pub fn extract_all(
    files: &[PathBuf],
    extractor: &dyn ClassExtractor,
    parallel: bool,
    progress: &ProgressBar,
) -> Extraction {
    let results: Vec<Result<Vec<ClassDeclaration>>> = if parallel {
        files
            .par_iter()
            .progress_with(progress.clone())
            .map(|path| extract_file(path, extractor))
            .collect()
    } else {
        files
            .iter()
            .map(|path| {
                let result = extract_file(path, extractor);
                progress.inc(1);
                result
            })
            .collect()
    };

    let mut extraction = Extraction::default();
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(classes) => {
                debug!(file = %path.display(), classes = classes.len(), "Extracted classes");
                extraction.classes.extend(classes);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping file");
                extraction.failures.push((path.clone(), e));
            }
        }
    }
    extraction
}

/// Read class records from a JSON array instead of parsing sources.
pub fn load_declarations(path: &Path) -> Result<Vec<ClassDeclaration>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read class records", path, e))?;
    serde_json::from_str(&contents)
        .map_err(Error::from)
        .context(format!("Invalid class records in {}", path.display()))
}
