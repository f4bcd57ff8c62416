use crate::core::errors::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Source discovery honouring `.gitignore`, extension filters and glob
/// ignore patterns.
pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    ignore_patterns: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: vec!["php".to_string()],
            ignore_patterns: vec![],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.ignore_patterns = patterns
            .iter()
            .map(|pattern| glob::Pattern::new(pattern))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    /// Matching files, sorted so encounter order is reproducible.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext_str = ext.to_string_lossy().to_ascii_lowercase();
        if !self.extensions.iter().any(|wanted| *wanted == ext_str) {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        !self
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative) || pattern.matches_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<?php\n").unwrap();
    }

    #[test]
    fn test_walk_filters_extensions_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/b.php");
        touch(dir.path(), "src/a.php");
        touch(dir.path(), "README.md");
        touch(dir.path(), "src/Upper.PHP");

        let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Upper.PHP", "a.php", "b.php"]);
    }

    #[test]
    fn test_walk_applies_ignore_patterns() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/Model.php");
        touch(dir.path(), "vendor/lib/Thing.php");

        let files = FileWalker::new(dir.path().to_path_buf())
            .with_ignore_patterns(&["vendor/**".to_string()])
            .unwrap()
            .walk()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/Model.php"));
    }

    #[test]
    fn test_invalid_ignore_pattern_is_error() {
        let result = FileWalker::new(PathBuf::from(".")).with_ignore_patterns(&["[".to_string()]);
        assert!(result.is_err());
    }
}
