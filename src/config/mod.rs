//! `.sigmap.toml` configuration.
//!
//! Discovery walks up from the working directory and falls back to defaults
//! with a warning when a file is unreadable or invalid. An explicit
//! `--config` path must load cleanly.

mod core;
mod loader;

pub use core::{
    default_extensions, AnalysisSettings, OutputConfig, ScanConfig, SigmapConfig,
};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

/// Default configuration written by `sigmap init`
pub const DEFAULT_CONFIG: &str = r#"# Sigmap Configuration

[scan]
extensions = ["php"]
ignore = [
    "vendor/**",
    "node_modules/**",
]

[output]
default_format = "terminal"

[analysis]
# Kinds left out of the report, e.g. ["default_value_dropped"]
ignore_kinds = []
fail_on_discrepancy = false
parallel = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DiscrepancyKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.scan.extensions, vec!["php"]);
        assert_eq!(config.scan.ignore.len(), 2);
        assert_eq!(config.output.default_format.as_deref(), Some("terminal"));
        assert!(config.analysis.parallel);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config, SigmapConfig::default());
    }

    #[test]
    fn test_ignore_kinds_parse_snake_case() {
        let config = parse_and_validate_config(
            r#"
            [analysis]
            ignore_kinds = ["default_value_dropped", "return_type_mismatch"]
            fail_on_discrepancy = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config.analysis.ignore_kinds,
            vec![
                DiscrepancyKind::DefaultValueDropped,
                DiscrepancyKind::ReturnTypeMismatch
            ]
        );
        assert!(config.analysis.fail_on_discrepancy);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = parse_and_validate_config("[output]\ndefault_format = \"html\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_extensions_normalized() {
        let config = parse_and_validate_config("[scan]\nextensions = [\".PHP\", \"inc\"]\n").unwrap();
        assert_eq!(config.scan.extensions, vec!["php", "inc"]);
    }

    #[test]
    fn test_discovery_finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[scan]\nignore = [\"legacy/**\"]\n",
        )
        .unwrap();
        let nested = dir.path().join("src").join("Http");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config_from(nested);
        assert_eq!(config.scan.ignore, vec!["legacy/**"]);
    }

    #[test]
    fn test_discovery_falls_back_on_invalid_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[scan\n").unwrap();

        let config = load_config_from(dir.path().to_path_buf());
        assert_eq!(config, SigmapConfig::default());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let ancestors: Vec<_> =
            directory_ancestors(std::path::PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(
            ancestors,
            vec![
                std::path::PathBuf::from("/a/b/c"),
                std::path::PathBuf::from("/a/b")
            ]
        );
    }
}
