use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::core::SigmapConfig;
use crate::core::errors::{Error, Result};

/// Name of the configuration file looked up from the working directory
pub const CONFIG_FILE_NAME: &str = ".sigmap.toml";

/// How many directories discovery inspects, starting with the current one
const MAX_TRAVERSAL_DEPTH: usize = 10;

const OUTPUT_FORMATS: [&str; 3] = ["terminal", "markdown", "json"];

/// Parse a TOML document and check the values serde cannot
pub fn parse_and_validate_config(contents: &str) -> Result<SigmapConfig> {
    let mut config: SigmapConfig = toml::from_str(contents)?;

    if let Some(format) = config.output.default_format.as_deref() {
        if !OUTPUT_FORMATS.contains(&format) {
            return Err(Error::Configuration(format!(
                "unknown output format '{}', expected one of {}",
                format,
                OUTPUT_FORMATS.join(", ")
            )));
        }
    }

    for pattern in &config.scan.ignore {
        glob::Pattern::new(pattern)?;
    }

    // Extensions are matched without the leading dot.
    config.scan.extensions = config
        .scan
        .extensions
        .iter()
        .map(|extension| extension.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    Ok(config)
}

/// `start` followed by its parents, at most `max_depth` directories in all
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    let dirs: Vec<PathBuf> = start
        .ancestors()
        .take(max_depth)
        .map(Path::to_path_buf)
        .collect();
    dirs.into_iter()
}

/// A config file found during discovery. Missing files are silent; unreadable
/// or invalid ones are logged and skipped.
fn discover_at(path: &Path) -> Option<SigmapConfig> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    parse_and_validate_config(&contents)
        .inspect(|_| log::debug!("Loaded config from {}", path.display()))
        .inspect_err(|e| {
            log::warn!("Ignoring invalid config file {}: {}", path.display(), e)
        })
        .ok()
}

/// Load `.sigmap.toml` from `start` or the closest ancestor that has one
pub fn load_config_from(start: PathBuf) -> SigmapConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .find_map(|dir| discover_at(&dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| {
            log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            SigmapConfig::default()
        })
}

/// Load config by searching upward from the current directory
pub fn load_config() -> SigmapConfig {
    std::env::current_dir()
        .map(load_config_from)
        .unwrap_or_else(|e| {
            log::warn!("Cannot determine current directory ({}), using defaults", e);
            SigmapConfig::default()
        })
}

/// Load an explicitly requested config file. Unlike discovery, any failure
/// here is an error.
pub fn load_config_file(path: &Path) -> Result<SigmapConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    parse_and_validate_config(&contents)
}
