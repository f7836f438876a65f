//! Configuration management.
//!
//! Provides the global verbose flag and on-disk default parameter
//! loading for the CLI front-end.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use serde::Deserialize;

use crate::models::RecolorParams;

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["recolor.yml", "recolor.yaml"];

/// Public handle that stores the loaded configuration, its source path, and warnings.
pub struct RecolorConfigHandle {
    pub config: RecolorConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Complete configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RecolorConfig {
    pub defaults: Option<RecolorParams>,
}

impl RecolorConfig {
    fn sanitize(mut self) -> Self {
        if let Some(ref mut defaults) = self.defaults {
            defaults.sanitize();
        }
        self
    }
}

/// Load configuration from disk, optionally forcing a specific path.
pub fn load_recolor_config(custom_path: Option<&Path>) -> RecolorConfigHandle {
    let mut warnings = Vec::new();

    for candidate in get_config_candidates(custom_path) {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<RecolorConfig>(&contents) {
                Ok(config) => {
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return RecolorConfigHandle {
                        config: config.sanitize(),
                        source: Some(source),
                        warnings,
                    };
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No config found; using built-in defaults.".to_string());
    RecolorConfigHandle {
        config: RecolorConfig::default(),
        source: None,
        warnings,
    }
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var("RECOLOR_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("recolor").join(name));
        }
    }

    candidates
}

static RECOLOR_CONFIG_HANDLE: OnceLock<RecolorConfigHandle> = OnceLock::new();
static PRINT_CONFIG_ONCE: Once = Once::new();

/// Access the global configuration (loaded once per process).
pub fn recolor_config_handle() -> &'static RecolorConfigHandle {
    RECOLOR_CONFIG_HANDLE.get_or_init(|| load_recolor_config(None))
}

/// Print config source and warnings the first time it is requested (only in verbose mode).
pub fn log_config_usage() {
    PRINT_CONFIG_ONCE.call_once(|| {
        if !is_verbose() {
            return;
        }
        let handle = recolor_config_handle();
        if let Some(source) = &handle.source {
            eprintln!("[recolor] Loaded config from {}", source.display());
        } else {
            eprintln!("[recolor] Using built-in defaults");
        }

        for warning in &handle.warnings {
            eprintln!("[recolor] Config warning: {}", warning);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_explicit_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "defaults:\n  target_color: \"#112233\"\n  vibrance: 10\n"
        )
        .unwrap();

        let handle = load_recolor_config(Some(file.path()));
        assert!(handle.source.is_some());
        let defaults = handle.config.defaults.unwrap();
        assert_eq!(defaults.target_color, "#112233");
        assert!((defaults.vibrance - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let handle = load_recolor_config(Some(Path::new("/nonexistent/recolor.yml")));
        assert!(handle.config.defaults.is_none());
        assert!(!handle.warnings.is_empty());
    }

    #[test]
    fn test_loaded_defaults_are_sanitized() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "defaults:\n  strength: 500\n  warm: -200\n").unwrap();

        let handle = load_recolor_config(Some(file.path()));
        let defaults = handle.config.defaults.unwrap();
        assert!((defaults.strength - 100.0).abs() < f32::EPSILON);
        assert!((defaults.warm - -50.0).abs() < f32::EPSILON);
    }
}
