//! Check-run configuration for citation validation pipelines.
//!
//! Defines the YAML-serializable configuration that controls which paths are
//! checked, the validation policy, and parallelism.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! paths:
//!   - repos/
//!   - CITATION.cff
//! exclude:
//!   - repos/archived
//! policy:
//!   strict: true
//!   warnings_as_errors: false
//! jobs: 4
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::manifest::ValidationPolicyFingerprint;

/// Validation policy settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Reject unknown fields.
    #[serde(default)]
    pub strict: bool,
    /// Treat warnings as failures.
    #[serde(default)]
    pub warnings_as_errors: bool,
}

impl PolicyConfig {
    /// Converts to the fingerprint form stored in manifests.
    pub fn fingerprint(&self) -> ValidationPolicyFingerprint {
        ValidationPolicyFingerprint {
            strict: self.strict,
            warnings_as_errors: self.warnings_as_errors,
        }
    }
}

fn default_jobs() -> usize {
    4
}

/// Top-level check-run configuration.
///
/// Loaded from a YAML file (typically `.cffkit.yml` in the repository root,
/// or the user-level config found by [`default_config_path`]).
///
/// # Examples
///
/// ```no_run
/// use cffkit_db::CheckConfig;
///
/// let config = CheckConfig::load(".cffkit.yml").unwrap();
/// for path in &config.paths {
///     println!("checking {}", path.display());
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Files and directories to check.
    pub paths: Vec<PathBuf>,
    /// Paths to explicitly skip (exact file or directory prefix).
    #[serde(default)]
    pub exclude: Vec<PathBuf>,
    /// Validation policy.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Number of parallel validation jobs.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl CheckConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DatabaseError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DatabaseError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if `path` matches an exclusion entry.
    ///
    /// An entry excludes the exact path and, for directories, everything
    /// below it.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude
            .iter()
            .any(|entry| path == entry || path.starts_with(entry))
    }
}

/// Finds the user-level configuration file, if one exists.
///
/// Sources are tried in order:
///
/// 1. `$XDG_CONFIG_HOME/cffkit/config.yml`
/// 2. `~/.config/cffkit/config.yml`
/// 3. `/etc/cffkit.yml`
pub fn default_config_path() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        candidates.push(PathBuf::from(xdg).join("cffkit").join("config.yml"));
    } else if let Ok(home) = std::env::var("HOME") {
        candidates.push(
            PathBuf::from(home)
                .join(".config")
                .join("cffkit")
                .join("config.yml"),
        );
    }
    candidates.push(PathBuf::from("/etc/cffkit.yml"));

    candidates.into_iter().find(|path| path.exists())
}
