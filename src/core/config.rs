//! Configuration management
//!
//! Lookup order: an explicit `--config` file, `./.qid.yaml`, then
//! `<config_dir>/qid/config.yaml`. Missing files fall through to defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::core::aggregate::{AggregateOptions, DEFAULT_OBSERVED_MARGIN};
use crate::core::compare::ComparisonSelector;
use crate::core::ranges::{FallbackTable, ParameterRange};
use crate::schema::columns;
use crate::yaml::{parse_yaml_file, YamlError};

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = ".qid.yaml";

const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Column names that vary between exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Canonical grade column
    pub grade: String,
    /// Machine column
    pub machine: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            grade: columns::GRADE.to_string(),
            machine: columns::MACHINE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Widening of observed ranges as a fraction of the observed span
    pub observed_margin: f64,
    /// Default number of histogram bins in `compare`
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            observed_margin: DEFAULT_OBSERVED_MARGIN,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default dataset path
    pub data: Option<PathBuf>,

    pub columns: ColumnConfig,

    /// Extra fallback ranges, overriding built-in defaults by name
    pub fallback_ranges: BTreeMap<String, ParameterRange>,

    pub analysis: AnalysisConfig,

    /// File the configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load from the project file or the user config directory
    ///
    /// Unreadable or malformed files are logged and skipped.
    pub fn load() -> Self {
        let candidates = [Some(PathBuf::from(PROJECT_CONFIG_FILE)), user_config_path()];
        for path in candidates.into_iter().flatten() {
            if !path.is_file() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                }
            }
        }
        Self::default()
    }

    /// Load a specific config file
    pub fn load_from(path: &Path) -> Result<Self, YamlError> {
        let mut config: Config = parse_yaml_file(path)?;
        config.source = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load an explicit file if given, otherwise fall back to [`Config::load`]
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, YamlError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }

    /// Built-in fallback ranges extended with configured entries
    pub fn fallback_table(&self) -> FallbackTable {
        FallbackTable::builtin_with(&self.fallback_ranges)
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            observed_margin: self.analysis.observed_margin.max(0.0),
        }
    }

    /// Comparison selector for the configured grade and machine columns
    pub fn selector(&self) -> ComparisonSelector {
        ComparisonSelector::new(&self.columns.grade, &self.columns.machine)
    }

    pub fn histogram_bins(&self) -> usize {
        self.analysis.histogram_bins.max(1)
    }

    /// Configured columns that are metadata rather than measurements
    pub fn metadata_columns(&self) -> Vec<&str> {
        vec![self.columns.grade.as_str(), self.columns.machine.as_str()]
    }
}

/// `<config_dir>/qid/config.yaml` for the current user
pub fn user_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("qid").join("config.yaml"))
}
