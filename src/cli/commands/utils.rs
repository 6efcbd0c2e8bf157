//! Shared utilities for CLI commands

use std::path::{Path, PathBuf};

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::{resolve_ranges_with, Config, Dataset, RangeMap};

/// Everything a command needs: config, dataset and resolved ranges
pub struct Session {
    pub config: Config,
    pub data_path: PathBuf,
    pub dataset: Dataset,
    pub ranges: RangeMap,
}

impl Session {
    /// Load config and dataset, then resolve ranges once
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let config = Config::resolve(global.config.as_deref())?;
        let data_path = data_path(global, &config)?;

        let dataset = Dataset::from_path(&data_path, &config.metadata_columns())?;
        let ranges = resolve_ranges_with(&dataset, &config.fallback_table());

        Ok(Self {
            config,
            data_path,
            dataset,
            ranges,
        })
    }

    /// Dataset path for report headers
    pub fn dataset_label(&self) -> String {
        self.data_path.display().to_string()
    }
}

/// `--data`/`QID_DATA`, else the config's `data` key
///
/// A relative `data` path in a config file is taken relative to that file.
fn data_path(global: &GlobalOpts, config: &Config) -> Result<PathBuf> {
    if let Some(path) = &global.data {
        return Ok(path.clone());
    }

    let Some(path) = &config.data else {
        return Err(miette::miette!(
            code = "qid::no_dataset",
            help = "Pass --data <CSV>, set QID_DATA, or add `data:` to .qid.yaml",
            "No dataset given"
        ));
    };

    Ok(resolve_relative(path, config.source.as_deref()))
}

fn resolve_relative(path: &Path, config_file: Option<&Path>) -> PathBuf {
    match config_file.and_then(Path::parent) {
        Some(dir) if path.is_relative() && !dir.as_os_str().is_empty() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_to_config_dir() {
        let resolved = resolve_relative(
            Path::new("prod.csv"),
            Some(Path::new("/etc/qid/config.yaml")),
        );
        assert_eq!(resolved, PathBuf::from("/etc/qid/prod.csv"));
    }

    #[test]
    fn test_absolute_and_project_paths_unchanged() {
        assert_eq!(
            resolve_relative(Path::new("/data/prod.csv"), Some(Path::new("/etc/qid/config.yaml"))),
            PathBuf::from("/data/prod.csv")
        );
        // ./.qid.yaml has an empty parent
        assert_eq!(
            resolve_relative(Path::new("prod.csv"), Some(Path::new(".qid.yaml"))),
            PathBuf::from("prod.csv")
        );
        assert_eq!(
            resolve_relative(Path::new("prod.csv"), None),
            PathBuf::from("prod.csv")
        );
    }
}
