//! File-level run description used by the command-line entry point.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::schema::{SearchConfig, SearchContext};

use super::loader::{LoadError, load_context, read};

/// Column masking applied to the baseline report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneConfig {
    /// Values strictly below this are counted per column.
    pub threshold: f32,
    /// Number of columns to mask, lowest count first.
    pub columns: usize,
}

/// Input and output locations plus the search settings.
///
/// Relative paths are resolved against the directory holding the run file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub train_features: PathBuf,
    pub train_labels: PathBuf,
    pub test_features: PathBuf,
    pub test_labels: PathBuf,
    /// Where to write the JSON result.
    #[serde(default)]
    pub result_output: Option<PathBuf>,
    /// Where to write the best mask's test predictions.
    #[serde(default)]
    pub predictions_output: Option<PathBuf>,
    #[serde(default)]
    pub prune: Option<PruneConfig>,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            train_features: PathBuf::from("train_data.txt"),
            train_labels: PathBuf::from("train_label.txt"),
            test_features: PathBuf::from("test_data.txt"),
            test_labels: PathBuf::from("test_label.txt"),
            result_output: Some(PathBuf::from("result.json")),
            predictions_output: Some(PathBuf::from("predictions.txt")),
            prune: None,
            search: SearchConfig::default(),
        }
    }
}

impl RunConfig {
    /// Read a run file and resolve its paths.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let mut config: RunConfig =
            serde_json::from_str(&read(path)?).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Make every relative path relative to `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.train_features);
        resolve(&mut self.train_labels);
        resolve(&mut self.test_features);
        resolve(&mut self.test_labels);
        if let Some(p) = self.result_output.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.predictions_output.as_mut() {
            resolve(p);
        }
    }

    /// Load the train/test data named by this run.
    pub fn load_context(&self) -> Result<SearchContext, LoadError> {
        load_context(
            &self.train_features,
            &self.train_labels,
            &self.test_features,
            &self.test_labels,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_resolves_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{
                "train_features": "train_data.txt",
                "train_labels": "train_label.txt",
                "test_features": "/abs/test_data.txt",
                "test_labels": "test_label.txt",
                "search": { "population_size": 6, "random_seed": 3 }
            }"#,
        )
        .unwrap();

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.train_features, dir.path().join("train_data.txt"));
        assert_eq!(config.test_features, PathBuf::from("/abs/test_data.txt"));
        assert_eq!(config.search.population_size, 6);
        assert_eq!(config.search.random_seed, Some(3));
        assert!(config.result_output.is_none());
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            RunConfig::load(&path),
            Err(LoadError::Json { .. })
        ));
    }

    #[test]
    fn test_default_serializes() {
        let json = serde_json::to_string(&RunConfig::default()).unwrap();
        let parsed: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.train_features, PathBuf::from("train_data.txt"));
    }
}
