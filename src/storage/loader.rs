//! Readers for feature tables and label files.
//!
//! Feature files hold one row per line, values separated by whitespace.
//! Label files hold whitespace-separated integers, one per row, each 0 or 1.
//! Blank lines are ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::compute::ComputeError;
use crate::schema::{Dataset, FeatureMatrix, Label, SearchContext};

/// Failures while loading input data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: cannot parse {token:?}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid data: {0}")]
    Data(#[from] ComputeError),
}

pub(crate) fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a feature table. `origin` is only used in error messages.
pub fn parse_features(text: &str, origin: &Path) -> Result<FeatureMatrix, LoadError> {
    let rows = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            line.split_whitespace()
                .map(|token| {
                    token
                        .parse::<f32>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| LoadError::Parse {
                            path: origin.to_path_buf(),
                            line: n + 1,
                            token: token.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureMatrix::from_rows(rows)?)
}

/// Parse a label file. `origin` is only used in error messages.
pub fn parse_labels(text: &str, origin: &Path) -> Result<Vec<Label>, LoadError> {
    let mut labels = Vec::new();
    for (n, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let value: i64 = token.parse().map_err(|_| LoadError::Parse {
                path: origin.to_path_buf(),
                line: n + 1,
                token: token.to_string(),
            })?;
            let label = Label::try_from(value)
                .ok()
                .filter(|l| *l <= 1)
                .ok_or(ComputeError::InvalidLabel {
                    row: labels.len(),
                    value,
                })?;
            labels.push(label);
        }
    }
    Ok(labels)
}

/// Load a feature table from disk.
pub fn load_features<P: AsRef<Path>>(path: P) -> Result<FeatureMatrix, LoadError> {
    let path = path.as_ref();
    parse_features(&read(path)?, path)
}

/// Load a label file from disk.
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Vec<Label>, LoadError> {
    let path = path.as_ref();
    parse_labels(&read(path)?, path)
}

/// Load features and their row-aligned labels.
pub fn load_dataset<P: AsRef<Path>, Q: AsRef<Path>>(
    features: P,
    labels: Q,
) -> Result<Dataset, LoadError> {
    Ok(Dataset::new(load_features(features)?, load_labels(labels)?)?)
}

/// Load the four input files into a search context.
pub fn load_context(
    train_features: &Path,
    train_labels: &Path,
    test_features: &Path,
    test_labels: &Path,
) -> Result<SearchContext, LoadError> {
    let train = load_dataset(train_features, train_labels)?;
    let test = load_dataset(test_features, test_labels)?;
    Ok(SearchContext::new(train, test)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_features() {
        let m = parse_features("1 2 3\n\n4.5  5 -6\n", Path::new("t")).unwrap();
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_cols(), 3);
        assert_eq!(m.row(1), &[4.5, 5.0, -6.0]);
    }

    #[test]
    fn test_parse_features_reports_line() {
        let err = parse_features("1 2\n3 x\n", Path::new("train.txt")).unwrap_err();
        match err {
            LoadError::Parse { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_features_rejects_non_finite() {
        for text in ["0 NaN\n10 1\n", "0 1\n10 inf\n"] {
            match parse_features(text, Path::new("train.txt")).unwrap_err() {
                LoadError::Parse { line, .. } => assert!(line == 1 || line == 2),
                other => panic!("unexpected error: {other}"),
            }
        }
        let err = parse_features("0 NaN\n", Path::new("train.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, ref token, .. } if token == "NaN"));
    }

    #[test]
    fn test_parse_features_ragged() {
        let err = parse_features("1 2\n3\n", Path::new("t")).unwrap_err();
        assert!(matches!(err, LoadError::Data(ComputeError::Shape { .. })));
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(
            parse_labels("0 1\n1\n0\n", Path::new("l")).unwrap(),
            vec![0, 1, 1, 0]
        );
        let err = parse_labels("0 3", Path::new("l")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Data(ComputeError::InvalidLabel { row: 1, value: 3 })
        ));
        let err = parse_labels("0 -1", Path::new("l")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Data(ComputeError::InvalidLabel { row: 1, value: -1 })
        ));
    }

    #[test]
    fn test_load_context_from_files() {
        let dir = tempdir().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            path
        };
        let train_x = write("train_data.txt", "0 0\n10 10\n");
        let train_y = write("train_label.txt", "0\n1\n");
        let test_x = write("test_data.txt", "1 1\n");
        let test_y = write("test_label.txt", "0\n");

        let ctx = load_context(&train_x, &train_y, &test_x, &test_y).unwrap();
        assert_eq!(ctx.feature_count(), 2);
        assert_eq!(ctx.train.len(), 2);
        assert_eq!(ctx.test.labels(), &[0]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_features(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
