//! Startup loader for the fitted model artifacts
//!
//! Reads the scaler and both classifiers from a model directory. When a
//! `manifest.json` sits next to them, every listed file's SHA-256 digest
//! is checked before the file is parsed. Loading is all-or-nothing: the
//! first failure aborts the whole load.

use crate::error::{ArtifactError, InvalidParams};
use crate::models::NUM_FEATURES;
use crate::predictor::{
    Classifier, DecisionTree, DecisionTreeParams, LoadedModels, LogisticRegression,
    LogisticRegressionParams, ScalerParams, StandardScaler,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const LOGISTIC_MODEL_FILE: &str = "logistic_model.json";
pub const DECISION_TREE_FILE: &str = "decision_tree_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Optional digest list shipped with the artifacts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// File name to lowercase hex SHA-256
    pub artifacts: BTreeMap<String, String>,
}

/// Loads the three artifacts from one directory
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    model_dir: PathBuf,
}

impl ArtifactLoader {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Load and validate all three artifacts
    pub fn load(&self) -> Result<LoadedModels, ArtifactError> {
        let manifest = self.read_manifest()?;
        if manifest.is_some() {
            debug!(dir = %self.model_dir.display(), "Verifying artifacts against manifest");
        }

        let (path, params) = self.read_artifact::<ScalerParams>(SCALER_FILE, manifest.as_ref())?;
        let scaler = StandardScaler::from_params(params).map_err(|e| invalid(&path, e))?;
        expect_features(&path, scaler.n_features_in())?;

        let (path, params) =
            self.read_artifact::<LogisticRegressionParams>(LOGISTIC_MODEL_FILE, manifest.as_ref())?;
        let logistic = LogisticRegression::from_params(params).map_err(|e| invalid(&path, e))?;
        expect_features(&path, logistic.n_features_in())?;

        let (path, params) =
            self.read_artifact::<DecisionTreeParams>(DECISION_TREE_FILE, manifest.as_ref())?;
        let tree = DecisionTree::from_params(params).map_err(|e| invalid(&path, e))?;
        expect_features(&path, tree.n_features_in())?;

        info!(
            dir = %self.model_dir.display(),
            tree_nodes = tree.node_count(),
            verified = manifest.is_some(),
            "Model artifacts loaded"
        );

        Ok(LoadedModels {
            logistic,
            tree,
            scaler,
        })
    }

    fn read_manifest(&self) -> Result<Option<Manifest>, ArtifactError> {
        let path = self.model_dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = read_bytes(&path)?;
        let manifest = serde_json::from_slice(&bytes)
            .map_err(|source| ArtifactError::Parse { path, source })?;
        Ok(Some(manifest))
    }

    fn read_artifact<T: DeserializeOwned>(
        &self,
        file_name: &str,
        manifest: Option<&Manifest>,
    ) -> Result<(PathBuf, T), ArtifactError> {
        let path = self.model_dir.join(file_name);
        let bytes = read_bytes(&path)?;

        if let Some(expected) = manifest.and_then(|m| m.artifacts.get(file_name)) {
            let actual = compute_checksum(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ArtifactError::ChecksumMismatch {
                    path,
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let value = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok((path, value))
    }
}

/// Compute SHA256 checksum of artifact bytes
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path, err: InvalidParams) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason: err.0,
    }
}

fn expect_features(path: &Path, actual: usize) -> Result<(), ArtifactError> {
    if actual != NUM_FEATURES {
        return Err(ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason: format!(
                "fitted on {} features, service expects {}",
                actual, NUM_FEATURES
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureVector;
    use crate::predictor::PredictionService;
    use tempfile::TempDir;

    fn scaler_params() -> ScalerParams {
        ScalerParams {
            n_features_in: NUM_FEATURES,
            mean: Some(vec![0.0; NUM_FEATURES]),
            scale: Some(vec![1.0; NUM_FEATURES]),
        }
    }

    fn logistic_params() -> LogisticRegressionParams {
        LogisticRegressionParams {
            n_features_in: NUM_FEATURES,
            classes: vec![0.0, 1.0],
            coef: vec![vec![0.1; NUM_FEATURES]],
            intercept: vec![-1.0],
        }
    }

    fn tree_params() -> DecisionTreeParams {
        DecisionTreeParams {
            n_features_in: NUM_FEATURES,
            classes: vec![0.0, 1.0],
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![vec![1.0, 4.0]],
        }
    }

    fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Vec<u8> {
        let bytes = serde_json::to_vec(value).unwrap();
        fs::write(dir.join(name), &bytes).unwrap();
        bytes
    }

    fn write_all(dir: &Path) -> Manifest {
        let mut manifest = Manifest::default();
        for (name, bytes) in [
            (SCALER_FILE, write_json(dir, SCALER_FILE, &scaler_params())),
            (
                LOGISTIC_MODEL_FILE,
                write_json(dir, LOGISTIC_MODEL_FILE, &logistic_params()),
            ),
            (
                DECISION_TREE_FILE,
                write_json(dir, DECISION_TREE_FILE, &tree_params()),
            ),
        ] {
            manifest
                .artifacts
                .insert(name.to_string(), compute_checksum(&bytes));
        }
        manifest
    }

    #[test]
    fn test_compute_checksum() {
        assert_eq!(
            compute_checksum(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_load_valid_directory() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path());

        let models = ArtifactLoader::new(dir.path()).load().unwrap();
        let service = PredictionService::new(models);
        let result = service
            .predict(&FeatureVector::new([1.0; NUM_FEATURES]))
            .unwrap();
        // 13 * 0.1 - 1.0 > 0
        assert_eq!(result.logistic_regression, 1);
        assert_eq!(result.decision_tree, 1);
    }

    #[test]
    fn test_load_with_matching_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = write_all(dir.path());
        write_json(dir.path(), MANIFEST_FILE, &manifest);

        assert!(ArtifactLoader::new(dir.path()).load().is_ok());
    }

    #[test]
    fn test_checksum_mismatch_fails_load() {
        let dir = TempDir::new().unwrap();
        let mut manifest = write_all(dir.path());
        manifest
            .artifacts
            .insert(SCALER_FILE.to_string(), "00".repeat(32));
        write_json(dir.path(), MANIFEST_FILE, &manifest);

        let err = ArtifactLoader::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, ArtifactError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_missing_file_fails_load() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path());
        fs::remove_file(dir.path().join(DECISION_TREE_FILE)).unwrap();

        let err = ArtifactLoader::new(dir.path()).load().unwrap_err();
        match err {
            ArtifactError::Io { path, .. } => assert!(path.ends_with(DECISION_TREE_FILE)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_corrupt_file_fails_load() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path());
        fs::write(dir.path().join(LOGISTIC_MODEL_FILE), b"\x80\x04pickle").unwrap();

        let err = ArtifactLoader::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }

    #[test]
    fn test_wrong_feature_count_fails_load() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path());
        let mut params = tree_params();
        params.n_features_in = 12;
        write_json(dir.path(), DECISION_TREE_FILE, &params);

        let err = ArtifactLoader::new(dir.path()).load().unwrap_err();
        match err {
            ArtifactError::Invalid { reason, .. } => {
                assert_eq!(reason, "fitted on 12 features, service expects 13")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_directory_fails_load() {
        let dir = TempDir::new().unwrap();
        let err = ArtifactLoader::new(dir.path().join("absent"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }
}
