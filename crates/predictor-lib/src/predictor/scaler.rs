//! Standardization transform applied before logistic regression

use super::{check_finite, check_n_features, Transformer};
use crate::error::{InvalidParams, PredictionError, Result};
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Fitted scaler parameters as stored in `scaler.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub n_features_in: usize,
    /// Per-column mean, `None` when centering was disabled
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    /// Per-column scale, `None` when scaling was disabled
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

/// Computes `(x - mean) / scale` column by column
#[derive(Debug, Clone)]
pub struct StandardScaler {
    n_features_in: usize,
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn from_params(params: ScalerParams) -> std::result::Result<Self, InvalidParams> {
        let n = params.n_features_in;
        if n == 0 {
            return Err(InvalidParams("n_features_in must be positive".to_string()));
        }

        let mean = match params.mean {
            Some(mean) => {
                check_len("mean", &mean, n)?;
                check_finite("mean", &mean)?;
                Some(Array1::from(mean))
            }
            None => None,
        };

        let scale = match params.scale {
            Some(scale) => {
                check_len("scale", &scale, n)?;
                check_finite("scale", &scale)?;
                // Constant columns were fitted with zero variance
                let scale: Vec<f64> = scale
                    .into_iter()
                    .map(|s| if s == 0.0 { 1.0 } else { s })
                    .collect();
                Some(Array1::from(scale))
            }
            None => None,
        };

        Ok(Self {
            n_features_in: n,
            mean,
            scale,
        })
    }

    pub fn n_features_in(&self) -> usize {
        self.n_features_in
    }
}

fn check_len(what: &str, values: &[f64], expected: usize) -> std::result::Result<(), InvalidParams> {
    if values.len() != expected {
        return Err(InvalidParams(format!(
            "{} has {} entries, expected {}",
            what,
            values.len(),
            expected
        )));
    }
    Ok(())
}

impl Transformer for StandardScaler {
    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_n_features("StandardScaler", self.n_features_in, &x)?;

        let mut scaled = x.to_owned();
        if let Some(mean) = &self.mean {
            scaled -= mean;
        }
        if let Some(scale) = &self.scale {
            scaled /= scale;
        }

        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(PredictionError::inference(
                "Input contains NaN or infinity after scaling.",
            ));
        }
        Ok(scaled)
    }
}
