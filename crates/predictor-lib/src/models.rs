//! Core data models for the prediction service

use crate::error::PredictionError;
use serde::{Deserialize, Serialize};

/// Number of clinical features expected by both classifiers
pub const NUM_FEATURES: usize = 13;

/// Clinical features for one patient, in model input order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; NUM_FEATURES]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    /// Value of a feature by catalogue name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_CATALOGUE
            .iter()
            .position(|spec| spec.name == name)
            .map(|idx| self.0[idx])
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = PredictionError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let actual = values.len();
        let array: [f64; NUM_FEATURES] =
            values
                .try_into()
                .map_err(|_| PredictionError::InvalidInputShape {
                    expected: NUM_FEATURES,
                    actual,
                })?;
        Ok(Self(array))
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = PredictionError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::try_from(values.to_vec())
    }
}

/// Body of `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: FeatureVector,
}

/// Labels produced by both classifiers for one feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub logistic_regression: i64,
    pub decision_tree: i64,
}

/// A selectable code for a categorical feature
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureOption {
    pub code: i64,
    pub label: &'static str,
}

/// How a feature is entered
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric,
    Categorical {
        options: &'static [FeatureOption],
        default: i64,
    },
}

/// Catalogue entry describing one input position
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    #[serde(flatten)]
    pub kind: FeatureKind,
}

impl FeatureSpec {
    pub fn default_value(&self) -> Option<f64> {
        match self.kind {
            FeatureKind::Numeric => None,
            FeatureKind::Categorical { default, .. } => Some(default as f64),
        }
    }

    pub fn option_label(&self, code: i64) -> Option<&'static str> {
        match self.kind {
            FeatureKind::Numeric => None,
            FeatureKind::Categorical { options, .. } => options
                .iter()
                .find(|opt| opt.code == code)
                .map(|opt| opt.label),
        }
    }
}

const fn opt(code: i64, label: &'static str) -> FeatureOption {
    FeatureOption { code, label }
}

/// The 13 features in the order the models were trained on
pub const FEATURE_CATALOGUE: [FeatureSpec; NUM_FEATURES] = [
    FeatureSpec {
        name: "age",
        label: "Age",
        description: "Age of the patient in years.",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "sex",
        label: "Sex",
        description: "Biological sex of the patient.",
        kind: FeatureKind::Categorical {
            options: &[opt(1, "Male"), opt(0, "Female")],
            default: 1,
        },
    },
    FeatureSpec {
        name: "cp",
        label: "Chest Pain Type",
        description: "The type of chest pain reported by the patient.",
        kind: FeatureKind::Categorical {
            options: &[
                opt(0, "Typical Angina"),
                opt(1, "Atypical Angina"),
                opt(2, "Non-anginal Pain"),
                opt(3, "Asymptomatic"),
            ],
            default: 0,
        },
    },
    FeatureSpec {
        name: "trestbps",
        label: "Resting Blood Pressure",
        description: "Resting blood pressure in mm Hg on admission to the hospital.",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "chol",
        label: "Cholesterol",
        description: "Serum cholesterol level in mg/dl.",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "fbs",
        label: "Fasting Blood Sugar",
        description: "Whether fasting blood sugar is greater than 120 mg/dl.",
        kind: FeatureKind::Categorical {
            options: &[opt(0, "< 120 mg/dl"), opt(1, "> 120 mg/dl")],
            default: 0,
        },
    },
    FeatureSpec {
        name: "restecg",
        label: "Resting ECG Results",
        description: "Resting electrocardiographic results.",
        kind: FeatureKind::Categorical {
            options: &[
                opt(0, "Normal"),
                opt(1, "ST-T Wave Abnormality"),
                opt(2, "Left Ventricular Hypertrophy"),
            ],
            default: 0,
        },
    },
    FeatureSpec {
        name: "thalach",
        label: "Max Heart Rate",
        description: "Maximum heart rate achieved during exercise.",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "exang",
        label: "Exercise Induced Angina",
        description: "Chest pain induced by exercise.",
        kind: FeatureKind::Categorical {
            options: &[opt(0, "No"), opt(1, "Yes")],
            default: 0,
        },
    },
    FeatureSpec {
        name: "oldpeak",
        label: "ST Depression",
        description: "ST depression induced by exercise relative to rest.",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "slope",
        label: "Peak Exercise ST Slope",
        description: "The slope of the peak exercise ST segment.",
        kind: FeatureKind::Categorical {
            options: &[opt(0, "Upsloping"), opt(1, "Flat"), opt(2, "Downsloping")],
            default: 0,
        },
    },
    FeatureSpec {
        name: "ca",
        label: "Major Vessels (0-3)",
        description: "Number of major vessels (0-3) colored by fluoroscopy.",
        kind: FeatureKind::Categorical {
            options: &[opt(0, "0"), opt(1, "1"), opt(2, "2"), opt(3, "3")],
            default: 0,
        },
    },
    FeatureSpec {
        name: "thal",
        label: "Thalassemia",
        description: "A blood disorder called thalassemia.",
        kind: FeatureKind::Categorical {
            options: &[
                opt(1, "Normal"),
                opt(2, "Fixed Defect"),
                opt(3, "Reversable Defect"),
            ],
            default: 1,
        },
    },
];
