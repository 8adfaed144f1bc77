//! Prediction command

use anyhow::{bail, Context, Result};
use clap::Args;
use predictor_lib::{FeatureVector, PredictRequest, FEATURE_CATALOGUE, NUM_FEATURES};
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{
    color_verdict, format_value, print_header, print_json, print_table, print_warning, verdict,
    OutputFormat,
};

/// Patient measurements, one flag per feature or all at once with `--features`
#[derive(Args, Debug, Default)]
pub struct PredictArgs {
    /// Age in years
    #[arg(long)]
    pub age: Option<f64>,
    /// Sex (1 = male, 0 = female)
    #[arg(long)]
    pub sex: Option<f64>,
    /// Chest pain type (0-3)
    #[arg(long)]
    pub cp: Option<f64>,
    /// Resting blood pressure in mm Hg
    #[arg(long)]
    pub trestbps: Option<f64>,
    /// Serum cholesterol in mg/dl
    #[arg(long)]
    pub chol: Option<f64>,
    /// Fasting blood sugar > 120 mg/dl (1 = true)
    #[arg(long)]
    pub fbs: Option<f64>,
    /// Resting ECG results (0-2)
    #[arg(long)]
    pub restecg: Option<f64>,
    /// Maximum heart rate achieved
    #[arg(long)]
    pub thalach: Option<f64>,
    /// Exercise induced angina (1 = yes)
    #[arg(long)]
    pub exang: Option<f64>,
    /// ST depression induced by exercise
    #[arg(long, allow_negative_numbers = true)]
    pub oldpeak: Option<f64>,
    /// Slope of the peak exercise ST segment (0-2)
    #[arg(long)]
    pub slope: Option<f64>,
    /// Number of major vessels colored by fluoroscopy (0-3)
    #[arg(long)]
    pub ca: Option<f64>,
    /// Thalassemia (1 = normal, 2 = fixed defect, 3 = reversable defect)
    #[arg(long)]
    pub thal: Option<f64>,

    /// All 13 values in catalogue order, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        conflicts_with_all = [
            "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg",
            "thalach", "exang", "oldpeak", "slope", "ca", "thal",
        ]
    )]
    pub features: Option<Vec<f64>>,
}

impl PredictArgs {
    fn flags(&self) -> [Option<f64>; NUM_FEATURES] {
        [
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }

    /// Build the feature vector, filling categorical defaults for omitted flags
    pub fn feature_vector(&self) -> Result<FeatureVector> {
        if let Some(values) = &self.features {
            return FeatureVector::try_from(values.as_slice())
                .context("Invalid --features list");
        }

        let mut values = [0.0; NUM_FEATURES];
        let mut missing = Vec::new();
        let slots = values.iter_mut().zip(self.flags());
        for ((slot, flag), spec) in slots.zip(FEATURE_CATALOGUE.iter()) {
            match flag.or_else(|| spec.default_value()) {
                Some(value) => *slot = value,
                None => missing.push(format!("--{} ({})", spec.name, spec.label)),
            }
        }

        if !missing.is_empty() {
            bail!("Missing required features: {}", missing.join(", "));
        }
        Ok(FeatureVector::new(values))
    }
}

/// Categorical values outside the catalogue's known codes
fn unknown_codes(features: &FeatureVector) -> Vec<String> {
    FEATURE_CATALOGUE
        .iter()
        .zip(features.as_slice())
        .filter(|(spec, value)| {
            spec.default_value().is_some()
                && (value.fract() != 0.0 || spec.option_label(**value as i64).is_none())
        })
        .map(|(spec, value)| format!("{}={}", spec.name, format_value(*value)))
        .collect()
}

/// Row for the input summary table
#[derive(Tabled)]
struct InputRow {
    #[tabled(rename = "Feature")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Meaning")]
    meaning: String,
}

/// Row for the prediction table
#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Model")]
    model: &'static str,
    #[tabled(rename = "Label")]
    label: i64,
    #[tabled(rename = "Verdict")]
    verdict: String,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    features: &'a FeatureVector,
    logistic_regression: i64,
    decision_tree: i64,
    logistic_regression_verdict: &'static str,
    decision_tree_verdict: &'static str,
}

/// Request a prediction and render both verdicts
pub async fn run_predict(
    client: &ApiClient,
    args: &PredictArgs,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let features = args.feature_vector()?;

    let unknown = unknown_codes(&features);
    if !unknown.is_empty() && format == OutputFormat::Table {
        print_warning(&format!(
            "Values outside the known codes: {}",
            unknown.join(", ")
        ));
    }

    let result = client.predict(&PredictRequest { features }).await?;

    match format {
        OutputFormat::Json => print_json(&JsonOutput {
            features: &features,
            logistic_regression: result.logistic_regression,
            decision_tree: result.decision_tree,
            logistic_regression_verdict: verdict(result.logistic_regression),
            decision_tree_verdict: verdict(result.decision_tree),
        })?,
        OutputFormat::Table => {
            if verbose {
                print_header("Patient Data");
                let rows: Vec<InputRow> = FEATURE_CATALOGUE
                    .iter()
                    .zip(features.as_slice())
                    .map(|(spec, value)| InputRow {
                        label: spec.label.to_string(),
                        value: format_value(*value),
                        meaning: spec
                            .option_label(*value as i64)
                            .unwrap_or_default()
                            .to_string(),
                    })
                    .collect();
                print_table(&rows);
            }

            print_header("Prediction Results");
            print_table(&[
                PredictionRow {
                    model: "Logistic Regression",
                    label: result.logistic_regression,
                    verdict: color_verdict(result.logistic_regression),
                },
                PredictionRow {
                    model: "Decision Tree",
                    label: result.decision_tree,
                    verdict: color_verdict(result.decision_tree),
                },
            ]);
        }
    }

    Ok(())
}
