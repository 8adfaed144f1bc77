//! Feature catalogue command

use anyhow::Result;
use predictor_lib::{FeatureKind, FEATURE_CATALOGUE};
use tabled::Tabled;

use crate::output::{print_header, print_json, print_table, OutputFormat};

/// Row for the feature table
#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Flag")]
    flag: String,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Values")]
    values: String,
    #[tabled(rename = "Default")]
    default: String,
}

fn describe_values(kind: &FeatureKind) -> String {
    match kind {
        FeatureKind::Numeric => "number".to_string(),
        FeatureKind::Categorical { options, .. } => options
            .iter()
            .map(|opt| format!("{} = {}", opt.code, opt.label))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// List the 13 model inputs in order
pub fn list_features(format: OutputFormat, verbose: bool) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&FEATURE_CATALOGUE[..])?,
        OutputFormat::Table => {
            print_header("Model Features");
            let rows: Vec<FeatureRow> = FEATURE_CATALOGUE
                .iter()
                .enumerate()
                .map(|(index, spec)| FeatureRow {
                    index,
                    flag: format!("--{}", spec.name),
                    label: spec.label,
                    values: describe_values(&spec.kind),
                    default: match spec.kind {
                        FeatureKind::Numeric => "required".to_string(),
                        FeatureKind::Categorical { default, .. } => default.to_string(),
                    },
                })
                .collect();
            print_table(&rows);

            if verbose {
                println!();
                for spec in FEATURE_CATALOGUE.iter() {
                    println!("  {:<10} {}", spec.name, spec.description);
                }
            }
        }
    }

    Ok(())
}
