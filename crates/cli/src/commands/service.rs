//! Service status and health commands

use anyhow::Result;
use chrono::{TimeZone, Utc};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{
    color_status, print_header, print_json, print_success, print_table, print_warning,
    OutputFormat,
};

/// Row for the component health table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Last Check")]
    last_check: String,
}

fn format_timestamp(seconds: i64) -> String {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Show whether the service is up
pub async fn show_status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let status = client.status().await?;

    match format {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Table => {
            print_success(&format!("{} ({})", status.message, client.base_url()));
        }
    }

    Ok(())
}

/// Show per-component health
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let (_, health) = client.health().await?;

    match format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Table => {
            let overall = serde_json::to_value(health.status)?
                .as_str()
                .unwrap_or_default()
                .to_string();

            print_header("Service Health");
            println!("Overall: {}", color_status(&overall));

            let rows: Vec<ComponentRow> = health
                .components
                .iter()
                .map(|(name, component)| {
                    let status = serde_json::to_value(component.status)
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_string))
                        .unwrap_or_default();
                    ComponentRow {
                        name: name.clone(),
                        status: color_status(&status),
                        message: component.message.clone().unwrap_or_else(|| "-".to_string()),
                        last_check: format_timestamp(component.last_check_timestamp),
                    }
                })
                .collect();
            print_table(&rows);

            if overall != "healthy" {
                print_warning("Predictions may be unavailable until the artifacts load");
            }
        }
    }

    Ok(())
}
