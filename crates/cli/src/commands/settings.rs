//! Config file commands

use anyhow::Result;
use url::Url;

use crate::config::Config;
use crate::output::{print_info, print_json, print_success, OutputFormat};

/// Persist the API URL to the config file
pub fn set_url(url: &str) -> Result<()> {
    Url::parse(url)?;

    let mut config = Config::load()?;
    config.api_url = Some(url.to_string());
    let path = config.save()?;

    print_success(&format!("API URL set to {} in {}", url, path.display()));
    Ok(())
}

/// Show the config file and the URL that will be used
pub fn show(config: &Config, effective_url: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "config_path": Config::config_path()?.display().to_string(),
            "api_url": config.api_url,
            "default_format": config.default_format,
            "effective_api_url": effective_url,
        }))?,
        OutputFormat::Table => {
            print_info(&format!("Config file: {}", Config::config_path()?.display()));
            println!("  api_url:        {}", config.api_url.as_deref().unwrap_or("-"));
            println!(
                "  default_format: {}",
                config.default_format.as_deref().unwrap_or("-")
            );
            println!("  effective URL:  {}", effective_url);
        }
    }
    Ok(())
}
