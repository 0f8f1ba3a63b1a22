// Command-line arguments

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use floorplan_export_core::{ExportConfig, DEFAULT_API_BASE_URL};
use std::path::PathBuf;

/// Export a floor plan and save the result as a JSON file
#[derive(Debug, Parser)]
#[command(name = "floorplan-export", version)]
pub struct Args {
    /// Floor-plan model identifier
    #[arg(long)]
    pub model_id: String,

    /// API key for the export service
    #[arg(long, env = "CUBICASA_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Path to a JSON file with export options
    #[arg(long, conflicts_with = "config_json")]
    pub config: Option<PathBuf>,

    /// Export options as an inline JSON string
    #[arg(long)]
    pub config_json: Option<String>,

    /// Output file name (default: floorplan-<model>-<timestamp>.json)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory to save into
    #[arg(long, env = "FLOORPLAN_DOWNLOAD_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Export service origin
    #[arg(long, env = "CUBICASA_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub base_url: String,

    /// Give up on the export request after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Args {
    /// Export options from `--config` or `--config-json`, or `{}` when neither is given
    pub fn load_config(&self) -> anyhow::Result<ExportConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("設定ファイルを読み込めません: {}", path.display()))?;
            let value = serde_json::from_str(&text)
                .with_context(|| format!("設定ファイルのJSONが不正です: {}", path.display()))?;
            return Ok(ExportConfig::new(value));
        }

        if let Some(json) = &self.config_json {
            let value = serde_json::from_str(json).context("--config-json のJSONが不正です")?;
            return Ok(ExportConfig::new(value));
        }

        Ok(ExportConfig::default())
    }

    pub fn output_filename(&self, now: DateTime<Utc>) -> String {
        match &self.output {
            Some(name) => name.clone(),
            None => format!(
                "floorplan-{}-{}.json",
                self.model_id,
                now.format("%Y%m%d-%H%M%S")
            ),
        }
    }
}
