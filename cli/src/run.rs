// Export-then-save flow

use crate::args::Args;
use anyhow::Context;
use chrono::Utc;
use floorplan_export_api_client::ExportClient;
use floorplan_export_core::{ApiKey, ExportConfig, ExportResult, ModelId};
use floorplan_export_downloader::{FileDownloader, FileSystemBackend};
use std::path::PathBuf;
use std::time::Duration;

/// Export the model and save the response, returning where it was written
pub async fn run(args: Args) -> anyhow::Result<PathBuf> {
    let model_id = ModelId::new(args.model_id.as_str())?;
    let api_key = ApiKey::new(args.api_key.as_str());
    let config = args.load_config()?;

    let client = ExportClient::new(args.base_url.as_str())?;
    tracing::info!(model_id = %model_id, base_url = %client.base_url(), "Exporting floor plan");

    let result = export_with_timeout(&client, &model_id, &api_key, &config, args.timeout_secs)
        .await
        .with_context(|| format!("エクスポートに失敗しました: {}", model_id))?;

    let backend = match &args.out_dir {
        Some(dir) => FileSystemBackend::new(dir),
        None => FileSystemBackend::from_env(),
    };
    let filename = args.output_filename(Utc::now());
    let path = backend.path_for(&filename);

    FileDownloader::new(&backend)
        .download_json(&filename, &result)
        .with_context(|| format!("保存に失敗しました: {}", path.display()))?;

    Ok(path)
}

async fn export_with_timeout(
    client: &ExportClient,
    model_id: &ModelId,
    api_key: &ApiKey,
    config: &ExportConfig,
    timeout_secs: Option<u64>,
) -> anyhow::Result<ExportResult> {
    let export = client.export_floor_plan(model_id, api_key, config);

    let result = match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), export)
            .await
            .with_context(|| format!("タイムアウト: {}秒以内に応答がありません", secs))??,
        None => export.await?,
    };

    Ok(result)
}
