use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::{ConeApi, CsvExport};
use crate::error::ApiError;
use cone_viewer_core::state::DownloadRequest;

/// Write `export` into `dir` under its own file name.
pub async fn save_export(export: &CsvExport, dir: &Path) -> Result<PathBuf, ApiError> {
    let path = dir.join(&export.file_name);
    tokio::fs::write(&path, &export.bytes).await?;
    info!(path = %path.display(), bytes = export.bytes.len(), "CSV export written");
    Ok(path)
}

/// Fetch the export for `request` and write it into `dir`.
pub async fn download_to(
    api: &dyn ConeApi,
    request: &DownloadRequest,
    dir: &Path,
) -> Result<PathBuf, ApiError> {
    let export = api.export_csv(&request.filters, &request.display_id).await?;
    save_export(&export, dir).await
}

/// Notice shown to the user after a download attempt.
pub fn download_notice(result: &Result<PathBuf, ApiError>) -> String {
    match result {
        Ok(path) => format!("Saved {}", path.display()),
        Err(e) => format!("Download failed: {e}"),
    }
}
