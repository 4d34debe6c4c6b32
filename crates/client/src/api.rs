use std::time::Duration;

use async_trait::async_trait;
use cone_viewer_core::export::{content_disposition_file_name, csv_file_name, storage_file_name};
use cone_viewer_core::model::Filters;
use cone_viewer_protocol::{Metadata, Patient, PlotData, RangesResponse};
use reqwest::header::CONTENT_DISPOSITION;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{ClientConfig, ExportBackend};
use crate::error::ApiError;

/// A downloaded CSV export, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The cone-mosaic backend.
///
/// Every read rejects on a non-2xx status with [`ApiError::Http`] rather
/// than returning an empty value, so "no data" and "request failed" stay
/// distinguishable.
#[async_trait]
pub trait ConeApi: Send + Sync {
    async fn patients(&self) -> Result<Vec<Patient>, ApiError>;

    /// Metadata for the selection, bounds included when set.
    async fn metadata(&self, filters: &Filters) -> Result<Metadata, ApiError>;

    /// Cone positions for the selection, capped by the configured limit.
    async fn plot_data(&self, filters: &Filters) -> Result<PlotData, ApiError>;

    async fn eccentricity_ranges(
        &self,
        subject_id: &str,
        meridian: &str,
    ) -> Result<RangesResponse, ApiError>;

    /// Fetch the CSV export for the selection. `display_id` is the
    /// eye-suffixed subject id used for naming.
    async fn export_csv(&self, filters: &Filters, display_id: &str) -> Result<CsvExport, ApiError>;
}

/// [`ConeApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConeApi {
    client: reqwest::Client,
    base_url: String,
    plot_limit: u32,
    export: ExportBackend,
}

impl HttpConeApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            plot_limit: config.plot_limit,
            export: config.export_backend.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn export_backend(&self) -> &ExportBackend {
        &self.export
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<reqwest::Response, ApiError> {
        debug!(url, ?query, "GET");
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "non-success status");
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let body = self.get(&url, query).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ConeApi for HttpConeApi {
    async fn patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get_json("/patients", &[]).await
    }

    async fn metadata(&self, filters: &Filters) -> Result<Metadata, ApiError> {
        self.get_json("/metadata", &filters.query_pairs()).await
    }

    async fn plot_data(&self, filters: &Filters) -> Result<PlotData, ApiError> {
        let mut query = filters.query_pairs();
        query.push(("limit", self.plot_limit.to_string()));
        self.get_json("/plot-data", &query).await
    }

    async fn eccentricity_ranges(
        &self,
        subject_id: &str,
        meridian: &str,
    ) -> Result<RangesResponse, ApiError> {
        let query = [
            ("subject_id", subject_id.to_string()),
            ("meridian", meridian.to_string()),
        ];
        self.get_json("/eccentricity-ranges", &query).await
    }

    async fn export_csv(&self, filters: &Filters, display_id: &str) -> Result<CsvExport, ApiError> {
        match &self.export {
            ExportBackend::Disabled => Err(ApiError::ExportDisabled),
            ExportBackend::ServerRoute => {
                let url = format!("{}/cones/export", self.base_url);
                let response = self.get(&url, &filters.query_pairs()).await?;
                let file_name = response
                    .headers()
                    .get(CONTENT_DISPOSITION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(content_disposition_file_name)
                    .unwrap_or_else(|| csv_file_name(filters));
                let bytes = response.bytes().await?.to_vec();
                Ok(CsvExport { file_name, bytes })
            }
            ExportBackend::ObjectStorage { base_url } => {
                let file_name = storage_file_name(display_id);
                let url = format!("{}/{file_name}", base_url.trim_end_matches('/'));
                let bytes = self.get(&url, &[]).await?.bytes().await?.to_vec();
                Ok(CsvExport { file_name, bytes })
            }
        }
    }
}
