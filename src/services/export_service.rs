use crate::error::ApiError;
use crate::models::{ExportOptions, ExportResponse};
use crate::services::ApiClient;

impl ApiClient {
    pub async fn export_interventions(
        &self,
        options: &ExportOptions,
    ) -> Result<ExportResponse, ApiError> {
        log::info!("📄 [API] Exportando interventions ({})", options.format.as_str());
        self.post("/exports/interventions", options).await
    }

    pub async fn export_site_equipment(
        &self,
        site_id: &str,
        options: &ExportOptions,
    ) -> Result<ExportResponse, ApiError> {
        self.get(&format!(
            "/exports/site/{}/equipment?{}",
            site_id,
            options.query_string()
        ))
        .await
    }

    pub async fn export_site_performance(
        &self,
        site_id: &str,
        options: &ExportOptions,
    ) -> Result<ExportResponse, ApiError> {
        self.get(&format!(
            "/exports/site/{}/performance?{}",
            site_id,
            options.query_string()
        ))
        .await
    }

    /// Limpieza de ficheros exportados. Sin control de rol: usar
    /// `OperationsStore::cleanup_exports`.
    pub(crate) async fn cleanup_exports(&self) -> Result<(), ApiError> {
        self.post_empty("/exports/cleanup").await
    }
}
