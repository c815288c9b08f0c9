use crate::error::ApiError;
use crate::models::site::ValidationStatus;
use crate::models::{Site, SiteDraft, SiteStats, SiteValidationRequest};
use crate::services::ApiClient;

impl ApiClient {
    pub async fn list_sites(&self) -> Result<Vec<Site>, ApiError> {
        self.get("/sites").await
    }

    pub async fn get_site(&self, id: &str) -> Result<Site, ApiError> {
        self.get(&format!("/sites/{}", id)).await
    }

    pub async fn create_site(&self, draft: &SiteDraft) -> Result<Site, ApiError> {
        log::info!("📡 [API] Creando sitio {}", draft.name);
        self.post("/sites", draft).await
    }

    pub async fn update_site(&self, id: &str, draft: &SiteDraft) -> Result<Site, ApiError> {
        self.put(&format!("/sites/{}", id), draft).await
    }

    pub async fn delete_site(&self, id: &str) -> Result<(), ApiError> {
        log::info!("🗑️ [API] Eliminando sitio {}", id);
        self.delete(&format!("/sites/{}", id)).await
    }

    /// Aprobar o rechazar un sitio pendiente. Sin control de rol: usar
    /// `OperationsStore::validate_site`.
    pub(crate) async fn validate_site(
        &self,
        id: &str,
        status: ValidationStatus,
        rejection_reason: Option<String>,
    ) -> Result<Site, ApiError> {
        let request = SiteValidationRequest {
            validation_status: status,
            rejection_reason,
        };
        self.put(&format!("/sites/{}/validation", id), &request).await
    }

    pub async fn site_stats(&self) -> Result<SiteStats, ApiError> {
        self.get("/sites/stats").await
    }
}
