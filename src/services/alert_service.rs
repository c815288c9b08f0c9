use crate::error::ApiError;
use crate::models::Alert;
use crate::services::ApiClient;

impl ApiClient {
    pub async fn list_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.get("/alerts").await
    }

    pub async fn acknowledge_alert(&self, id: &str) -> Result<Alert, ApiError> {
        self.put_empty(&format!("/alerts/{}/acknowledge", id)).await
    }

    pub async fn resolve_alert(&self, id: &str) -> Result<Alert, ApiError> {
        self.put_empty(&format!("/alerts/{}/resolve", id)).await
    }

    pub async fn delete_alert(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/alerts/{}", id)).await
    }
}
