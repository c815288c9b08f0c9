use crate::error::ApiError;
use crate::models::Identity;
use crate::services::ApiClient;

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<Identity>, ApiError> {
        self.get("/users").await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        log::info!("🗑️ [API] Eliminando usuario {}", id);
        self.delete(&format!("/users/{}", id)).await
    }
}
