// Avisos de los gestionnaires. Sin control de rol: pasar por OperationsStore.

use crate::error::ApiError;
use crate::models::Notification;
use crate::services::ApiClient;

impl ApiClient {
    pub(crate) async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get("/notifications").await
    }

    pub(crate) async fn clear_notifications(&self) -> Result<(), ApiError> {
        self.delete("/notifications").await
    }

    pub(crate) async fn mark_notification_read(&self, id: &str) -> Result<Notification, ApiError> {
        self.put_empty(&format!("/notifications/{}/read", id)).await
    }

    pub(crate) async fn mark_all_notifications_read(&self) -> Result<Vec<Notification>, ApiError> {
        self.put_empty("/notifications/read-all").await
    }
}
