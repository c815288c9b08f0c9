use serde_json::json;

use crate::error::ApiError;
use crate::models::intervention::InterventionStatus;
use crate::models::{Intervention, InterventionDraft};
use crate::services::ApiClient;

impl ApiClient {
    /// Lista completa; el filtrado se hace en cliente (`viewmodels::list_filters`)
    pub async fn list_interventions(&self) -> Result<Vec<Intervention>, ApiError> {
        self.get("/interventions").await
    }

    pub async fn get_intervention(&self, id: &str) -> Result<Intervention, ApiError> {
        self.get(&format!("/interventions/{}", id)).await
    }

    pub async fn create_intervention(
        &self,
        draft: &InterventionDraft,
    ) -> Result<Intervention, ApiError> {
        log::info!("🛠️ [API] Nueva intervención en sitio {}", draft.site);
        self.post("/interventions", draft).await
    }

    pub async fn update_intervention(
        &self,
        id: &str,
        draft: &InterventionDraft,
    ) -> Result<Intervention, ApiError> {
        self.put(&format!("/interventions/{}", id), draft).await
    }

    pub async fn delete_intervention(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/interventions/{}", id)).await
    }

    pub async fn add_intervention_note(
        &self,
        id: &str,
        note: &str,
    ) -> Result<Intervention, ApiError> {
        self.post(&format!("/interventions/{}/notes", id), &json!({ "note": note }))
            .await
    }

    pub async fn set_intervention_status(
        &self,
        id: &str,
        status: InterventionStatus,
    ) -> Result<Intervention, ApiError> {
        self.put(&format!("/interventions/{}/status", id), &json!({ "status": status }))
            .await
    }

    pub async fn assign_technician(
        &self,
        id: &str,
        technician_id: &str,
    ) -> Result<Intervention, ApiError> {
        self.put(
            &format!("/interventions/{}/assign", id),
            &json!({ "technicianId": technician_id }),
        )
        .await
    }
}
