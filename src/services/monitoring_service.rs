use crate::error::ApiError;
use crate::models::{EquipmentMetrics, MonitoringStatus, SimulationStatus, SiteMetrics};
use crate::services::ApiClient;

impl ApiClient {
    pub async fn monitoring_status(&self) -> Result<MonitoringStatus, ApiError> {
        self.get("/monitoring/status").await
    }

    pub async fn site_metrics(&self, site_id: &str) -> Result<SiteMetrics, ApiError> {
        self.get(&format!("/monitoring/site/{}", site_id)).await
    }

    pub async fn equipment_metrics(
        &self,
        site_id: &str,
        equipment_id: &str,
    ) -> Result<EquipmentMetrics, ApiError> {
        self.get(&format!("/monitoring/equipment/{}/{}", site_id, equipment_id))
            .await
    }

    pub async fn simulation_status(&self) -> Result<SimulationStatus, ApiError> {
        self.get("/simulation/status").await
    }

    // ==========================================
    // CONTROL DE SERVICIOS (sin control de rol: pasar por OperationsStore)
    // ==========================================

    pub(crate) async fn start_monitoring(&self) -> Result<MonitoringStatus, ApiError> {
        log::info!("▶️ [API] Arrancando monitorización");
        self.post_action("/monitoring/start").await
    }

    pub(crate) async fn stop_monitoring(&self) -> Result<MonitoringStatus, ApiError> {
        log::info!("⏹️ [API] Parando monitorización");
        self.post_action("/monitoring/stop").await
    }

    pub(crate) async fn start_simulation(&self) -> Result<SimulationStatus, ApiError> {
        log::info!("▶️ [API] Arrancando simulación");
        self.post_action("/simulation/start").await
    }

    pub(crate) async fn stop_simulation(&self) -> Result<SimulationStatus, ApiError> {
        log::info!("⏹️ [API] Parando simulación");
        self.post_action("/simulation/stop").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::site::EquipmentStatus;
    use crate::models::{Credential, Role};
    use crate::services::Method;
    use crate::state::SessionState;
    use crate::testing::{identity, RecordingNavigator, ScriptedTransport};
    use crate::utils::MemoryStorage;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn api() -> (ApiClient, Rc<ScriptedTransport>) {
        let transport = Rc::new(ScriptedTransport::new());
        let session = SessionState::new(Rc::new(MemoryStorage::new()));
        session.establish(identity(Role::Admin), Credential::new("tok"));
        let api = ApiClient::new(
            "http://api.test/api",
            transport.clone(),
            session,
            Rc::new(RecordingNavigator::at("/dashboard")),
        );
        (api, transport)
    }

    #[test]
    fn equipment_metrics_path() {
        let (api, transport) = api();
        transport.respond(
            200,
            r#"{"equipmentId":"e1","status":"maintenance","metrics":{"temperature":41.5,"power":220.0,"signal":-70.0}}"#,
        );

        let metrics = block_on(api.equipment_metrics("s1", "e1")).unwrap();

        assert_eq!(metrics.status, EquipmentStatus::Maintenance);
        let sent = transport.last_request().unwrap();
        assert!(sent.url.ends_with("/monitoring/equipment/s1/e1"));
    }

    #[test]
    fn start_simulation_posts_without_body() {
        let (api, transport) = api();
        transport.respond(200, r#"{"isRunning":true,"progress":0}"#);

        let status = block_on(api.start_simulation()).unwrap();

        assert!(status.is_running);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert!(sent.url.ends_with("/simulation/start"));
        assert!(sent.body.is_none());
    }
}
