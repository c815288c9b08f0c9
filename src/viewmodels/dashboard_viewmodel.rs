// ============================================================================
// DASHBOARD VIEWMODEL - Panel en vivo (monitorización, simulación, alertas)
// ============================================================================
// Carga inicial por HTTP y después solo eventos del canal en vivo.
// La suscripción vive lo que vive el viewmodel (o hasta `detach`).
// Variante ADMIN: mandos de monitorización/simulación. Variante
// GESTIONNAIRE: panel de avisos.
// ============================================================================

use std::cell::RefCell;

use crate::error::AppError;
use crate::models::{
    Alert, LiveMessage, MonitoringStatus, Notification, SimulationStatus, SiteMetrics, Topic,
};
use crate::routing::DashboardView;
use crate::services::{ApiClient, LiveUpdateChannel, Subscription};
use crate::stores::OperationsStore;
use crate::state::ReactiveState;
use crate::utils::RECENT_ALERTS_LIMIT;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardPanel {
    pub monitoring: Option<MonitoringStatus>,
    pub simulation: Option<SimulationStatus>,
    pub selected_site: Option<String>,
    pub site_metrics: Option<SiteMetrics>,
    /// Más reciente primero
    pub recent_alerts: Vec<Alert>,
    /// Solo en la variante GESTIONNAIRE
    pub notifications: Vec<Notification>,
    pub banner: Option<String>,
}

impl DashboardPanel {
    /// Aplica un evento en vivo. Devuelve `false` si el evento no afecta al panel.
    pub fn apply(&mut self, message: &LiveMessage) -> bool {
        match message.topic() {
            Topic::Monitoring => match message.monitoring_status() {
                Some(status) => {
                    self.monitoring = Some(status);
                    true
                }
                None => false,
            },
            Topic::Simulation => match message.simulation_status() {
                Some(status) => {
                    self.simulation = Some(status);
                    true
                }
                None => false,
            },
            Topic::SiteMetrics => {
                let Some(selected) = self.selected_site.as_deref() else {
                    return false;
                };
                let Some(metrics) = message.site_metrics() else {
                    return false;
                };
                let site = message.site_id().unwrap_or(metrics.site_id.as_str());
                if site != selected {
                    return false;
                }
                self.site_metrics = Some(metrics);
                true
            }
            Topic::Alert => match message.alert() {
                Some(alert) => {
                    self.push_alert(alert);
                    true
                }
                None => false,
            },
            Topic::Other(kind) => {
                log::debug!("📨 [DASHBOARD] Evento `{}` ignorado", kind);
                false
            }
        }
    }

    /// Inserta al principio; una alerta ya presente se reemplaza
    fn push_alert(&mut self, alert: Alert) {
        self.recent_alerts.retain(|known| known.id != alert.id);
        self.recent_alerts.insert(0, alert);
        self.recent_alerts.truncate(RECENT_ALERTS_LIMIT);
    }
}

pub struct DashboardViewModel {
    view: DashboardView,
    api: ApiClient,
    operations: OperationsStore,
    state: ReactiveState<DashboardPanel>,
    subscription: RefCell<Option<Subscription>>,
}

impl DashboardViewModel {
    pub fn new(view: DashboardView, api: ApiClient, operations: OperationsStore) -> Self {
        Self {
            view,
            api,
            operations,
            state: ReactiveState::new(DashboardPanel::default()),
            subscription: RefCell::new(None),
        }
    }

    pub fn view(&self) -> DashboardView {
        self.view
    }

    pub fn panel(&self) -> DashboardPanel {
        self.state.get()
    }

    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&DashboardPanel) + 'static,
    {
        self.state.subscribe(callback);
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Empieza a escuchar el canal en vivo
    pub fn attach(&self, channel: &LiveUpdateChannel) {
        if self.is_attached() {
            return;
        }
        let state = self.state.clone();
        let subscription = channel.subscribe(move |message| {
            let mut panel = state.get();
            if panel.apply(message) {
                state.set(panel);
            }
        });
        *self.subscription.borrow_mut() = Some(subscription);
        log::info!("📡 [DASHBOARD] Suscrito al canal en vivo");
    }

    pub fn detach(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            log::info!("📡 [DASHBOARD] Suscripción liberada");
        }
    }

    /// Carga inicial. Cada fallo se refleja en el banner; lo que sí carga se muestra.
    pub async fn load(&self) {
        let monitoring = self.api.monitoring_status().await;
        let simulation = self.api.simulation_status().await;
        let alerts = self.api.list_alerts().await;
        let notifications = match self.view {
            DashboardView::Manager => Some(self.operations.notifications().await),
            _ => None,
        };

        let mut panel = self.state.get();
        let mut failure: Option<AppError> = None;

        match monitoring {
            Ok(status) => panel.monitoring = Some(status),
            Err(e) => failure = failure.or(Some(e.into())),
        }
        match simulation {
            Ok(status) => panel.simulation = Some(status),
            Err(e) => failure = failure.or(Some(e.into())),
        }
        match alerts {
            Ok(mut alerts) => {
                alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                alerts.truncate(RECENT_ALERTS_LIMIT);
                panel.recent_alerts = alerts;
            }
            Err(e) => failure = failure.or(Some(e.into())),
        }
        match notifications {
            Some(Ok(notifications)) => panel.notifications = notifications,
            Some(Err(e)) => failure = failure.or(Some(e)),
            None => {}
        }

        panel.banner = failure.map(|e| {
            log::warn!("⚠️ [DASHBOARD] Carga incompleta: {}", e);
            e.user_message()
        });
        self.state.set(panel);
    }

    /// Cambia el sitio cuyas métricas se siguen (y las carga)
    pub async fn select_site(&self, site_id: Option<String>) {
        let mut panel = self.state.get();
        panel.selected_site = site_id.clone();
        panel.site_metrics = None;
        self.state.set(panel);

        let Some(site_id) = site_id else {
            return;
        };
        let result = self.api.site_metrics(&site_id).await;

        let mut panel = self.state.get();
        // La selección pudo cambiar mientras esperábamos
        if panel.selected_site.as_deref() != Some(site_id.as_str()) {
            return;
        }
        match result {
            Ok(metrics) => panel.site_metrics = Some(metrics),
            Err(e) => panel.banner = Some(AppError::from(e).user_message()),
        }
        self.state.set(panel);
    }
}

impl DashboardViewModel {
    // ==========================================
    // MANDOS (ADMIN)
    // ==========================================

    pub async fn set_monitoring(&self, running: bool) {
        let result = self.operations.set_monitoring(running).await;
        self.update(|panel| match result {
            Ok(status) => panel.monitoring = Some(status),
            Err(e) => panel.banner = Some(e.user_message()),
        });
    }

    pub async fn set_simulation(&self, running: bool) {
        let result = self.operations.set_simulation(running).await;
        self.update(|panel| match result {
            Ok(status) => panel.simulation = Some(status),
            Err(e) => panel.banner = Some(e.user_message()),
        });
    }

    // ==========================================
    // AVISOS (GESTIONNAIRE)
    // ==========================================

    pub async fn mark_notification_read(&self, id: &str) {
        let result = self.operations.mark_notification_read(id).await;
        self.update(|panel| match result {
            Ok(updated) => {
                if let Some(known) = panel.notifications.iter_mut().find(|n| n.id == updated.id) {
                    *known = updated;
                }
            }
            Err(e) => panel.banner = Some(e.user_message()),
        });
    }

    pub async fn mark_all_notifications_read(&self) {
        let result = self.operations.mark_all_notifications_read().await;
        self.update(|panel| match result {
            Ok(notifications) => panel.notifications = notifications,
            Err(e) => panel.banner = Some(e.user_message()),
        });
    }

    pub async fn clear_notifications(&self) {
        let result = self.operations.clear_notifications().await;
        self.update(|panel| match result {
            Ok(()) => panel.notifications.clear(),
            Err(e) => panel.banner = Some(e.user_message()),
        });
    }

    fn update(&self, change: impl FnOnce(&mut DashboardPanel)) {
        let mut panel = self.state.get();
        change(&mut panel);
        self.state.set(panel);
    }
}

impl Drop for DashboardViewModel {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credential, Role};
    use crate::routing::dashboard_for;
    use crate::services::ChannelState;
    use crate::state::SessionState;
    use crate::testing::{identity, FakeSocketFactory, ManualScheduler, RecordingNavigator, ScriptedTransport};
    use crate::utils::MemoryStorage;
    use futures::executor::block_on;
    use serde_json::json;
    use std::rc::Rc;
    use std::time::Duration;

    fn alert_json(id: &str, created: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "siteId": "s1",
            "type": "performance",
            "severity": "high",
            "status": "active",
            "message": "Latence élevée",
            "createdAt": created
        })
    }

    fn message(value: serde_json::Value) -> LiveMessage {
        LiveMessage::parse(&value.to_string()).unwrap()
    }

    fn viewmodel(role: Role) -> (DashboardViewModel, Rc<ScriptedTransport>) {
        let transport = Rc::new(ScriptedTransport::new());
        let session = SessionState::new(Rc::new(MemoryStorage::new()));
        session.establish(identity(role), Credential::new("tok"));
        let api = ApiClient::new(
            "http://api.test/api",
            transport.clone(),
            session.clone(),
            Rc::new(RecordingNavigator::at("/dashboard")),
        );
        let operations = OperationsStore::new(api.clone(), session);
        let vm = DashboardViewModel::new(dashboard_for(role), api, operations);
        (vm, transport)
    }

    #[test]
    fn routes_events_into_panel() {
        let mut panel = DashboardPanel::default();

        assert!(panel.apply(&message(json!({"type": "monitoring", "status": {"isRunning": true, "totalAlerts": 3}}))));
        assert_eq!(panel.monitoring.as_ref().map(|m| m.total_alerts), Some(3));

        assert!(panel.apply(&message(json!({"type": "simulation", "status": {"isRunning": false}}))));
        assert!(panel.simulation.is_some());

        assert!(panel.apply(&message(json!({"type": "alert", "alert": alert_json("a1", "2024-03-01T08:00:00Z")}))));
        assert_eq!(panel.recent_alerts[0].id, "a1");

        assert!(!panel.apply(&message(json!({"type": "heartbeat"}))));
    }

    #[test]
    fn site_metrics_only_for_selected_site() {
        let metrics = |site: &str| {
            message(json!({
                "type": "site_metrics",
                "siteId": site,
                "metrics": {
                    "siteId": site,
                    "status": "healthy",
                    "uptime": 99.9,
                    "performance": {"cpu": 10.0, "memory": 20.0, "bandwidth": 30.0}
                }
            }))
        };

        let mut panel = DashboardPanel::default();
        assert!(!panel.apply(&metrics("s1")));

        panel.selected_site = Some("s1".into());
        assert!(!panel.apply(&metrics("s2")));
        assert!(panel.apply(&metrics("s1")));
        assert_eq!(panel.site_metrics.as_ref().map(|m| m.site_id.as_str()), Some("s1"));
    }

    #[test]
    fn recent_alerts_are_capped_newest_first() {
        let mut panel = DashboardPanel::default();
        for n in 0..(RECENT_ALERTS_LIMIT + 5) {
            panel.apply(&message(json!({
                "type": "alert",
                "alert": alert_json(&format!("a{}", n), "2024-03-01T08:00:00Z")
            })));
        }
        assert_eq!(panel.recent_alerts.len(), RECENT_ALERTS_LIMIT);
        assert_eq!(panel.recent_alerts[0].id, format!("a{}", RECENT_ALERTS_LIMIT + 4));

        // Actualización de una alerta conocida: sube arriba sin duplicarse
        panel.apply(&message(json!({"type": "alert", "alert": alert_json("a10", "2024-03-01T08:00:00Z")})));
        assert_eq!(panel.recent_alerts[0].id, "a10");
        assert_eq!(panel.recent_alerts.iter().filter(|a| a.id == "a10").count(), 1);
    }

    #[test]
    fn load_fills_panel_and_reports_failures() {
        let (vm, transport) = viewmodel(Role::Admin);
        transport.respond(200, r#"{"isRunning":true,"totalSitesMonitored":12}"#);
        transport.fail("offline");
        let alerts = json!([
            alert_json("old", "2024-03-01T08:00:00Z"),
            alert_json("new", "2024-03-02T08:00:00Z")
        ]);
        transport.respond(200, &alerts.to_string());

        block_on(vm.load());
        let panel = vm.panel();

        assert_eq!(panel.monitoring.map(|m| m.total_sites_monitored), Some(12));
        assert!(panel.simulation.is_none());
        assert_eq!(panel.recent_alerts[0].id, "new");
        assert_eq!(panel.banner.as_deref(), Some("Impossible de joindre le serveur"));
    }

    #[test]
    fn subscription_lives_as_long_as_the_viewmodel() {
        let (vm, _) = viewmodel(Role::Technician);
        let sockets = Rc::new(FakeSocketFactory::new());
        let channel = LiveUpdateChannel::new(
            "ws://live.test/ws",
            Duration::from_secs(5),
            sockets.clone(),
            Rc::new(ManualScheduler::new()),
        );

        vm.attach(&channel);
        vm.attach(&channel);
        assert_eq!(channel.listener_count(), 1);

        sockets.connection(0).opened();
        sockets
            .connection(0)
            .message(r#"{"type":"monitoring","status":{"isRunning":true}}"#);
        assert!(vm.panel().monitoring.is_some_and(|m| m.is_running));

        drop(vm);
        assert_eq!(channel.listener_count(), 0);
        assert_eq!(channel.state(), ChannelState::Disconnected);
        assert!(sockets.connection(0).is_closed());
    }

    #[test]
    fn admin_toggles_monitoring_from_the_panel() {
        let (vm, transport) = viewmodel(Role::Admin);
        transport.respond(200, r#"{"isRunning":true,"totalSitesMonitored":7}"#);

        block_on(vm.set_monitoring(true));

        assert_eq!(vm.panel().monitoring.map(|m| m.total_sites_monitored), Some(7));
        assert!(transport.last_request().unwrap().url.ends_with("/monitoring/start"));
    }

    #[test]
    fn technician_gets_a_banner_instead_of_a_request() {
        let (vm, transport) = viewmodel(Role::Technician);

        block_on(vm.set_simulation(true));

        assert_eq!(vm.panel().banner.as_deref(), Some("Accès non autorisé"));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn manager_dashboard_loads_and_updates_notifications() {
        let (vm, transport) = viewmodel(Role::Manager);
        transport.respond(200, r#"{"isRunning":true}"#);
        transport.respond(200, r#"{"isRunning":false}"#);
        transport.respond(200, "[]");
        transport.respond(
            200,
            r#"[{"id":"n1","message":"Nouveau site","type":"info","read":false},
                {"id":"n2","message":"Site rejeté","type":"warning","read":false}]"#,
        );
        block_on(vm.load());
        assert_eq!(vm.panel().notifications.len(), 2);
        assert!(vm.panel().banner.is_none());

        transport.respond(200, r#"{"id":"n2","message":"Site rejeté","type":"warning","read":true}"#);
        block_on(vm.mark_notification_read("n2"));
        let panel = vm.panel();
        assert!(!panel.notifications[0].read);
        assert!(panel.notifications[1].read);

        transport.respond(200, "");
        block_on(vm.clear_notifications());
        assert!(vm.panel().notifications.is_empty());
    }
}
