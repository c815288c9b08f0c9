// ============================================================================
// OPERATIONS STORE - Acciones reservadas a un rol
// ============================================================================
// Control de servicios y validación de sitios (ADMIN), avisos (GESTIONNAIRE).
// Un rol sin la capacidad recibe `AuthorizationDenied` sin que salga ninguna
// petición.
// ============================================================================

use crate::error::AppError;
use crate::models::site::ValidationStatus;
use crate::models::{MonitoringStatus, Notification, Role, SimulationStatus, Site};
use crate::services::ApiClient;
use crate::state::SessionState;

#[derive(Clone)]
pub struct OperationsStore {
    api: ApiClient,
    session: SessionState,
}

impl OperationsStore {
    pub fn new(api: ApiClient, session: SessionState) -> Self {
        Self { api, session }
    }

    fn require(&self, action: &str, capability: fn(&Role) -> bool) -> Result<(), AppError> {
        match self.session.role() {
            Some(role) if capability(&role) => Ok(()),
            role => {
                log::warn!("🚫 [OPS] {} denegado (rol {:?})", action, role);
                Err(AppError::AuthorizationDenied)
            }
        }
    }

    // ==========================================
    // SERVICIOS (ADMIN)
    // ==========================================

    pub async fn set_monitoring(&self, running: bool) -> Result<MonitoringStatus, AppError> {
        self.require("Control de monitorización", Role::can_control_services)?;
        let status = if running {
            self.api.start_monitoring().await?
        } else {
            self.api.stop_monitoring().await?
        };
        Ok(status)
    }

    pub async fn set_simulation(&self, running: bool) -> Result<SimulationStatus, AppError> {
        self.require("Control de simulación", Role::can_control_services)?;
        let status = if running {
            self.api.start_simulation().await?
        } else {
            self.api.stop_simulation().await?
        };
        Ok(status)
    }

    pub async fn cleanup_exports(&self) -> Result<(), AppError> {
        self.require("Limpieza de exportaciones", Role::can_control_services)?;
        Ok(self.api.cleanup_exports().await?)
    }

    /// Aprobar o rechazar un sitio pendiente
    pub async fn validate_site(
        &self,
        site_id: &str,
        status: ValidationStatus,
        rejection_reason: Option<String>,
    ) -> Result<Site, AppError> {
        self.require("Validación de sitio", Role::can_validate_sites)?;
        if status == ValidationStatus::Rejected
            && rejection_reason.as_deref().map_or(true, |r| r.trim().is_empty())
        {
            return Err(AppError::ValidationFailure(
                "Motif de rejet requis".to_string(),
            ));
        }
        Ok(self.api.validate_site(site_id, status, rejection_reason).await?)
    }

    // ==========================================
    // AVISOS (GESTIONNAIRE)
    // ==========================================

    pub async fn notifications(&self) -> Result<Vec<Notification>, AppError> {
        self.require("Lectura de avisos", Role::can_read_notifications)?;
        Ok(self.api.list_notifications().await?)
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<Notification, AppError> {
        self.require("Marcar aviso", Role::can_read_notifications)?;
        Ok(self.api.mark_notification_read(id).await?)
    }

    pub async fn mark_all_notifications_read(&self) -> Result<Vec<Notification>, AppError> {
        self.require("Marcar avisos", Role::can_read_notifications)?;
        Ok(self.api.mark_all_notifications_read().await?)
    }

    pub async fn clear_notifications(&self) -> Result<(), AppError> {
        self.require("Borrar avisos", Role::can_read_notifications)?;
        Ok(self.api.clear_notifications().await?)
    }
}
