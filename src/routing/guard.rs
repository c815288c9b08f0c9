// ============================================================================
// GUARDIA DE ACCESO - ¿puede este rol ver esta pantalla?
// ============================================================================
// Se evalúa en cada navegación, sin caché.
// ============================================================================

use crate::models::Role;
use crate::routing::routes::{RoutePermissionTable, Screen};
use crate::state::Session;
use crate::utils::LOGIN_PATH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(&'static str),
}

/// Pantalla de inicio de cada rol
pub fn role_default_screen(role: Role) -> Screen {
    match role {
        Role::Admin => Screen::Dashboard,
        Role::Manager => Screen::Dashboard,
        Role::Technician => Screen::Dashboard,
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicyGuard {
    table: RoutePermissionTable,
}

impl AccessPolicyGuard {
    pub fn new(table: RoutePermissionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RoutePermissionTable {
        &self.table
    }

    pub fn check_access(&self, screen: Screen, session: &Session) -> AccessDecision {
        let Some(role) = session.role() else {
            log::debug!("🔒 [GUARD] {} sin sesión → {}", screen.pattern(), LOGIN_PATH);
            return AccessDecision::Redirect(LOGIN_PATH);
        };

        if self.table.permits(screen, role) {
            AccessDecision::Allow
        } else {
            let fallback = role_default_screen(role).pattern();
            log::info!("🚫 [GUARD] {} no permitido para {} → {}", screen.pattern(), role, fallback);
            AccessDecision::Redirect(fallback)
        }
    }
}
