// ============================================================================
// ROUTER - path → pantalla a renderizar o redirección
// ============================================================================
// Orden: rutas públicas, guardia, y solo para /dashboard el resolutor.
// ============================================================================

use crate::routing::guard::{AccessDecision, AccessPolicyGuard};
use crate::routing::resolver::{resolve_dashboard, DashboardView, ViewResolution};
use crate::routing::routes::Route;
use crate::state::Session;
use crate::utils::DASHBOARD_PATH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Pantalla pública de login
    Login,
    Render(Route),
    RenderDashboard(DashboardView),
    Redirect(String),
}

pub fn resolve_navigation(path: &str, session: &Session, guard: &AccessPolicyGuard) -> NavigationOutcome {
    let route = Route::parse(path);

    let screen = match &route {
        Route::Login => return NavigationOutcome::Login,
        Route::Root | Route::NotFound(_) => {
            return NavigationOutcome::Redirect(DASHBOARD_PATH.to_string())
        }
        other => match other.screen() {
            Some(screen) => screen,
            None => return NavigationOutcome::Redirect(DASHBOARD_PATH.to_string()),
        },
    };

    if let AccessDecision::Redirect(target) = guard.check_access(screen, session) {
        return NavigationOutcome::Redirect(target.to_string());
    }

    if route == Route::Dashboard {
        return match resolve_dashboard(session) {
            ViewResolution::Render(view) => NavigationOutcome::RenderDashboard(view),
            ViewResolution::Redirect(target) => NavigationOutcome::Redirect(target.to_string()),
        };
    }

    NavigationOutcome::Render(route)
}
