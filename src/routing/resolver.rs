// Variante del dashboard según el rol (ruta compartida /dashboard)

use crate::models::Role;
use crate::state::Session;
use crate::utils::LOGIN_PATH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Admin,
    Manager,
    Technician,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewResolution {
    Render(DashboardView),
    Redirect(&'static str),
}

pub fn dashboard_for(role: Role) -> DashboardView {
    match role {
        Role::Admin => DashboardView::Admin,
        Role::Manager => DashboardView::Manager,
        Role::Technician => DashboardView::Technician,
    }
}

pub fn resolve_dashboard(session: &Session) -> ViewResolution {
    match session.role() {
        Some(role) => ViewResolution::Render(dashboard_for(role)),
        None => ViewResolution::Redirect(LOGIN_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Credential;
    use crate::testing::identity;

    #[test]
    fn one_variant_per_role() {
        let cases = [
            (Role::Admin, DashboardView::Admin),
            (Role::Manager, DashboardView::Manager),
            (Role::Technician, DashboardView::Technician),
        ];
        for (role, view) in cases {
            let session = Session::authenticated(identity(role), Credential::new("t"));
            assert_eq!(resolve_dashboard(&session), ViewResolution::Render(view));
        }
    }

    #[test]
    fn no_identity_goes_to_login() {
        assert_eq!(
            resolve_dashboard(&Session::empty()),
            ViewResolution::Redirect("/login")
        );
    }
}
