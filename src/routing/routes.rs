// ============================================================================
// RUTAS - Path ↔ pantalla + tabla de permisos por rol
// ============================================================================

use crate::models::Role;

/// Pantalla lógica protegida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Dashboard,
    SiteList,
    SiteNew,
    SiteDetails,
    SiteEdit,
    SiteHistory,
    SiteValidation,
    InterventionList,
    InterventionNew,
    InterventionDetail,
    InterventionEdit,
    Reports,
    Alerts,
    Users,
}

impl Screen {
    pub const ALL: [Screen; 14] = [
        Screen::Dashboard,
        Screen::SiteList,
        Screen::SiteNew,
        Screen::SiteDetails,
        Screen::SiteEdit,
        Screen::SiteHistory,
        Screen::SiteValidation,
        Screen::InterventionList,
        Screen::InterventionNew,
        Screen::InterventionDetail,
        Screen::InterventionEdit,
        Screen::Reports,
        Screen::Alerts,
        Screen::Users,
    ];

    /// Patrón de la ruta (`:id` = segmento variable)
    pub fn pattern(&self) -> &'static str {
        match self {
            Screen::Dashboard => "/dashboard",
            Screen::SiteList => "/sites",
            Screen::SiteNew => "/sites/new",
            Screen::SiteDetails => "/sites/:id",
            Screen::SiteEdit => "/sites/:id/edit",
            Screen::SiteHistory => "/sites/:id/history",
            Screen::SiteValidation => "/admin/sites/validation",
            Screen::InterventionList => "/interventions",
            Screen::InterventionNew => "/interventions/new",
            Screen::InterventionDetail => "/interventions/:id",
            Screen::InterventionEdit => "/interventions/:id/edit",
            Screen::Reports => "/reports",
            Screen::Alerts => "/alerts",
            Screen::Users => "/users",
        }
    }
}

/// Ruta ya interpretada
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Root,
    Dashboard,
    SiteList,
    SiteNew,
    SiteDetails(String),
    SiteEdit(String),
    SiteHistory(String),
    SiteValidation,
    InterventionList,
    InterventionNew,
    InterventionDetail(String),
    InterventionEdit(String),
    Reports,
    Alerts,
    Users,
    NotFound(String),
}

impl Route {
    /// Interpreta un path (ignora query, hash y la barra final)
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["dashboard"] => Route::Dashboard,
            ["sites"] => Route::SiteList,
            ["sites", "new"] => Route::SiteNew,
            ["sites", id] => Route::SiteDetails(id.to_string()),
            ["sites", id, "edit"] => Route::SiteEdit(id.to_string()),
            ["sites", id, "history"] => Route::SiteHistory(id.to_string()),
            ["admin", "sites", "validation"] => Route::SiteValidation,
            ["interventions"] => Route::InterventionList,
            ["interventions", "new"] => Route::InterventionNew,
            ["interventions", id] => Route::InterventionDetail(id.to_string()),
            ["interventions", id, "edit"] => Route::InterventionEdit(id.to_string()),
            ["reports"] => Route::Reports,
            ["alerts"] => Route::Alerts,
            ["users"] => Route::Users,
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Pantalla protegida que corresponde. `None` para rutas públicas o
    /// que solo redirigen.
    pub fn screen(&self) -> Option<Screen> {
        let screen = match self {
            Route::Login | Route::Root | Route::NotFound(_) => return None,
            Route::Dashboard => Screen::Dashboard,
            Route::SiteList => Screen::SiteList,
            Route::SiteNew => Screen::SiteNew,
            Route::SiteDetails(_) => Screen::SiteDetails,
            Route::SiteEdit(_) => Screen::SiteEdit,
            Route::SiteHistory(_) => Screen::SiteHistory,
            Route::SiteValidation => Screen::SiteValidation,
            Route::InterventionList => Screen::InterventionList,
            Route::InterventionNew => Screen::InterventionNew,
            Route::InterventionDetail(_) => Screen::InterventionDetail,
            Route::InterventionEdit(_) => Screen::InterventionEdit,
            Route::Reports => Screen::Reports,
            Route::Alerts => Screen::Alerts,
            Route::Users => Screen::Users,
        };
        Some(screen)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Root => "/".to_string(),
            Route::SiteDetails(id) => format!("/sites/{}", id),
            Route::SiteEdit(id) => format!("/sites/{}/edit", id),
            Route::SiteHistory(id) => format!("/sites/{}/history", id),
            Route::InterventionDetail(id) => format!("/interventions/{}", id),
            Route::InterventionEdit(id) => format!("/interventions/{}/edit", id),
            Route::NotFound(path) => path.clone(),
            other => other
                .screen()
                .map(|screen| screen.pattern().to_string())
                .unwrap_or_default(),
        }
    }
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Manager, Role::Technician];
const OFFICE_ROLES: &[Role] = &[Role::Admin, Role::Manager];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Tabla inmutable pantalla → roles autorizados
#[derive(Debug, Clone)]
pub struct RoutePermissionTable {
    entries: Vec<(Screen, &'static [Role])>,
}

impl RoutePermissionTable {
    pub fn standard() -> Self {
        let entries = Screen::ALL
            .iter()
            .map(|&screen| {
                let roles = match screen {
                    Screen::Dashboard | Screen::InterventionList | Screen::InterventionDetail => {
                        ALL_ROLES
                    }
                    Screen::SiteList
                    | Screen::SiteNew
                    | Screen::SiteDetails
                    | Screen::SiteEdit
                    | Screen::SiteHistory
                    | Screen::InterventionNew
                    | Screen::InterventionEdit
                    | Screen::Reports
                    | Screen::Alerts => OFFICE_ROLES,
                    Screen::SiteValidation | Screen::Users => ADMIN_ONLY,
                };
                (screen, roles)
            })
            .collect();
        Self { entries }
    }

    pub fn allowed_roles(&self, screen: Screen) -> &[Role] {
        self.entries
            .iter()
            .find(|(s, _)| *s == screen)
            .map(|(_, roles)| *roles)
            .unwrap_or(&[])
    }

    pub fn permits(&self, screen: Screen, role: Role) -> bool {
        self.allowed_roles(screen).contains(&role)
    }
}

impl Default for RoutePermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}
