// ============================================================================
// ROUTING - Rutas, guardia de acceso, resolutor de vistas y navegación
// ============================================================================

pub mod routes;
pub mod guard;
pub mod resolver;
pub mod router;
pub mod menu;
pub mod navigator;

pub use guard::{role_default_screen, AccessDecision, AccessPolicyGuard};
pub use menu::{menu_items, MenuItem};
pub use navigator::{BrowserNavigator, Navigator};
pub use resolver::{dashboard_for, resolve_dashboard, DashboardView, ViewResolution};
pub use router::{resolve_navigation, NavigationOutcome};
pub use routes::{Route, RoutePermissionTable, Screen};
