// ============================================================================
// VIEWMODELS - Estado + lógica de pantalla
// ============================================================================

pub mod login_viewmodel;
pub mod dashboard_viewmodel;
pub mod list_filters;

pub use dashboard_viewmodel::{DashboardPanel, DashboardViewModel};
pub use list_filters::{scope_interventions, scope_sites, AlertFilter, InterventionFilter, SiteFilter};
pub use login_viewmodel::{LoginForm, LoginViewModel};
