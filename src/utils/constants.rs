/// Clave de `localStorage` con el token bearer
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Clave de `localStorage` con la instantánea de la identidad.
/// Solo es una pista previa a la revalidación, nunca se confía en ella.
pub const IDENTITY_HINT_STORAGE_KEY: &str = "user";

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Evento DOM que se emite tras cada navegación programática
pub const ROUTE_CHANGE_EVENT: &str = "routechange";

/// Máximo de alertas recientes que guarda el panel del dashboard
pub const RECENT_ALERTS_LIMIT: usize = 50;
