// ============================================================================
// ERRORES - Taxonomía de transporte (ApiError) y de pantalla (AppError)
// ============================================================================

use thiserror::Error;

/// Fallos que devuelve el cliente API. No contiene mensajes para el usuario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No hubo respuesta (red caída, CORS, DNS...)
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 401 - ya gestionado globalmente (logout + /login) antes de llegar aquí
    #[error("authentication rejected")]
    AuthRejected,

    /// HTTP 5xx (o cualquier estado no-2xx fuera de 4xx)
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// HTTP 4xx distinto de 401
    #[error("validation error (HTTP {status}): {message}")]
    Validation { status: u16, message: String },

    /// 2xx con un cuerpo que no corresponde al tipo esperado
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Clasifica un estado HTTP no exitoso
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::AuthRejected,
            400..=499 => ApiError::Validation { status, message },
            _ => ApiError::Server { status, message },
        }
    }
}

/// Fallos del almacenamiento duradero del navegador
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("could not write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// Taxonomía que ven las pantallas
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Credenciales incorrectas en el login (mensaje genérico, sin detalle de campo)
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Sesión válida pero rol insuficiente
    #[error("access denied")]
    AuthorizationDenied,

    /// El backend rechazó la credencial
    #[error("session expired")]
    SessionExpired,

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("server failure: {0}")]
    ServerFailure(String),

    #[error("validation failure: {0}")]
    ValidationFailure(String),
}

impl AppError {
    /// Mensaje para el banner de la pantalla
    pub fn user_message(&self) -> String {
        match self {
            AppError::AuthenticationFailure => "Email ou mot de passe incorrect".to_string(),
            AppError::AuthorizationDenied => "Accès non autorisé".to_string(),
            AppError::SessionExpired => "Session expirée, veuillez vous reconnecter".to_string(),
            AppError::NetworkFailure(_) => "Impossible de joindre le serveur".to_string(),
            AppError::ServerFailure(_) => "Erreur du serveur, veuillez réessayer".to_string(),
            AppError::ValidationFailure(detail) if !detail.is_empty() => detail.clone(),
            AppError::ValidationFailure(_) => "Données invalides".to_string(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(detail) => AppError::NetworkFailure(detail),
            ApiError::AuthRejected => AppError::SessionExpired,
            ApiError::Server { message, .. } => AppError::ServerFailure(message),
            ApiError::Decode(detail) => AppError::ServerFailure(detail),
            ApiError::Validation { message, .. } => AppError::ValidationFailure(message),
        }
    }
}
