// ============================================================================
// API CLIENT - HTTP autenticado + gestión global del 401
// ============================================================================
// Adjunta el bearer de la sesión actual a cada petición. Un 401 de cualquier
// endpoint borra la sesión y fuerza /login antes de devolver el error.
// Los mensajes para el usuario los formatea cada pantalla, no este cliente.
// ============================================================================

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::Credential;
use crate::routing::Navigator;
use crate::services::http::{HttpRequest, HttpTransport, Method};
use crate::state::SessionState;
use crate::utils::LOGIN_PATH;

/// Cuerpo de error típico del backend (`{"message": "..."}`)
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Cliente API (clonar es barato)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn HttpTransport>,
    session: SessionState,
    navigator: Rc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Rc<dyn HttpTransport>,
        session: SessionState,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            session,
            navigator,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ==========================================
    // VERBOS
    // ==========================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(Method::Get, path, None, None).await?;
        decode(&body)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(Method::Post, path, Some(encode(payload)?), None)
            .await?;
        decode(&body)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(Method::Put, path, Some(encode(payload)?), None)
            .await?;
        decode(&body)
    }

    /// `PUT` sin cuerpo (acciones tipo `/alerts/:id/resolve`)
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(Method::Put, path, None, None).await?;
        decode(&body)
    }

    /// `POST` sin cuerpo (acciones tipo `/monitoring/start`)
    pub async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(Method::Post, path, None, None).await?;
        decode(&body)
    }

    /// `POST` sin cuerpo ni respuesta útil
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::Post, path, None, None).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, path, None, None).await.map(|_| ())
    }

    /// `GET` con una credencial explícita en lugar de la de la sesión.
    /// Sirve para revalidar un token guardado sin rellenar la sesión a medias.
    pub async fn get_with_credential<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &Credential,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(Method::Get, path, None, Some(credential))
            .await?;
        decode(&body)
    }

    // ==========================================
    // NÚCLEO
    // ==========================================

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        credential_override: Option<&Credential>,
    ) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = HttpRequest::new(method, url);

        let credential = match credential_override {
            Some(credential) => Some(credential.clone()),
            None => self.session.credential(),
        };
        if let Some(credential) = credential {
            request = request.header("Authorization", credential.bearer());
        }
        if let Some(body) = body {
            request = request.json_body(body);
        }

        log::debug!("🌐 [API] {} {}", method.as_str(), path);

        let response = self.transport.send(request).await.map_err(|e| {
            log::warn!("📴 [API] {} {} sin respuesta: {}", method.as_str(), path, e);
            ApiError::Network(e)
        })?;

        if response.ok() {
            return Ok(response.body);
        }

        let error = ApiError::from_status(response.status, error_message(&response.body));
        if error == ApiError::AuthRejected {
            self.handle_auth_rejected(path);
        } else {
            log::warn!("⚠️ [API] {} {} → HTTP {}", method.as_str(), path, response.status);
        }
        Err(error)
    }

    /// Efecto global del 401: fuera sesión y a /login, sea cual sea la pantalla
    fn handle_auth_rejected(&self, path: &str) {
        log::warn!("🔒 [API] 401 en {} - cerrando sesión", path);
        self.session.clear();
        self.navigator.replace(LOGIN_PATH);
    }
}

fn encode<B: Serialize>(payload: &B) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::Validation {
        status: 0,
        message: format!("Serialization error: {}", e),
    })
}

/// Cuerpo vacío se trata como `null` para que `()` y `Option<_>` decodifiquen
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(format!("Parse error: {}", e)))
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Some(message), .. }) => message,
        Ok(ErrorBody { error: Some(error), .. }) => error,
        _ => body.trim().to_string(),
    }
}
