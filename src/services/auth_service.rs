use crate::error::ApiError;
use crate::models::{Credential, Identity, LoginRequest, LoginResponse, RegisterRequest};
use crate::services::ApiClient;

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        log::info!("🔐 [API] Login de {}", email);
        self.post("/auth/login", &request).await
    }

    /// `GET /auth/me` con una credencial guardada
    pub async fn current_identity(&self, credential: &Credential) -> Result<Identity, ApiError> {
        self.get_with_credential("/auth/me", credential).await
    }

    /// `POST /auth/register` - alta de un usuario por un ADMIN o GESTIONNAIRE
    pub async fn register(&self, request: &RegisterRequest) -> Result<Identity, ApiError> {
        log::info!("👤 [API] Alta de {} ({})", request.email, request.role);
        self.post::<_, LoginResponse>("/auth/register", request)
            .await
            .map(|response| response.user)
    }
}
