// ============================================================================
// SESSION STORE - login / logout / restauración
// ============================================================================
// Orquesta el cliente API y SessionState. Nunca escribe la sesión por su
// cuenta: todo pasa por `SessionState::establish` / `clear`.
// ============================================================================

use crate::error::{ApiError, AppError};
use crate::models::{Identity, RegisterRequest};
use crate::services::ApiClient;
use crate::state::SessionState;

#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    session: SessionState,
}

impl SessionStore {
    pub fn new(api: ApiClient, session: SessionState) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Login con email + contraseña.
    /// Credenciales rechazadas → `AuthenticationFailure` genérico.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::ValidationFailure(
                "Email et mot de passe requis".to_string(),
            ));
        }

        log::info!("🔐 [SESSION] Iniciando login...");
        let response = self.api.login(email, password).await.map_err(|e| {
            log::warn!("❌ [SESSION] Login fallido: {}", e);
            login_error(e)
        })?;

        let identity = response.user.clone();
        self.session.establish(response.user, response.token);
        Ok(identity)
    }

    /// Cierra la sesión localmente. Sin petición al servidor; idempotente.
    pub fn logout(&self) {
        log::info!("👋 [SESSION] Logout");
        self.session.clear();
    }

    /// Revalida la credencial guardada (`GET /auth/me`).
    /// Cualquier fallo deja la sesión vacía y borra lo guardado.
    pub async fn restore_from_storage(&self) -> Option<Identity> {
        let Some(credential) = self.session.stored_credential() else {
            log::info!("ℹ️ [SESSION] Sin credencial guardada");
            return None;
        };

        if let Some(hint) = self.session.identity_hint() {
            log::debug!("🔎 [SESSION] Revalidando sesión de {}", hint.email);
        }

        match self.api.current_identity(&credential).await {
            Ok(identity) => {
                log::info!("✅ [SESSION] Sesión restaurada");
                self.session.establish(identity.clone(), credential);
                Some(identity)
            }
            Err(e) => {
                log::warn!("⚠️ [SESSION] Credencial guardada no válida: {}", e);
                self.session.clear();
                None
            }
        }
    }

    /// Alta de un usuario. Solo para roles con `can_register_users`.
    pub async fn register_user(&self, request: &RegisterRequest) -> Result<Identity, AppError> {
        let allowed = self
            .session
            .role()
            .map(|role| role.can_register_users())
            .unwrap_or(false);
        if !allowed {
            log::warn!("🚫 [SESSION] Alta de usuario denegada");
            return Err(AppError::AuthorizationDenied);
        }
        Ok(self.api.register(request).await?)
    }
}

fn login_error(err: ApiError) -> AppError {
    match err {
        ApiError::AuthRejected | ApiError::Validation { .. } => AppError::AuthenticationFailure,
        ApiError::Network(detail) => AppError::NetworkFailure(detail),
        ApiError::Server { message, .. } => AppError::ServerFailure(message),
        ApiError::Decode(detail) => AppError::ServerFailure(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credential, Role};
    use crate::testing::{identity, login_body, RecordingNavigator, ScriptedTransport};
    use crate::utils::{DurableStorage, MemoryStorage, TOKEN_STORAGE_KEY};
    use futures::executor::block_on;
    use std::rc::Rc;

    struct Fixture {
        store: SessionStore,
        transport: Rc<ScriptedTransport>,
        storage: Rc<MemoryStorage>,
    }

    fn fixture() -> Fixture {
        let transport = Rc::new(ScriptedTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let session = SessionState::new(storage.clone());
        let api = ApiClient::new(
            "http://api.test/api",
            transport.clone(),
            session.clone(),
            Rc::new(RecordingNavigator::at("/login")),
        );
        Fixture {
            store: SessionStore::new(api, session),
            transport,
            storage,
        }
    }

    #[test]
    fn login_establishes_session_and_persists_token() {
        let f = fixture();
        f.transport.respond(200, &login_body(Role::Manager, "tok-1"));

        let who = block_on(f.store.login("manager@netsite.test", "secret")).unwrap();

        assert_eq!(who.role, Role::Manager);
        assert_eq!(f.store.session().credential(), Some(Credential::new("tok-1")));
        assert_eq!(f.storage.load(TOKEN_STORAGE_KEY).as_deref(), Some("tok-1"));
        assert!(f.transport.last_request().unwrap().url.ends_with("/auth/login"));
    }

    #[test]
    fn rejected_credentials_are_a_generic_failure() {
        let f = fixture();
        f.transport.respond(401, r#"{"message":"Mot de passe incorrect"}"#);
        assert_eq!(
            block_on(f.store.login("a@b.c", "wrong")),
            Err(AppError::AuthenticationFailure)
        );

        f.transport.respond(400, r#"{"message":"Utilisateur introuvable"}"#);
        assert_eq!(
            block_on(f.store.login("nobody@b.c", "x")),
            Err(AppError::AuthenticationFailure)
        );

        assert!(!f.store.session().is_authenticated());
        assert!(f.storage.is_empty());
    }

    #[test]
    fn transport_failures_keep_their_kind() {
        let f = fixture();
        f.transport.fail("offline");
        assert!(matches!(
            block_on(f.store.login("a@b.c", "x")),
            Err(AppError::NetworkFailure(_))
        ));

        f.transport.respond(503, "");
        assert!(matches!(
            block_on(f.store.login("a@b.c", "x")),
            Err(AppError::ServerFailure(_))
        ));
    }

    #[test]
    fn blank_fields_never_reach_the_network() {
        let f = fixture();
        assert!(matches!(
            block_on(f.store.login("   ", "x")),
            Err(AppError::ValidationFailure(_))
        ));
        assert!(matches!(
            block_on(f.store.login("a@b.c", "")),
            Err(AppError::ValidationFailure(_))
        ));
        assert_eq!(f.transport.request_count(), 0);
    }

    #[test]
    fn logout_twice_is_harmless() {
        let f = fixture();
        f.transport.respond(200, &login_body(Role::Admin, "tok"));
        block_on(f.store.login("admin@netsite.test", "pw")).unwrap();

        f.store.logout();
        f.store.logout();

        assert!(!f.store.session().is_authenticated());
        assert!(f.storage.is_empty());
    }

    #[test]
    fn login_then_restore_yields_same_identity() {
        let f = fixture();
        f.transport.respond(200, &login_body(Role::Technician, "tok-7"));
        let logged_in = block_on(f.store.login("tech@netsite.test", "pw")).unwrap();

        // Recarga: sesión en memoria nueva, mismo almacenamiento
        let session = SessionState::new(f.storage.clone());
        let api = ApiClient::new(
            "http://api.test/api",
            f.transport.clone(),
            session.clone(),
            Rc::new(RecordingNavigator::at("/dashboard")),
        );
        let reloaded = SessionStore::new(api, session);
        let me = serde_json::to_string(&identity(Role::Technician)).unwrap();
        f.transport.respond(200, &me);

        let restored = block_on(reloaded.restore_from_storage());

        assert_eq!(restored, Some(logged_in));
        assert!(reloaded.session().is_authenticated());
        assert_eq!(
            f.transport.last_request().unwrap().header_value("Authorization"),
            Some("Bearer tok-7")
        );
    }

    #[test]
    fn failed_restore_clears_storage() {
        let f = fixture();
        f.storage.store(TOKEN_STORAGE_KEY, "stale").unwrap();
        f.transport.respond(401, "");

        assert_eq!(block_on(f.store.restore_from_storage()), None);
        assert!(!f.store.session().is_authenticated());
        assert!(f.storage.is_empty());
    }

    #[test]
    fn restore_without_token_sends_nothing() {
        let f = fixture();
        assert_eq!(block_on(f.store.restore_from_storage()), None);
        assert_eq!(f.transport.request_count(), 0);
    }

    #[test]
    fn registration_requires_capable_role() {
        let f = fixture();
        let request = RegisterRequest {
            name: "New Tech".into(),
            email: "new@netsite.test".into(),
            password: "pw".into(),
            role: Role::Technician,
            organization_unit: "Dakar".into(),
        };

        assert_eq!(
            block_on(f.store.register_user(&request)),
            Err(AppError::AuthorizationDenied)
        );

        f.store
            .session()
            .establish(identity(Role::Technician), Credential::new("t"));
        assert_eq!(
            block_on(f.store.register_user(&request)),
            Err(AppError::AuthorizationDenied)
        );
        assert_eq!(f.transport.request_count(), 0);

        f.store
            .session()
            .establish(identity(Role::Manager), Credential::new("m"));
        f.transport.respond(201, &login_body(Role::Technician, "new"));
        let created = block_on(f.store.register_user(&request)).unwrap();
        assert_eq!(created.role, Role::Technician);
    }
}
