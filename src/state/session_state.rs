// ============================================================================
// SESSION STATE - Única instancia de sesión + su copia en localStorage
// ============================================================================
// Es el único punto que escribe la sesión. Identidad y credencial se fijan y
// se borran siempre juntas.
// ============================================================================

use std::rc::Rc;

use crate::models::{Credential, Identity, Role};
use crate::state::reactivity::ReactiveState;
use crate::utils::{DurableStorage, IDENTITY_HINT_STORAGE_KEY, TOKEN_STORAGE_KEY};

/// Sesión de la consola. Vacía = no autenticado.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    identity: Option<Identity>,
    credential: Option<Credential>,
}

impl Session {
    pub fn authenticated(identity: Identity, credential: Credential) -> Self {
        Self {
            identity: Some(identity),
            credential: Some(credential),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Estado de sesión compartido (clonar es barato, todos los clones ven lo mismo)
#[derive(Clone)]
pub struct SessionState {
    session: ReactiveState<Session>,
    storage: Rc<dyn DurableStorage>,
}

impl SessionState {
    pub fn new(storage: Rc<dyn DurableStorage>) -> Self {
        Self {
            session: ReactiveState::new(Session::empty()),
            storage,
        }
    }

    /// Copia de la sesión actual
    pub fn snapshot(&self) -> Session {
        self.session.get()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.session.with(|s| s.identity.clone())
    }

    pub fn credential(&self) -> Option<Credential> {
        self.session.with(|s| s.credential.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.session.with(Session::role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(Session::is_authenticated)
    }

    /// Credencial guardada por una sesión anterior (sin validar)
    pub fn stored_credential(&self) -> Option<Credential> {
        self.storage
            .load(TOKEN_STORAGE_KEY)
            .filter(|token| !token.trim().is_empty())
            .map(Credential::new)
    }

    /// Instantánea de la identidad guardada. Solo sirve de pista para la UI
    /// mientras se revalida la credencial.
    pub fn identity_hint(&self) -> Option<Identity> {
        let raw = self.storage.load(IDENTITY_HINT_STORAGE_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Fija identidad + credencial y las persiste.
    /// Un fallo de escritura se registra pero no invalida la sesión en memoria.
    pub fn establish(&self, identity: Identity, credential: Credential) {
        if let Err(e) = self.storage.store(TOKEN_STORAGE_KEY, credential.as_str()) {
            log::error!("❌ [SESSION] No se pudo guardar el token: {}", e);
        }
        match serde_json::to_string(&identity) {
            Ok(json) => {
                if let Err(e) = self.storage.store(IDENTITY_HINT_STORAGE_KEY, &json) {
                    log::warn!("⚠️ [SESSION] No se pudo guardar la identidad: {}", e);
                }
            }
            Err(e) => log::warn!("⚠️ [SESSION] Error serializando identidad: {}", e),
        }

        log::info!("✅ [SESSION] Sesión establecida para {} ({})", identity.email, identity.role);
        self.session.set(Session::authenticated(identity, credential));
    }

    /// Borra la sesión y su copia duradera. Idempotente.
    pub fn clear(&self) {
        self.storage.remove(TOKEN_STORAGE_KEY);
        self.storage.remove(IDENTITY_HINT_STORAGE_KEY);
        if self.is_authenticated() {
            log::info!("🗑️ [SESSION] Sesión borrada");
        }
        self.session.set(Session::empty());
    }

    /// Notificación tras cada cambio (login, logout, expiración)
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&Session) + 'static,
    {
        self.session.subscribe(callback);
    }
}
