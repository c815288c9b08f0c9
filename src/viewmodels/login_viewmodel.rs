// ============================================================================
// LOGIN VIEWMODEL - Formulario de acceso
// ============================================================================

use std::rc::Rc;

use crate::error::AppError;
use crate::models::Identity;
use crate::routing::Navigator;
use crate::state::ReactiveState;
use crate::stores::SessionStore;
use crate::utils::DASHBOARD_PATH;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub banner: Option<String>,
}

pub struct LoginViewModel {
    store: SessionStore,
    navigator: Rc<dyn Navigator>,
    form: ReactiveState<LoginForm>,
}

impl LoginViewModel {
    pub fn new(store: SessionStore, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            form: ReactiveState::new(LoginForm::default()),
        }
    }

    pub fn form(&self) -> LoginForm {
        self.form.get()
    }

    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&LoginForm) + 'static,
    {
        self.form.subscribe(callback);
    }

    pub fn set_email(&self, email: &str) {
        let mut form = self.form.get();
        form.email = email.to_string();
        form.banner = None;
        self.form.set(form);
    }

    pub fn set_password(&self, password: &str) {
        let mut form = self.form.get();
        form.password = password.to_string();
        form.banner = None;
        self.form.set(form);
    }

    /// Envía el formulario. Éxito → /dashboard; fallo → banner.
    pub async fn submit(&self) -> Result<Identity, AppError> {
        let mut form = self.form.get();
        if form.submitting {
            return Err(AppError::ValidationFailure("Connexion en cours".to_string()));
        }
        form.submitting = true;
        form.banner = None;
        self.form.set(form.clone());

        let result = self.store.login(&form.email, &form.password).await;

        let mut form = self.form.get();
        form.submitting = false;
        match result {
            Ok(identity) => {
                log::info!("✅ [LOGIN] Bienvenido {}", identity.name);
                form.password.clear();
                self.form.set(form);
                self.navigator.replace(DASHBOARD_PATH);
                Ok(identity)
            }
            Err(e) => {
                form.banner = Some(e.user_message());
                self.form.set(form);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::services::ApiClient;
    use crate::state::SessionState;
    use crate::testing::{login_body, RecordingNavigator, ScriptedTransport};
    use crate::utils::MemoryStorage;
    use futures::executor::block_on;

    fn viewmodel() -> (LoginViewModel, Rc<ScriptedTransport>, Rc<RecordingNavigator>) {
        let transport = Rc::new(ScriptedTransport::new());
        let navigator = Rc::new(RecordingNavigator::at("/login"));
        let session = SessionState::new(Rc::new(MemoryStorage::new()));
        let api = ApiClient::new(
            "http://api.test/api",
            transport.clone(),
            session.clone(),
            navigator.clone(),
        );
        let vm = LoginViewModel::new(SessionStore::new(api, session), navigator.clone());
        (vm, transport, navigator)
    }

    #[test]
    fn successful_login_goes_to_dashboard() {
        let (vm, transport, navigator) = viewmodel();
        transport.respond(200, &login_body(Role::Admin, "tok"));
        vm.set_email("admin@netsite.test");
        vm.set_password("pw");

        let identity = block_on(vm.submit()).unwrap();

        assert_eq!(identity.role, Role::Admin);
        let form = vm.form();
        assert!(!form.submitting);
        assert!(form.banner.is_none());
        assert!(form.password.is_empty());
        assert_eq!(navigator.history(), vec!["/dashboard".to_string()]);
    }

    #[test]
    fn wrong_credentials_show_generic_banner() {
        let (vm, transport, navigator) = viewmodel();
        transport.respond(401, r#"{"message":"Utilisateur non trouvé"}"#);
        vm.set_email("who@netsite.test");
        vm.set_password("pw");

        assert_eq!(block_on(vm.submit()), Err(AppError::AuthenticationFailure));

        assert_eq!(vm.form().banner.as_deref(), Some("Email ou mot de passe incorrect"));
        assert!(navigator.history().is_empty());
    }

    #[test]
    fn blank_form_is_rejected_locally() {
        let (vm, transport, _) = viewmodel();
        assert!(matches!(block_on(vm.submit()), Err(AppError::ValidationFailure(_))));
        assert!(vm.form().banner.is_some());
        assert_eq!(transport.request_count(), 0);
    }
}
