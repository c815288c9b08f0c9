// ============================================================================
// APP STATE - Contexto raíz de la consola
// ============================================================================
// Todo lo que antes era global vive aquí y se construye explícitamente:
// configuración, sesión, cliente API, canal en vivo, guardia y la pantalla
// activa. `init` restaura la sesión; `shutdown` suelta las suscripciones.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{Identity, Role};
use crate::routing::{
    menu_items, resolve_navigation, AccessPolicyGuard, BrowserNavigator, DashboardView,
    MenuItem, NavigationOutcome, Navigator, RoutePermissionTable,
};
use crate::services::http::{FetchTransport, HttpTransport};
use crate::services::scheduler::{BrowserScheduler, Scheduler};
use crate::services::socket::{BrowserSocketFactory, SocketFactory};
use crate::services::{ApiClient, LiveUpdateChannel};
use crate::state::SessionState;
use crate::stores::{OperationsStore, SessionStore};
use crate::utils::{BrowserStorage, DurableStorage, DASHBOARD_PATH, LOGIN_PATH};
use crate::viewmodels::{DashboardViewModel, LoginForm, LoginViewModel};

/// Redirecciones encadenadas máximas en una navegación (/x → /dashboard → /login)
const MAX_REDIRECTS: usize = 3;

/// Costuras con el navegador
#[derive(Clone)]
pub struct Platform {
    pub storage: Rc<dyn DurableStorage>,
    pub http: Rc<dyn HttpTransport>,
    pub sockets: Rc<dyn SocketFactory>,
    pub scheduler: Rc<dyn Scheduler>,
    pub navigator: Rc<dyn Navigator>,
}

impl Platform {
    pub fn browser() -> Self {
        Self {
            storage: Rc::new(BrowserStorage),
            http: Rc::new(FetchTransport),
            sockets: Rc::new(BrowserSocketFactory),
            scheduler: Rc::new(BrowserScheduler),
            navigator: Rc::new(BrowserNavigator),
        }
    }
}

/// Contexto raíz (clonar es barato; todos los clones comparten estado)
#[derive(Clone)]
pub struct AppContext {
    config: AppConfig,
    session: SessionState,
    api: ApiClient,
    store: SessionStore,
    operations: OperationsStore,
    live: LiveUpdateChannel,
    guard: AccessPolicyGuard,
    navigator: Rc<dyn Navigator>,
    login_form: Rc<LoginViewModel>,
    current: Rc<RefCell<Option<NavigationOutcome>>>,
    dashboard: Rc<RefCell<Option<Rc<DashboardViewModel>>>>,
    /// Dashboard montado y aún sin carga inicial
    dashboard_fresh: Rc<Cell<bool>>,
}

impl AppContext {
    pub fn new(config: AppConfig, platform: Platform) -> Self {
        let session = SessionState::new(platform.storage);
        let api = ApiClient::new(
            config.api_base_url.clone(),
            platform.http,
            session.clone(),
            platform.navigator.clone(),
        );
        let store = SessionStore::new(api.clone(), session.clone());
        let operations = OperationsStore::new(api.clone(), session.clone());
        let login_form = Rc::new(LoginViewModel::new(store.clone(), platform.navigator.clone()));
        let live = LiveUpdateChannel::new(
            config.live_url(),
            config.reconnect_interval(),
            platform.sockets,
            platform.scheduler,
        );

        Self {
            config,
            session,
            api,
            store,
            operations,
            live,
            guard: AccessPolicyGuard::new(RoutePermissionTable::standard()),
            navigator: platform.navigator,
            login_form,
            current: Rc::new(RefCell::new(None)),
            dashboard: Rc::new(RefCell::new(None)),
            dashboard_fresh: Rc::new(Cell::new(false)),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn operations(&self) -> &OperationsStore {
        &self.operations
    }

    pub fn live(&self) -> &LiveUpdateChannel {
        &self.live
    }

    pub fn guard(&self) -> &AccessPolicyGuard {
        &self.guard
    }

    pub fn current_role(&self) -> Option<Role> {
        self.session.role()
    }

    /// Última navegación resuelta
    pub fn current(&self) -> Option<NavigationOutcome> {
        self.current.borrow().clone()
    }

    /// Viewmodel del dashboard mientras es la pantalla activa
    pub fn dashboard(&self) -> Option<Rc<DashboardViewModel>> {
        self.dashboard.borrow().clone()
    }

    /// El dashboard recién montado, una sola vez por montaje: quien lo
    /// recibe hace la carga inicial.
    pub fn take_fresh_dashboard(&self) -> Option<Rc<DashboardViewModel>> {
        if self.dashboard_fresh.replace(false) {
            self.dashboard()
        } else {
            None
        }
    }

    /// Estado del formulario de login (banner incluido)
    pub fn login_form(&self) -> LoginForm {
        self.login_form.form()
    }

    /// Menú lateral del rol actual (vacío sin sesión)
    pub fn menu(&self) -> Vec<MenuItem> {
        match self.session.role() {
            Some(role) => menu_items(self.guard.table(), role),
            None => Vec::new(),
        }
    }

    // ==========================================
    // CICLO DE VIDA
    // ==========================================

    /// Restaura la sesión guardada y resuelve la ruta actual
    pub async fn init(&self) -> NavigationOutcome {
        log::info!("🚀 [APP] Inicializando ({})", self.config.environment);
        match self.store.restore_from_storage().await {
            Some(identity) => log::info!("👤 [APP] Sesión activa: {} ({})", identity.name, identity.role),
            None => log::info!("👤 [APP] Sin sesión"),
        }
        let path = self.navigator.current_path();
        self.navigate(&path)
    }

    /// Suelta la pantalla activa y cierra el canal en vivo
    pub fn shutdown(&self) {
        log::info!("🛑 [APP] Shutdown");
        self.leave_dashboard();
        self.live.shutdown();
        *self.current.borrow_mut() = None;
    }

    // ==========================================
    // NAVEGACIÓN
    // ==========================================

    /// Resuelve `path` contra la sesión actual (sin caché), sigue las
    /// redirecciones y monta la pantalla resultante.
    pub fn navigate(&self, path: &str) -> NavigationOutcome {
        let mut outcome = resolve_navigation(path, &self.session.snapshot(), &self.guard);
        let mut hops = 0;
        while let NavigationOutcome::Redirect(target) = &outcome {
            if hops == MAX_REDIRECTS {
                log::error!("❌ [APP] Demasiadas redirecciones desde {}", path);
                break;
            }
            hops += 1;
            let target = target.clone();
            self.navigator.replace(&target);
            outcome = resolve_navigation(&target, &self.session.snapshot(), &self.guard);
        }

        log::debug!("🧭 [APP] {} → {:?}", path, outcome);
        self.mount(&outcome);
        *self.current.borrow_mut() = Some(outcome.clone());
        outcome
    }

    fn mount(&self, outcome: &NavigationOutcome) {
        match outcome {
            NavigationOutcome::RenderDashboard(view) => self.enter_dashboard(*view),
            _ => self.leave_dashboard(),
        }
    }

    fn enter_dashboard(&self, view: DashboardView) {
        if self.dashboard.borrow().is_some() {
            return;
        }
        log::info!("📊 [APP] Dashboard {:?}", view);
        let vm = Rc::new(DashboardViewModel::new(
            view,
            self.api.clone(),
            self.operations.clone(),
        ));
        vm.attach(&self.live);
        *self.dashboard.borrow_mut() = Some(vm);
        self.dashboard_fresh.set(true);
    }

    fn leave_dashboard(&self) {
        self.dashboard_fresh.set(false);
        let vm = self.dashboard.borrow_mut().take();
        if let Some(vm) = vm {
            vm.detach();
        }
    }

    // ==========================================
    // SESIÓN
    // ==========================================

    /// Login a través del formulario: éxito → /dashboard, fallo → banner
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        self.login_form.set_email(email);
        self.login_form.set_password(password);
        let identity = self.login_form.submit().await?;
        // En el navegador `replace` ya disparó `routechange` y la navegación
        if !matches!(self.current(), Some(NavigationOutcome::RenderDashboard(_))) {
            self.navigate(DASHBOARD_PATH);
        }
        Ok(identity)
    }

    pub fn logout(&self) {
        self.store.logout();
        self.navigator.replace(LOGIN_PATH);
        if self.current() != Some(NavigationOutcome::Login) {
            self.navigate(LOGIN_PATH);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Route;
    use crate::services::ChannelState;
    use crate::testing::{
        identity, login_body, FakeSocketFactory, ManualScheduler, RecordingNavigator,
        ScriptedTransport,
    };
    use crate::utils::{MemoryStorage, TOKEN_STORAGE_KEY};
    use futures::executor::block_on;

    struct Harness {
        ctx: AppContext,
        transport: Rc<ScriptedTransport>,
        storage: Rc<MemoryStorage>,
        sockets: Rc<FakeSocketFactory>,
        navigator: Rc<RecordingNavigator>,
    }

    fn harness(start: &str) -> Harness {
        let transport = Rc::new(ScriptedTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let sockets = Rc::new(FakeSocketFactory::new());
        let navigator = Rc::new(RecordingNavigator::at(start));
        let platform = Platform {
            storage: storage.clone(),
            http: transport.clone(),
            sockets: sockets.clone(),
            scheduler: Rc::new(ManualScheduler::new()),
            navigator: navigator.clone(),
        };
        Harness {
            ctx: AppContext::new(AppConfig::default(), platform),
            transport,
            storage,
            sockets,
            navigator,
        }
    }

    #[test]
    fn init_without_token_lands_on_login() {
        let h = harness("/interventions/42");

        let outcome = block_on(h.ctx.init());

        assert_eq!(outcome, NavigationOutcome::Login);
        assert_eq!(h.navigator.history(), vec!["/login".to_string()]);
        assert_eq!(h.transport.request_count(), 0);
    }

    #[test]
    fn init_restores_session_and_renders_requested_screen() {
        let h = harness("/interventions/42");
        h.storage.store(TOKEN_STORAGE_KEY, "tok").unwrap();
        let me = serde_json::to_string(&identity(Role::Technician)).unwrap();
        h.transport.respond(200, &me);

        let outcome = block_on(h.ctx.init());

        assert_eq!(
            outcome,
            NavigationOutcome::Render(Route::InterventionDetail("42".into()))
        );
        assert_eq!(h.ctx.current_role(), Some(Role::Technician));
        assert!(h.navigator.history().is_empty());
    }

    #[test]
    fn technician_is_bounced_from_sites() {
        let h = harness("/login");
        h.transport.respond(200, &login_body(Role::Technician, "tok"));
        block_on(h.ctx.login("tech@netsite.test", "pw")).unwrap();

        let outcome = h.ctx.navigate("/sites");

        assert_eq!(outcome, NavigationOutcome::RenderDashboard(DashboardView::Technician));
        assert_eq!(h.navigator.current_path(), "/dashboard");
    }

    #[test]
    fn dashboard_owns_a_live_subscription_while_mounted() {
        let h = harness("/login");
        h.transport.respond(200, &login_body(Role::Admin, "tok"));
        block_on(h.ctx.login("admin@netsite.test", "pw")).unwrap();

        assert!(h.ctx.dashboard().is_some());
        assert_eq!(h.ctx.live().listener_count(), 1);
        assert_eq!(h.sockets.open_count(), 1);

        h.ctx.navigate("/users");
        assert!(h.ctx.dashboard().is_none());
        assert_eq!(h.ctx.live().listener_count(), 0);
        assert!(h.sockets.connection(0).is_closed());
        assert_eq!(h.ctx.live().state(), ChannelState::Disconnected);
    }

    #[test]
    fn logout_returns_to_login_and_empties_menu() {
        let h = harness("/login");
        h.transport.respond(200, &login_body(Role::Manager, "tok"));
        block_on(h.ctx.login("manager@netsite.test", "pw")).unwrap();
        assert_eq!(h.ctx.menu().len(), 4);

        h.ctx.logout();
        h.ctx.logout();

        assert_eq!(h.ctx.current(), Some(NavigationOutcome::Login));
        assert!(h.ctx.menu().is_empty());
        assert!(h.storage.is_empty());
        assert_eq!(h.ctx.live().listener_count(), 0);
    }

    #[test]
    fn expired_token_on_fetch_forces_login() {
        let h = harness("/login");
        h.transport.respond(200, &login_body(Role::Admin, "tok"));
        block_on(h.ctx.login("admin@netsite.test", "pw")).unwrap();
        h.ctx.navigate("/sites");

        h.transport.respond(401, "");
        let result = block_on(h.ctx.api().list_sites());

        assert!(result.is_err());
        assert!(!h.ctx.session().is_authenticated());
        assert_eq!(h.navigator.current_path(), "/login");
        assert_eq!(h.ctx.navigate("/sites"), NavigationOutcome::Login);
    }

    #[test]
    fn login_mounts_the_dashboard_once_when_redirects_renavigate() {
        let h = harness("/login");
        let ctx = h.ctx.clone();
        let routed = Rc::new(Cell::new(0));
        let counter = routed.clone();
        // Como en el navegador: `replace` vuelve a pasar por la navegación
        h.navigator.on_replace(move |path| {
            counter.set(counter.get() + 1);
            ctx.navigate(path);
        });
        h.transport.respond(200, &login_body(Role::Admin, "tok"));

        block_on(h.ctx.login("admin@netsite.test", "pw")).unwrap();

        assert_eq!(routed.get(), 1);
        assert!(h.ctx.take_fresh_dashboard().is_some());
        assert!(h.ctx.take_fresh_dashboard().is_none());
        assert_eq!(h.ctx.live().listener_count(), 1);
        assert_eq!(h.transport.request_count(), 1);
    }

    #[test]
    fn failed_login_keeps_the_login_screen_with_a_banner() {
        let h = harness("/login");
        h.transport.respond(401, r#"{"message":"Mot de passe incorrect"}"#);

        let result = block_on(h.ctx.login("admin@netsite.test", "nope"));

        assert_eq!(result, Err(AppError::AuthenticationFailure));
        assert_eq!(
            h.ctx.login_form().banner.as_deref(),
            Some("Email ou mot de passe incorrect")
        );
        assert!(h.ctx.dashboard().is_none());
        assert!(h.navigator.history().is_empty());
    }

    #[test]
    fn remounted_dashboard_is_loaded_again() {
        let h = harness("/login");
        h.transport.respond(200, &login_body(Role::Manager, "tok"));
        block_on(h.ctx.login("manager@netsite.test", "pw")).unwrap();
        assert!(h.ctx.take_fresh_dashboard().is_some());

        h.ctx.navigate("/dashboard");
        assert!(h.ctx.take_fresh_dashboard().is_none());

        h.ctx.navigate("/sites");
        h.ctx.navigate("/dashboard");
        let vm = h.ctx.take_fresh_dashboard().unwrap();
        assert_eq!(vm.view(), DashboardView::Manager);
    }

    #[test]
    fn shutdown_releases_everything() {
        let h = harness("/login");
        h.transport.respond(200, &login_body(Role::Admin, "tok"));
        block_on(h.ctx.login("admin@netsite.test", "pw")).unwrap();

        h.ctx.shutdown();

        assert!(h.ctx.dashboard().is_none());
        assert!(h.ctx.current().is_none());
        assert_eq!(h.ctx.live().listener_count(), 0);
        assert!(h.sockets.connection(0).is_closed());
    }
}
