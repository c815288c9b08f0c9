// ============================================================================
// NETSITE CONSOLE - PLANO DE CONTROL DE ACCESO Y SESIÓN (RUST PURO)
// ============================================================================
// Arquitectura:
// - Models: Estructuras compartidas con backend
// - Services: SOLO comunicación (API REST + canal en vivo)
// - State: Sesión reactiva + contexto raíz de la app
// - Stores: login / logout / restauración
// - Routing: Rutas, guardia de acceso y resolutor de vistas
// - ViewModels: Estado + lógica de pantalla
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod routing;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;
pub mod viewmodels;

#[cfg(test)]
mod testing;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::AppConfig;
use crate::state::{AppContext, Platform};
use crate::utils::ROUTE_CHANGE_EVENT;

// Contexto raíz: la única instancia viva de la app
thread_local! {
    static APP: RefCell<Option<AppContext>> = RefCell::new(None);
}

/// Copia del contexto (sin mantener el borrow del thread_local)
fn app() -> Option<AppContext> {
    APP.with(|cell| cell.borrow().clone())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_env();
    wasm_logger::init(wasm_logger::Config::new(config.log_level()));
    log::info!("🚀 NetSite Console - {} ({})", config.api_base_url, config.environment);

    let ctx = AppContext::new(config, Platform::browser());
    APP.with(|cell| *cell.borrow_mut() = Some(ctx.clone()));

    install_route_listeners()?;

    wasm_bindgen_futures::spawn_local(async move {
        ctx.init().await;
        load_fresh_dashboard(&ctx);
    });

    Ok(())
}

/// `popstate` (atrás/adelante) y `routechange` (redirecciones internas)
/// vuelven a pasar por la guardia.
fn install_route_listeners() -> Result<(), JsValue> {
    let Some(win) = web_sys::window() else {
        return Ok(());
    };

    for event in ["popstate", ROUTE_CHANGE_EVENT] {
        let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
            let Some(ctx) = app() else {
                return;
            };
            let path = current_path();
            ctx.navigate(&path);
            load_fresh_dashboard(&ctx);
        }) as Box<dyn FnMut(web_sys::Event)>);

        win.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        // Se registra una sola vez al arrancar
        closure.forget();
    }
    Ok(())
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Carga inicial del dashboard, una vez por montaje
fn load_fresh_dashboard(ctx: &AppContext) {
    if let Some(vm) = ctx.take_fresh_dashboard() {
        wasm_bindgen_futures::spawn_local(async move {
            vm.load().await;
        });
    }
}

// ============================================================================
// EXPORTS WASM
// ============================================================================

/// Navegación iniciada por el usuario
#[wasm_bindgen]
pub fn navigate(path: &str) {
    let Some(ctx) = app() else {
        log::warn!("⚠️ [APP] App no está inicializada");
        return;
    };

    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        if current_path() != path {
            if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
                log::error!("❌ [NAV] pushState falló: {:?}", e);
            }
        }
    }

    ctx.navigate(path);
    load_fresh_dashboard(&ctx);
}

/// Login desde el formulario. `Ok(rol)` o `Err(mensaje para el banner)`.
#[wasm_bindgen]
pub async fn login(email: String, password: String) -> Result<JsValue, JsValue> {
    let ctx = app().ok_or_else(|| JsValue::from_str("App no está inicializada"))?;
    let result = ctx.login(&email, &password).await;
    load_fresh_dashboard(&ctx);
    match result {
        Ok(identity) => Ok(JsValue::from_str(identity.role.as_str())),
        Err(e) => Err(JsValue::from_str(&e.user_message())),
    }
}

#[wasm_bindgen]
pub fn logout() {
    if let Some(ctx) = app() {
        ctx.logout();
    }
}

/// Rol de la sesión actual (`ADMIN` / `MANAGER` / `TECHNICIAN`)
#[wasm_bindgen]
pub fn current_role() -> Option<String> {
    app()
        .and_then(|ctx| ctx.current_role())
        .map(|role| role.as_str().to_string())
}
