use wasm_bindgen::JsValue;
use web_sys::{window, Event};

use crate::utils::ROUTE_CHANGE_EVENT;

/// Navegación programática
pub trait Navigator {
    fn current_path(&self) -> String;
    /// Reemplaza la entrada actual del historial (semántica de redirección)
    fn replace(&self, path: &str);
}

/// `history.replaceState` + evento `routechange` para que la app re-renderice
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn replace(&self, path: &str) {
        let Some(win) = window() else {
            log::warn!("⚠️ [NAV] Sin window, no se puede navegar a {}", path);
            return;
        };
        if self.current_path() == path {
            return;
        }

        match win.history() {
            Ok(history) => {
                if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(path)) {
                    log::error!("❌ [NAV] replaceState falló: {:?}", e);
                    return;
                }
            }
            Err(e) => {
                log::error!("❌ [NAV] History no disponible: {:?}", e);
                return;
            }
        }

        log::info!("🧭 [NAV] → {}", path);
        if let Ok(event) = Event::new(ROUTE_CHANGE_EVENT) {
            let _ = win.dispatch_event(&event);
        }
    }
}
