// ============================================================================
// CONFIGURACIÓN - Resuelta en tiempo de compilación (build.rs + .env)
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_WS_BASE_URL: &str = "ws://localhost:5000";
const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 5_000;

/// Configuración de la consola
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL base de la API REST (sin `/` final)
    pub api_base_url: String,
    /// URL base del WebSocket (sin `/` final)
    pub ws_base_url: String,
    /// Espera fija entre un cierre inesperado del canal en vivo y el reintento
    pub reconnect_interval_ms: u64,
    pub environment: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_base_url: DEFAULT_WS_BASE_URL.to_string(),
            reconnect_interval_ms: DEFAULT_RECONNECT_INTERVAL_MS,
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self {
            api_base_url: trim_url(option_env!("API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL)),
            ws_base_url: trim_url(option_env!("WS_BASE_URL").unwrap_or(DEFAULT_WS_BASE_URL)),
            reconnect_interval_ms: option_env!("WS_RECONNECT_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RECONNECT_INTERVAL_MS),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development")
                .to_string(),
            log_level: option_env!("LOG_LEVEL").unwrap_or("info").to_string(),
        }
    }

    /// Endpoint del canal en vivo
    pub fn live_url(&self) -> String {
        format!("{}/ws", self.ws_base_url)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Nivel de log para `wasm_logger`; valores desconocidos caen a `Info`
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

fn trim_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
