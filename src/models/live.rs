// ============================================================================
// MENSAJES DEL CANAL EN VIVO
// ============================================================================
// Cada línea de un frame es un objeto JSON con un discriminador `type`.
// El resto de campos se conserva tal cual y se decodifica bajo demanda.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::alert::Alert;
use crate::models::monitoring::{MonitoringStatus, SimulationStatus, SiteMetrics};

/// Panel al que va dirigido un mensaje
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    Monitoring,
    Simulation,
    SiteMetrics,
    Alert,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl LiveMessage {
    /// Decodifica una línea del frame
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn topic(&self) -> Topic {
        match self.kind.as_str() {
            "monitoring" => Topic::Monitoring,
            "simulation" => Topic::Simulation,
            "site_metrics" => Topic::SiteMetrics,
            "alert" => Topic::Alert,
            other => Topic::Other(other.to_string()),
        }
    }

    /// `{"type":"monitoring","status":{...}}`
    pub fn monitoring_status(&self) -> Option<MonitoringStatus> {
        match self.topic() {
            Topic::Monitoring => self.field("status"),
            _ => None,
        }
    }

    /// `{"type":"simulation","status":{...}}`
    pub fn simulation_status(&self) -> Option<SimulationStatus> {
        match self.topic() {
            Topic::Simulation => self.field("status"),
            _ => None,
        }
    }

    /// `{"type":"site_metrics","siteId":"...","metrics":{...}}`
    pub fn site_metrics(&self) -> Option<SiteMetrics> {
        match self.topic() {
            Topic::SiteMetrics => self.field("metrics"),
            _ => None,
        }
    }

    pub fn site_id(&self) -> Option<&str> {
        self.body.get("siteId").and_then(Value::as_str)
    }

    /// `{"type":"alert","alert":{...}}` (anidada: la alerta tiene su propio `type`)
    pub fn alert(&self) -> Option<Alert> {
        match self.topic() {
            Topic::Alert => self.field("alert"),
            _ => None,
        }
    }

    fn field<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.body.get(name)?.clone();
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("⚠️ [LIVE] Campo `{}` inválido en mensaje `{}`: {}", name, self.kind, e);
                None
            }
        }
    }
}

/// Divide un frame en líneas JSON. Las líneas vacías se ignoran.
pub fn frame_lines(frame: &str) -> impl Iterator<Item = &str> {
    frame.lines().map(str::trim).filter(|line| !line.is_empty())
}
