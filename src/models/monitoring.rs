use serde::{Deserialize, Serialize};

use crate::models::site::EquipmentStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStatus {
    pub is_running: bool,
    #[serde(default)]
    pub last_check: Option<String>,
    #[serde(default)]
    pub total_sites_monitored: u32,
    #[serde(default)]
    pub total_alerts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatus {
    pub is_running: bool,
    #[serde(default)]
    pub current_scenario: Option<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub total_scenarios: u32,
    #[serde(default)]
    pub completed_scenarios: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub cpu: f64,
    pub memory: f64,
    pub bandwidth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetrics {
    pub site_id: String,
    #[serde(default)]
    pub site_name: Option<String>,
    pub status: HealthStatus,
    pub uptime: f64,
    pub performance: Performance,
    #[serde(default)]
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentReadings {
    pub temperature: f64,
    pub power: f64,
    pub signal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentMetrics {
    pub equipment_id: String,
    #[serde(default)]
    pub equipment_name: Option<String>,
    pub status: EquipmentStatus,
    pub metrics: EquipmentReadings,
    #[serde(default)]
    pub last_update: Option<String>,
}
