use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Active,
    Inactive,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Urban,
    Rural,
    Industrial,
}

/// Estado de validación de un sitio creado por un gestionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    Online,
    Offline,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub status: EquipmentStatus,
    #[serde(default)]
    pub last_check: Option<String>,
    #[serde(default)]
    pub specifications: serde_json::Map<String, serde_json::Value>,
}

/// Sitio de red (antena / estación)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub location: Location,
    #[serde(rename = "type")]
    pub kind: SiteKind,
    pub status: SiteStatus,
    #[serde(default)]
    pub validation_status: ValidationStatus,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub last_maintenance: Option<String>,
    #[serde(default)]
    pub next_maintenance: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    /// Sede propietaria
    #[serde(rename = "siege", default)]
    pub organization_unit: String,
}

/// Cuerpo de `POST /sites` y `PUT /sites/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDraft {
    pub name: String,
    pub location: Location,
    #[serde(rename = "type")]
    pub kind: SiteKind,
    pub status: SiteStatus,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(rename = "siege")]
    pub organization_unit: String,
}

/// Cuerpo de `PUT /sites/:id/validation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteValidationRequest {
    pub validation_status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub total: u32,
    pub active: u32,
    pub maintenance: u32,
    pub inactive: u32,
    #[serde(default)]
    pub by_type: std::collections::HashMap<String, u32>,
}
